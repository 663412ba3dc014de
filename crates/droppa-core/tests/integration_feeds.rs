//! Integration test: feed watchers reconnect after a stream ends and stop when replaced.

mod common;

use std::collections::HashMap;
use std::time::Duration;

use common::droppa_server::{self, ServerOptions};
use droppa_core::config::Variant;
use droppa_core::endpoints::{Endpoints, FeedKind};
use droppa_core::feeds::{watch_feed, FeedEnd, FeedUpdate, IncomingFile};
use droppa_core::reconnect::ReconnectPolicy;
use droppa_core::transport::HttpTransport;
use tokio::sync::mpsc;

fn quick(max_attempts: Option<u32>) -> ReconnectPolicy {
    ReconnectPolicy {
        delay: Duration::from_millis(10),
        max_attempts,
    }
}

fn feeds(path: &str, connections: &[&[&str]]) -> HashMap<String, Vec<Vec<String>>> {
    let scripts = connections
        .iter()
        .map(|c| c.iter().map(|s| s.to_string()).collect())
        .collect();
    HashMap::from([(path.to_string(), scripts)])
}

async fn drain(mut rx: mpsc::Receiver<FeedUpdate>) -> Vec<FeedUpdate> {
    let mut out = Vec::new();
    while let Some(u) = rx.recv().await {
        out.push(u);
    }
    out
}

#[tokio::test]
async fn devices_feed_reconnects_then_stops_when_replaced() {
    let server = droppa_server::start(ServerOptions {
        feeds: feeds(
            "/connected-devices",
            &[&[r#"["phone"]"#], &[r#"["phone","laptop"]"#, "CONNECTION_REPLACED"]],
        ),
        ..ServerOptions::default()
    });
    let endpoints = Endpoints::new(&server.url, Variant::Plain, None).unwrap();
    let client = HttpTransport::build_client(endpoints.variant()).unwrap();
    let (tx, rx) = mpsc::channel(16);

    let end = watch_feed(&client, &endpoints, FeedKind::Devices, quick(Some(3)), tx).await;

    assert_eq!(end, FeedEnd::Replaced);
    assert_eq!(server.count("GET /connected-devices"), 2);
    assert_eq!(
        drain(rx).await,
        vec![
            FeedUpdate::Devices(vec!["phone".into()]),
            FeedUpdate::Devices(vec!["phone".into(), "laptop".into()]),
            FeedUpdate::Replaced,
        ]
    );
}

#[tokio::test]
async fn missing_feed_gives_up_after_max_attempts() {
    let server = droppa_server::start(ServerOptions::default());
    let endpoints = Endpoints::new(&server.url, Variant::Plain, None).unwrap();
    let client = HttpTransport::build_client(endpoints.variant()).unwrap();
    let (tx, rx) = mpsc::channel(16);

    let end = watch_feed(&client, &endpoints, FeedKind::Zipping, quick(Some(2)), tx).await;

    assert_eq!(end, FeedEnd::GaveUp { failures: 2 });
    assert_eq!(server.count("GET /zipping-progress"), 2);
    assert!(drain(rx).await.is_empty());
}

#[tokio::test]
async fn productive_connection_does_not_count_toward_the_cap() {
    let server = droppa_server::start(ServerOptions {
        feeds: feeds("/zipping-progress", &[&[r#"{ "progress": 30 }"#], &[]]),
        ..ServerOptions::default()
    });
    let endpoints = Endpoints::new(&server.url, Variant::Plain, None).unwrap();
    let client = HttpTransport::build_client(endpoints.variant()).unwrap();
    let (tx, rx) = mpsc::channel(16);

    let end = watch_feed(&client, &endpoints, FeedKind::Zipping, quick(Some(3)), tx).await;

    // One productive connection, then three empty ones before giving up.
    assert_eq!(end, FeedEnd::GaveUp { failures: 3 });
    assert_eq!(server.count("GET /zipping-progress"), 4);
    assert_eq!(drain(rx).await, vec![FeedUpdate::Zipping(30)]);
}

#[tokio::test]
async fn incoming_feed_skips_malformed_and_stops_when_consumer_leaves() {
    let server = droppa_server::start(ServerOptions {
        feeds: feeds(
            "/download-files-progress-desktop",
            &[&[
                "not json",
                r#"[{"size":10,"name":"a.jpg","progress":40}]"#,
            ]],
        ),
        ..ServerOptions::default()
    });
    let endpoints = Endpoints::new(&server.url, Variant::Desktop, None).unwrap();
    let client = HttpTransport::build_client(endpoints.variant()).unwrap();
    let (tx, mut rx) = mpsc::channel(16);

    let watcher = tokio::spawn(async move {
        watch_feed(&client, &endpoints, FeedKind::Incoming, quick(None), tx).await
    });

    let first = rx.recv().await.unwrap();
    assert_eq!(
        first,
        FeedUpdate::Incoming(vec![IncomingFile {
            name: "a.jpg".into(),
            progress: 40,
            size: 10,
        }])
    );
    drop(rx);

    let end = tokio::time::timeout(Duration::from_secs(5), watcher)
        .await
        .expect("watcher stops")
        .unwrap();
    assert_eq!(end, FeedEnd::ConsumerGone);
}
