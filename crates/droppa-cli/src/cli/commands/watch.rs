//! `droppa watch` – follow a progress feed and print its updates.

use anyhow::Result;
use droppa_core::config::DroppaConfig;
use droppa_core::endpoints::{Endpoints, FeedKind};
use droppa_core::feeds::{watch_feed, FeedEnd, FeedUpdate};
use droppa_core::transport::HttpTransport;
use tokio::sync::mpsc;

fn render(update: &FeedUpdate) -> String {
    match update {
        FeedUpdate::Incoming(files) if files.is_empty() => "no incoming files".to_string(),
        FeedUpdate::Incoming(files) => files
            .iter()
            .map(|f| format!("  {:<32} {:>3}%  {} bytes", f.name, f.progress, f.size))
            .collect::<Vec<_>>()
            .join("\n"),
        FeedUpdate::Zipping(p) => format!("zipping: {}%", p),
        FeedUpdate::Devices(names) if names.is_empty() => "devices: (none)".to_string(),
        FeedUpdate::Devices(names) => format!("devices: {}", names.join(", ")),
        FeedUpdate::Replaced => "feed replaced by a newer connection".to_string(),
    }
}

pub async fn run_watch(cfg: &DroppaConfig, kind: FeedKind) -> Result<()> {
    let endpoints = Endpoints::from_config(cfg)?;
    let client = HttpTransport::build_client(endpoints.variant())?;
    let policy = cfg.reconnect_policy();

    let (tx, mut rx) = mpsc::channel(32);
    let watcher =
        tokio::spawn(async move { watch_feed(&client, &endpoints, kind, policy, tx).await });

    while let Some(update) = rx.recv().await {
        println!("{}", render(&update));
    }

    match watcher.await? {
        FeedEnd::Replaced | FeedEnd::ConsumerGone => Ok(()),
        FeedEnd::GaveUp { failures } => {
            anyhow::bail!("{kind:?} feed unavailable after {failures} attempt(s)")
        }
    }
}
