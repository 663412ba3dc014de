//! Feed watcher: follow one SSE feed, reconnecting per policy.

use futures_util::StreamExt;
use reqwest::Client;
use tokio::sync::mpsc;

use super::payload::{parse_payload, FeedUpdate};
use crate::endpoints::{Endpoints, FeedKind};
use crate::reconnect::{classify, CloseReason, ReconnectDecision, ReconnectPolicy};
use crate::transport::open_event_stream;

/// Why a watcher returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEnd {
    /// Server replaced this stream; it must not reconnect.
    Replaced,
    /// The update receiver was dropped.
    ConsumerGone,
    /// The policy's attempt cap was reached.
    GaveUp { failures: u32 },
}

/// Follow `kind` until evicted, the consumer goes away, or the policy gives up.
/// Every decoded update (including the final [`FeedUpdate::Replaced`]) is sent on `updates`.
pub async fn watch_feed(
    client: &Client,
    endpoints: &Endpoints,
    kind: FeedKind,
    policy: ReconnectPolicy,
    updates: mpsc::Sender<FeedUpdate>,
) -> FeedEnd {
    let mut failures = 0u32;
    loop {
        let url = endpoints.feed(kind);
        tracing::debug!(?kind, %url, "connecting to feed");

        let (reason, delivered) = match open_event_stream(client, url).await {
            Err(e) => {
                tracing::warn!(?kind, error = %e, "feed connection failed");
                (classify(Some(&e)), false)
            }
            Ok(mut stream) => {
                let mut delivered = false;
                let mut error = None;
                let mut replaced = false;
                while let Some(item) = stream.next().await {
                    let msg = match item {
                        Ok(msg) => msg,
                        Err(e) => {
                            error = Some(e);
                            break;
                        }
                    };
                    match parse_payload(kind, &msg.data) {
                        Ok(update) => {
                            replaced = update == FeedUpdate::Replaced;
                            if updates.send(update).await.is_err() {
                                return FeedEnd::ConsumerGone;
                            }
                            if replaced {
                                tracing::info!(?kind, "feed replaced by a newer connection");
                                break;
                            }
                            delivered = true;
                        }
                        Err(e) => tracing::warn!(error = %e, "skipping feed message"),
                    }
                }
                if let Some(e) = &error {
                    tracing::warn!(?kind, error = %e, "feed stream error");
                }
                let reason = if replaced {
                    CloseReason::Replaced
                } else {
                    classify(error.as_ref())
                };
                (reason, delivered)
            }
        };

        // Only closes that delivered nothing count toward the attempt cap.
        failures = if delivered { 0 } else { failures + 1 };

        match policy.decide(failures, reason) {
            ReconnectDecision::Stop if reason == CloseReason::Replaced => return FeedEnd::Replaced,
            ReconnectDecision::Stop => return FeedEnd::GaveUp { failures },
            ReconnectDecision::ReconnectAfter(delay) => {
                tracing::debug!(?kind, ?reason, delay_ms = delay.as_millis() as u64, "feed reconnect scheduled");
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = updates.closed() => return FeedEnd::ConsumerGone,
                }
            }
        }
    }
}
