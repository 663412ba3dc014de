//! Feed payload decoding.

use serde::Deserialize;
use thiserror::Error;

use crate::endpoints::FeedKind;
use crate::progress::ProgressEvent;

/// Literal payload the server sends to a stream it is evicting.
pub const CONNECTION_REPLACED: &str = "CONNECTION_REPLACED";

/// One entry of the incoming-files feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingFile {
    pub name: String,
    pub progress: u8,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedUpdate {
    Incoming(Vec<IncomingFile>),
    Zipping(u8),
    Devices(Vec<String>),
    /// This stream was superseded by a newer connection.
    Replaced,
}

#[derive(Debug, Error)]
#[error("malformed {kind:?} feed payload: {source}")]
pub struct FeedError {
    pub kind: FeedKind,
    #[source]
    pub source: serde_json::Error,
}

pub fn parse_payload(kind: FeedKind, data: &str) -> Result<FeedUpdate, FeedError> {
    let data = data.trim();
    if data == CONNECTION_REPLACED {
        return Ok(FeedUpdate::Replaced);
    }
    let wrap = |source| FeedError { kind, source };
    match kind {
        FeedKind::Incoming => serde_json::from_str(data).map(FeedUpdate::Incoming).map_err(wrap),
        FeedKind::Zipping => ProgressEvent::parse(data)
            .map(|e| FeedUpdate::Zipping(e.progress))
            .map_err(wrap),
        FeedKind::Devices => serde_json::from_str(data).map(FeedUpdate::Devices).map_err(wrap),
    }
}
