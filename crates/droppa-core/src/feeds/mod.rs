//! Long-lived progress feeds: incoming files, zipping, connected devices.

mod payload;
mod watch;

pub use payload::{parse_payload, FeedError, FeedUpdate, IncomingFile, CONNECTION_REPLACED};
pub use watch::{watch_feed, FeedEnd};
