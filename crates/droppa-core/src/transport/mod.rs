//! Network seam between the scheduler and the server.
//!
//! The scheduler only needs two calls: open a progress subscription for a
//! file name, and upload a file. [`HttpTransport`] does both over HTTP/SSE;
//! tests substitute their own implementation.

mod error;
mod http;

pub use error::TransportError;
pub use http::{user_agent, HttpTransport};
pub(crate) use http::{ensure_success, open_event_stream};

use futures_util::stream::BoxStream;
use std::future::Future;

use crate::progress::ProgressEvent;
use crate::task::FileHandle;

/// Open subscription: progress events until the server or the client closes it.
pub type ProgressStream = BoxStream<'static, Result<ProgressEvent, TransportError>>;

pub trait Transport: Send + Sync + 'static {
    /// Resolves once the subscription is open (or failed to open).
    fn open_progress(
        &self,
        file_name: &str,
    ) -> impl Future<Output = Result<ProgressStream, TransportError>> + Send;

    /// Resolves with the server's verdict on the upload.
    fn upload(&self, file: &FileHandle) -> impl Future<Output = Result<(), TransportError>> + Send;
}
