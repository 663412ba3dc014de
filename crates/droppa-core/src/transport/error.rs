//! Transport error type.

use thiserror::Error;

/// Error from any droppa HTTP/SSE call.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Server answered with a non-2xx status; `body` is its plain-text detail.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// Connection, request or body-stream failure.
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    /// Payload was not the expected JSON.
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),
    /// A stream ended before its terminal message.
    #[error("stream closed by server")]
    StreamClosed,
}

impl TransportError {
    /// Text shown on the task row for this failure.
    pub fn detail(&self) -> String {
        match self {
            TransportError::Http { status, body } if body.trim().is_empty() => {
                format!("HTTP {status}")
            }
            TransportError::Http { body, .. } => body.trim().to_string(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            TransportError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
