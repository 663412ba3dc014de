//! HTTP/SSE transport over reqwest.

use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::collections::VecDeque;
use std::time::Duration;

use super::{ProgressStream, Transport, TransportError};
use crate::config::Variant;
use crate::endpoints::Endpoints;
use crate::progress::ProgressEvent;
use crate::sse::{SseDecoder, SseMessage};
use crate::task::FileHandle;

/// The server rejects progress subscriptions without a User-Agent and treats
/// agents containing `Mobile` as mobile clients.
const DESKTOP_USER_AGENT: &str = concat!("droppa/", env!("CARGO_PKG_VERSION"), " (X11; Linux x86_64)");
const MOBILE_USER_AGENT: &str = concat!("droppa/", env!("CARGO_PKG_VERSION"), " (Linux; Android) Mobile");

pub fn user_agent(variant: Variant) -> &'static str {
    match variant {
        Variant::Mobile => MOBILE_USER_AGENT,
        Variant::Plain | Variant::Desktop => DESKTOP_USER_AGENT,
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoints: Endpoints,
}

impl HttpTransport {
    pub fn new(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Client for LAN use: bounded connect time, no overall timeout (SSE streams stay open).
    pub fn build_client(variant: Variant) -> Result<Client, TransportError> {
        Ok(Client::builder()
            .user_agent(user_agent(variant))
            .connect_timeout(Duration::from_secs(10))
            .build()?)
    }
}

/// Pass 2xx responses through; turn anything else into [`TransportError::Http`] with the body as detail.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Http {
        status: status.as_u16(),
        body,
    })
}

/// GET an SSE endpoint; resolves once response headers arrive with a 2xx status.
pub(crate) async fn open_event_stream(
    client: &Client,
    url: url::Url,
) -> Result<BoxStream<'static, Result<SseMessage, TransportError>>, TransportError> {
    let response = client
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await?;
    let response = ensure_success(response).await?;
    Ok(sse_messages(response))
}

/// Decode a streaming response body as SSE messages. The stream ends when the body does;
/// a body error is yielded once and ends the stream.
pub(crate) fn sse_messages(response: Response) -> BoxStream<'static, Result<SseMessage, TransportError>> {
    struct State {
        body: BoxStream<'static, reqwest::Result<bytes::Bytes>>,
        decoder: SseDecoder,
        ready: VecDeque<SseMessage>,
        done: bool,
    }

    let state = State {
        body: response.bytes_stream().boxed(),
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(msg) = st.ready.pop_front() {
                return Some((Ok(msg), st));
            }
            if st.done {
                return None;
            }
            match st.body.next().await {
                Some(Ok(chunk)) => {
                    let msgs = st.decoder.push(&chunk);
                    st.ready.extend(msgs);
                }
                Some(Err(e)) => {
                    st.done = true;
                    return Some((Err(TransportError::from(e)), st));
                }
                None => return None,
            }
        }
    })
    .boxed()
}

impl Transport for HttpTransport {
    async fn open_progress(&self, file_name: &str) -> Result<ProgressStream, TransportError> {
        let url = self.endpoints.progress(file_name);
        tracing::debug!(file = file_name, %url, "opening progress subscription");
        let messages = open_event_stream(&self.client, url).await?;
        Ok(messages
            .map(|msg| msg.and_then(|m| ProgressEvent::parse(&m.data).map_err(TransportError::from)))
            .boxed())
    }

    async fn upload(&self, file: &FileHandle) -> Result<(), TransportError> {
        let url = self.endpoints.upload();
        let part = Part::stream_with_length(file.content().clone(), file.size())
            .file_name(file.name().to_string());
        // `size` must precede `file`: the server sizes its buffer from it.
        let form = Form::new()
            .text("size", file.size().to_string())
            .part("file", part);

        tracing::debug!(file = file.name(), size = file.size(), %url, "uploading");
        let response = self.client.post(url).multipart(form).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
