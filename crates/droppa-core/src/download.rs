//! Bulk download: stream the server's zip of every shared file to disk.

use futures_util::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::endpoints::Endpoints;
use crate::progress::TransferProgress;
use crate::transport::{ensure_success, TransportError};

/// Completed bundle download.
#[derive(Debug, Clone)]
pub struct BundleDownload {
    pub path: PathBuf,
    pub bytes: u64,
    pub elapsed_secs: f64,
}

/// `<dest>.part`, where the body is written until complete.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "bundle.zip".into());
    name.push(".part");
    dest.with_file_name(name)
}

/// Download the bundle to `dest`. Progress snapshots go to `progress` without
/// blocking the transfer (a full channel drops intermediate snapshots; the
/// final one is always delivered while the receiver lives).
pub async fn fetch_bundle(
    client: &Client,
    endpoints: &Endpoints,
    dest: &Path,
    progress: Option<&mpsc::Sender<TransferProgress>>,
) -> Result<BundleDownload, TransportError> {
    let part = part_path(dest);
    match stream_to(client, endpoints, &part, progress).await {
        Ok((bytes, elapsed_secs)) => {
            tokio::fs::rename(&part, dest).await?;
            tracing::info!(path = %dest.display(), bytes, "bundle downloaded");
            Ok(BundleDownload {
                path: dest.to_path_buf(),
                bytes,
                elapsed_secs,
            })
        }
        Err(e) => {
            if tokio::fs::remove_file(&part).await.is_ok() {
                tracing::debug!(path = %part.display(), "removed partial bundle");
            }
            Err(e)
        }
    }
}

async fn stream_to(
    client: &Client,
    endpoints: &Endpoints,
    part: &Path,
    progress: Option<&mpsc::Sender<TransferProgress>>,
) -> Result<(u64, f64), TransportError> {
    let url = endpoints.download_bundle();
    tracing::debug!(%url, "requesting bundle");
    let response = ensure_success(client.get(url).send().await?).await?;
    let total_bytes = response.content_length();

    let mut file = tokio::fs::File::create(part).await?;
    let mut body = response.bytes_stream();
    let started = Instant::now();
    let mut bytes_done = 0u64;

    let snapshot = |bytes_done: u64| TransferProgress {
        bytes_done,
        total_bytes,
        elapsed_secs: started.elapsed().as_secs_f64(),
    };

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        bytes_done += chunk.len() as u64;
        if let Some(tx) = progress {
            let _ = tx.try_send(snapshot(bytes_done));
        }
    }
    file.flush().await?;
    file.sync_all().await?;

    let last = snapshot(bytes_done);
    let elapsed = last.elapsed_secs;
    if let Some(tx) = progress {
        let _ = tx.send(last).await;
    }
    Ok((bytes_done, elapsed))
}
