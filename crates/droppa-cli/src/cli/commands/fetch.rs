//! `droppa fetch` – download the zip bundle of every shared file.

use anyhow::Result;
use droppa_core::config::DroppaConfig;
use droppa_core::download::fetch_bundle;
use droppa_core::endpoints::Endpoints;
use droppa_core::progress::TransferProgress;
use droppa_core::transport::HttpTransport;
use std::path::Path;
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u64 = 500;

fn progress_line(stats: &TransferProgress) -> String {
    let done_mib = stats.bytes_done as f64 / 1_048_576.0;
    let rate_mib = stats.bytes_per_sec() / 1_048_576.0;
    match (stats.total_bytes, stats.percent()) {
        (Some(total), Some(pct)) => {
            let eta = stats
                .eta_secs()
                .map(|s| format!("{:.0}s", s))
                .unwrap_or_else(|| "?".to_string());
            format!(
                "  {:.1} / {:.1} MiB ({}%)  {:.2} MiB/s  ETA {}",
                done_mib,
                total as f64 / 1_048_576.0,
                pct,
                rate_mib,
                eta
            )
        }
        _ => format!("  {:.1} MiB  {:.2} MiB/s", done_mib, rate_mib),
    }
}

pub async fn run_fetch(cfg: &DroppaConfig, dest: &Path) -> Result<()> {
    let endpoints = Endpoints::from_config(cfg)?;
    let client = HttpTransport::build_client(endpoints.variant())?;

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<TransferProgress>(16);
    let printer = tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        let mut pending = None;
        while let Some(stats) = progress_rx.recv().await {
            let due = last_print
                .map(|t| t.elapsed().as_millis() as u64 >= PROGRESS_INTERVAL_MS)
                .unwrap_or(true);
            if due {
                println!("{}", progress_line(&stats));
                last_print = Some(Instant::now());
                pending = None;
            } else {
                pending = Some(stats);
            }
        }
        if let Some(stats) = pending {
            println!("{}", progress_line(&stats));
        }
    });

    let result = fetch_bundle(&client, &endpoints, dest, Some(&progress_tx)).await;
    drop(progress_tx);
    let _ = printer.await;

    let done = result?;
    println!(
        "saved {} bytes to {} in {:.1}s",
        done.bytes,
        done.path.display(),
        done.elapsed_secs
    );
    Ok(())
}
