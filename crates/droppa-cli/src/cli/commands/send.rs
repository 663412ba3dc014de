//! `droppa send` – upload files through the scheduler.

use anyhow::{Context, Result};
use droppa_core::config::DroppaConfig;
use droppa_core::endpoints::Endpoints;
use droppa_core::scheduler::{TaskOutcome, UploadScheduler};
use droppa_core::sink::StatusSink;
use droppa_core::task::{FileHandle, TaskRegistry, TaskStatus};
use droppa_core::transport::HttpTransport;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Percent lines are printed every `PERCENT_STEP` points.
const PERCENT_STEP: u8 = 25;

/// Terminal row for one task: status transitions and coarse progress.
struct ConsoleSink {
    name: String,
    last_step: AtomicU8,
}

impl ConsoleSink {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            last_step: AtomicU8::new(0),
        }
    }
}

impl StatusSink for ConsoleSink {
    fn set_percent(&self, percent: u8) {
        let step = percent / PERCENT_STEP;
        if step > self.last_step.fetch_max(step, Ordering::Relaxed) {
            println!("  {:<32} {:>3}%", self.name, percent);
        }
    }

    fn set_status(&self, status: TaskStatus) {
        if status == TaskStatus::InProgress {
            self.last_step.store(0, Ordering::Relaxed);
        }
        println!("  {:<32} {}", self.name, status);
    }

    fn set_detail(&self, detail: &str) {
        println!("  {:<32} {}", self.name, detail);
    }
}

pub async fn run_send(cfg: &DroppaConfig, paths: &[PathBuf], jobs: Option<usize>) -> Result<()> {
    let endpoints = Endpoints::from_config(cfg)?;
    let client = HttpTransport::build_client(endpoints.variant())?;
    let transport = HttpTransport::new(client, endpoints);

    let mut registry = TaskRegistry::new();
    for path in paths {
        let file = FileHandle::read(path)
            .await
            .with_context(|| format!("read {}", path.display()))?;
        let sink = Arc::new(ConsoleSink::new(file.name()));
        registry.add(file, sink);
    }
    if registry.len() < paths.len() {
        tracing::info!(
            selected = paths.len(),
            tasks = registry.len(),
            "duplicate file names share one task"
        );
    }

    let slots = jobs.unwrap_or_else(|| cfg.upload_slots());
    let scheduler = UploadScheduler::new(Arc::new(transport), slots);
    let report = scheduler.run_registry(&registry).await;

    let summary = registry.summary();
    println!(
        "{} sent, {} failed ({} file(s), {} slot(s))",
        summary.success,
        summary.failure,
        summary.total(),
        scheduler.slots()
    );
    for (name, outcome) in report.outcomes() {
        if let TaskOutcome::Failed(detail) = outcome {
            println!("  failed: {name}: {detail}");
        }
    }

    if report.has_failures() {
        anyhow::bail!("{} upload(s) failed", report.failed());
    }
    Ok(())
}
