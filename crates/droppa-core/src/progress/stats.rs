//! Streamed transfer statistics (bytes done, rate, ETA).
//!
//! Consumers compute rate = bytes_done / elapsed_secs and
//! ETA = (total_bytes - bytes_done) / rate.

/// Snapshot of one streamed transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferProgress {
    /// Bytes received so far.
    pub bytes_done: u64,
    /// Total from `Content-Length`, when the server sent one.
    pub total_bytes: Option<u64>,
    /// Seconds since the transfer started.
    pub elapsed_secs: f64,
}

impl TransferProgress {
    /// Bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Fraction complete in [0.0, 1.0]; None without a known total.
    pub fn fraction(&self) -> Option<f64> {
        let total = self.total_bytes?;
        if total == 0 {
            return Some(1.0);
        }
        Some((self.bytes_done as f64 / total as f64).min(1.0))
    }

    /// Whole percentage, as the progress bars show it.
    pub fn percent(&self) -> Option<u8> {
        self.fraction().map(|f| (f * 100.0).floor() as u8)
    }

    /// Seconds remaining (None without a total or while the rate is 0).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total_bytes?.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }
}
