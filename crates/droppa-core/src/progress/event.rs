use serde::Deserialize;

/// One server-pushed percentage for a named transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub progress: u8,
}

#[derive(Deserialize)]
struct RawProgress {
    progress: u64,
}

impl ProgressEvent {
    pub fn new(progress: u8) -> Self {
        Self {
            progress: progress.min(100),
        }
    }

    /// Parse an SSE `data` payload such as `{ "progress": 45 }`. Values above 100 clamp to 100.
    pub fn parse(data: &str) -> Result<Self, serde_json::Error> {
        let raw: RawProgress = serde_json::from_str(data)?;
        Ok(Self::new(raw.progress.min(100) as u8))
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }
}
