use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::reconnect::ReconnectPolicy;

/// Page flavour the client impersonates; selects endpoint suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// `/upload`, `/download-files`.
    #[default]
    Plain,
    /// `/upload-mobile`, `/download-files-mobile`.
    Mobile,
    /// `/upload-desktop`, `/download-files`.
    Desktop,
}

/// Feed reconnection parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Fixed delay before a new connection attempt, in milliseconds.
    pub delay_ms: u64,
    /// Stop after this many consecutive failed attempts (None = never stop).
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2500,
            max_attempts: None,
        }
    }
}

impl ReconnectConfig {
    pub fn policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            delay: Duration::from_millis(self.delay_ms),
            max_attempts: self.max_attempts,
        }
    }
}

/// Global configuration loaded from `~/.config/droppa/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppaConfig {
    /// Base URL of the droppa server (scheme, host, port).
    pub server_url: String,
    /// Endpoint flavour.
    #[serde(default)]
    pub variant: Variant,
    /// Name this client registers under; sent as `deviceName`.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Upload slots per batch.
    pub max_concurrent_uploads: usize,
    /// Feed reconnection; if missing, built-in defaults are used.
    #[serde(default)]
    pub reconnect: Option<ReconnectConfig>,
}

impl Default for DroppaConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:6969".to_string(),
            variant: Variant::Plain,
            device_name: None,
            max_concurrent_uploads: 4,
            reconnect: None,
        }
    }
}

impl DroppaConfig {
    /// Upload slot count, never below one.
    pub fn upload_slots(&self) -> usize {
        self.max_concurrent_uploads.max(1)
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        self.reconnect.clone().unwrap_or_default().policy()
    }

    /// Configured device name, else `HOSTNAME`, else `droppa-<pid>`.
    pub fn resolved_device_name(&self) -> String {
        if let Some(name) = self.device_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }
        std::env::var("HOSTNAME")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| format!("droppa-{}", std::process::id()))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("droppa")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DroppaConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<DroppaConfig> {
    if !path.exists() {
        let default_cfg = DroppaConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: DroppaConfig = toml::from_str(&data)?;
    Ok(cfg)
}
