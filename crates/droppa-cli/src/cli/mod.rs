//! CLI for the droppa LAN file-sharing client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use droppa_core::config::{self, DroppaConfig, Variant};
use droppa_core::endpoints::FeedKind;
use std::path::PathBuf;

use commands::{run_connect, run_fetch, run_register, run_send, run_unregister, run_watch};

/// Top-level CLI for droppa.
#[derive(Debug, Parser)]
#[command(name = "droppa")]
#[command(about = "droppa: share files with devices on your LAN", long_about = None)]
pub struct Cli {
    /// Server base URL (overrides `server_url` in config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Name this client registers and uploads under.
    #[arg(long, global = true, value_name = "NAME")]
    pub device_name: Option<String>,

    /// Endpoint flavour.
    #[arg(long, global = true, value_enum)]
    pub variant: Option<VariantArg>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    Plain,
    Mobile,
    Desktop,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Plain => Variant::Plain,
            VariantArg::Mobile => Variant::Mobile,
            VariantArg::Desktop => Variant::Desktop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedArg {
    /// Files other devices are uploading.
    Incoming,
    /// Server-side zipping of the bundle.
    Zipping,
    /// Registered device names.
    Devices,
}

impl From<FeedArg> for FeedKind {
    fn from(f: FeedArg) -> Self {
        match f {
            FeedArg::Incoming => FeedKind::Incoming,
            FeedArg::Zipping => FeedKind::Zipping,
            FeedArg::Devices => FeedKind::Devices,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload files to the server.
    Send {
        /// Files to upload.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Upload up to N files at once (default: max_concurrent_uploads from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Download every shared file as one zip.
    Fetch {
        /// Destination path (default: droppa-files.zip in the current directory).
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Follow a progress feed until the server replaces it.
    Watch {
        #[arg(value_enum)]
        feed: FeedArg,
    },

    /// Register this device with the server.
    Register,

    /// Remove this device's registration.
    Unregister,

    /// Announce this device to the server.
    Connect,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, cfg: &mut DroppaConfig) {
        if let Some(server) = &self.server {
            cfg.server_url = server.clone();
        }
        if let Some(name) = &self.device_name {
            cfg.device_name = Some(name.clone());
        }
        if let Some(variant) = self.variant {
            cfg.variant = variant.into();
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cli.apply_overrides(&mut cfg);
        tracing::debug!("effective config: {:?}", cfg);

        match cli.command {
            CliCommand::Send { paths, jobs } => run_send(&cfg, &paths, jobs).await?,
            CliCommand::Fetch { out } => {
                let dest = match out {
                    Some(path) => path,
                    None => std::env::current_dir()?.join("droppa-files.zip"),
                };
                run_fetch(&cfg, &dest).await?;
            }
            CliCommand::Watch { feed } => run_watch(&cfg, feed.into()).await?,
            CliCommand::Register => run_register(&cfg).await?,
            CliCommand::Unregister => run_unregister(&cfg).await?,
            CliCommand::Connect => run_connect(&cfg).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
