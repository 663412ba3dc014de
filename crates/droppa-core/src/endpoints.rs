//! URL construction for the droppa server endpoints.
//!
//! Upload and progress URLs carry `deviceName` when a device name is set;
//! the device registration calls always carry it.

use url::Url;

use crate::config::{DroppaConfig, Variant};
use crate::transport::TransportError;

/// Progress feed selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Per-file progress of uploads arriving from other devices.
    Incoming,
    /// Server-side zipping of the bundle.
    Zipping,
    /// Names of registered devices.
    Devices,
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    variant: Variant,
    device_name: Option<String>,
}

impl Endpoints {
    pub fn new(server_url: &str, variant: Variant, device_name: Option<String>) -> Result<Self, TransportError> {
        let base = Url::parse(server_url)?;
        Ok(Self {
            base,
            variant,
            device_name,
        })
    }

    pub fn from_config(cfg: &DroppaConfig) -> Result<Self, TransportError> {
        Self::new(&cfg.server_url, cfg.variant, cfg.device_name.clone())
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    fn at(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    fn with_device(&self, mut url: Url) -> Url {
        if let Some(name) = &self.device_name {
            url.query_pairs_mut().append_pair("deviceName", name);
        }
        url
    }

    pub fn upload(&self) -> Url {
        let path = match self.variant {
            Variant::Plain => "upload",
            Variant::Mobile => "upload-mobile",
            Variant::Desktop => "upload-desktop",
        };
        self.with_device(self.at(&[path]))
    }

    /// `/progress/<file name>`, the name encoded as one path segment.
    pub fn progress(&self, file_name: &str) -> Url {
        self.with_device(self.at(&["progress", file_name]))
    }

    pub fn download_bundle(&self) -> Url {
        match self.variant {
            Variant::Mobile => self.at(&["download-files-mobile"]),
            Variant::Plain | Variant::Desktop => self.at(&["download-files"]),
        }
    }

    pub fn feed(&self, kind: FeedKind) -> Url {
        match kind {
            FeedKind::Incoming => match self.variant {
                Variant::Mobile => self.at(&["download-files-progress-mobile"]),
                Variant::Plain | Variant::Desktop => self.at(&["download-files-progress-desktop"]),
            },
            FeedKind::Zipping => self.at(&["zipping-progress"]),
            FeedKind::Devices => self.at(&["connected-devices"]),
        }
    }

    fn device_call(&self, path: &str, device_name: &str) -> Url {
        let mut url = self.at(&[path]);
        url.query_pairs_mut().append_pair("deviceName", device_name);
        url
    }

    pub fn init_device(&self, device_name: &str) -> Url {
        self.device_call("init-device", device_name)
    }

    pub fn uninit_device(&self, device_name: &str) -> Url {
        self.device_call("uninit-device", device_name)
    }

    pub fn connect(&self, device_name: &str) -> Url {
        self.device_call("connect", device_name)
    }
}
