//! Client engine for droppa, a LAN file-sharing server.
//!
//! Uploads go through [`scheduler::UploadScheduler`]: a bounded number of
//! slots, each task subscribing to its SSE progress stream before the
//! multipart upload is sent. Feeds, the zipped bulk download and device
//! registration cover the rest of the server's surface.

pub mod config;
pub mod device;
pub mod download;
pub mod endpoints;
pub mod feeds;
pub mod logging;
pub mod progress;
pub mod reconnect;
pub mod scheduler;
pub mod sink;
pub mod sse;
pub mod task;
pub mod transport;
