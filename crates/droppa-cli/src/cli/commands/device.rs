//! `droppa register`, `droppa unregister`, `droppa connect`.

use anyhow::Result;
use droppa_core::config::DroppaConfig;
use droppa_core::device::DeviceRegistration;
use droppa_core::endpoints::Endpoints;
use droppa_core::transport::HttpTransport;

fn registration(cfg: &DroppaConfig) -> Result<DeviceRegistration> {
    let endpoints = Endpoints::from_config(cfg)?;
    let client = HttpTransport::build_client(endpoints.variant())?;
    Ok(DeviceRegistration::new(client, endpoints, cfg.resolved_device_name()))
}

pub async fn run_register(cfg: &DroppaConfig) -> Result<()> {
    let device = registration(cfg)?;
    device.register().await?;
    println!("Registered device {}.", device.name());
    Ok(())
}

pub async fn run_unregister(cfg: &DroppaConfig) -> Result<()> {
    let device = registration(cfg)?;
    device.unregister().await?;
    println!("Unregistered device {}.", device.name());
    Ok(())
}

pub async fn run_connect(cfg: &DroppaConfig) -> Result<()> {
    let device = registration(cfg)?;
    let reply = device.connect().await?;
    let reply = reply.trim();
    if reply.is_empty() {
        println!("Connected as {}.", device.name());
    } else {
        println!("Connected as {}: {}", device.name(), reply);
    }
    Ok(())
}
