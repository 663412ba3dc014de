//! Device registration calls keyed by `deviceName`.

use reqwest::Client;

use crate::endpoints::Endpoints;
use crate::transport::{ensure_success, TransportError};

/// This client's registration with the server.
#[derive(Debug, Clone)]
pub struct DeviceRegistration {
    client: Client,
    endpoints: Endpoints,
    name: String,
}

impl DeviceRegistration {
    pub fn new(client: Client, endpoints: Endpoints, name: impl Into<String>) -> Self {
        Self {
            client,
            endpoints,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `POST /init-device`
    pub async fn register(&self) -> Result<(), TransportError> {
        let url = self.endpoints.init_device(&self.name);
        ensure_success(self.client.post(url).send().await?).await?;
        tracing::info!(device = %self.name, "device registered");
        Ok(())
    }

    /// `POST /uninit-device`
    pub async fn unregister(&self) -> Result<(), TransportError> {
        let url = self.endpoints.uninit_device(&self.name);
        ensure_success(self.client.post(url).send().await?).await?;
        tracing::info!(device = %self.name, "device unregistered");
        Ok(())
    }

    /// `GET /connect`; returns the response body.
    pub async fn connect(&self) -> Result<String, TransportError> {
        let url = self.endpoints.connect(&self.name);
        let response = ensure_success(self.client.get(url).send().await?).await?;
        let body = response.text().await?;
        tracing::debug!(device = %self.name, "connected");
        Ok(body)
    }
}
