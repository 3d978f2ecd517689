//! HTTP client for the pool service

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::api::{ApiOperation, PoolApi};
use crate::errors::{PanelError, Result};
use crate::models::device::{Device, DeviceUpdate, NewDevice, SessionStatus};
use crate::models::responses::{
    DeviceListResponse, ErrorResponse, MessageResponse, OutputResponse, SessionStatusResponse,
};

/// reqwest-backed [`PoolApi`]
#[derive(Debug, Clone)]
pub struct HttpPoolClient {
    client: Client,
    base_url: String,
}

impl HttpPoolClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PanelError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn devices_url(&self) -> String {
        format!("{}/api/devices", self.base_url)
    }

    fn device_url(&self, serial: &str) -> String {
        format!("{}/api/devices/{}", self.base_url, urlencoding::encode(serial))
    }

    fn session_url(&self, serial: &str, action: &str) -> String {
        format!(
            "{}/api/sessions/{}/{}",
            self.base_url,
            urlencoding::encode(serial),
            action
        )
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: ApiOperation,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| PanelError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PanelError::Transport(e.to_string()))?;

        debug!("{:?} -> HTTP {}", operation, status);
        interpret_response(operation, status.as_u16(), &body)
    }

    async fn execute_message(
        &self,
        operation: ApiOperation,
        request: RequestBuilder,
    ) -> Result<String> {
        let response: MessageResponse = self.execute(operation, request).await?;
        Ok(response
            .message
            .unwrap_or_else(|| operation.success_message().to_string()))
    }
}

/// Map an HTTP status and body onto the operation result.
///
/// 2xx bodies decode into `T`; anything else becomes a service error carrying the body's
/// `error` text, or the operation fallback when the body has none.
pub fn interpret_response<T: DeserializeOwned>(
    operation: ApiOperation,
    status: u16,
    body: &str,
) -> Result<T> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body)
            .map_err(|e| PanelError::InvalidResponse(format!("{:?}: {}", operation, e)));
    }

    let error_body: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
    match error_body.usable_message() {
        Some(message) => Err(PanelError::Service {
            status,
            message: message.to_string(),
        }),
        None => Err(PanelError::UnknownService {
            status,
            fallback: operation.fallback_message().to_string(),
        }),
    }
}

#[async_trait]
impl PoolApi for HttpPoolClient {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        let url = self.devices_url();
        debug!("GET {}", url);
        let response: DeviceListResponse = self
            .execute(ApiOperation::ListDevices, self.client.get(&url))
            .await?;
        Ok(response.devices)
    }

    async fn create_device(&self, device: &NewDevice) -> Result<String> {
        let url = self.devices_url();
        debug!("POST {} ({})", url, device.serial);
        self.execute_message(
            ApiOperation::CreateDevice,
            self.client.post(&url).json(device),
        )
        .await
    }

    async fn update_device(&self, serial: &str, update: &DeviceUpdate) -> Result<String> {
        let url = self.device_url(serial);
        debug!("PUT {}", url);
        self.execute_message(ApiOperation::UpdateDevice, self.client.put(&url).json(update))
            .await
    }

    async fn delete_device(&self, serial: &str) -> Result<String> {
        let url = self.device_url(serial);
        debug!("DELETE {}", url);
        self.execute_message(ApiOperation::DeleteDevice, self.client.delete(&url))
            .await
    }

    async fn start_session(&self, serial: &str) -> Result<String> {
        let url = self.session_url(serial, "start");
        debug!("POST {}", url);
        self.execute_message(ApiOperation::StartSession, self.client.post(&url))
            .await
    }

    async fn stop_session(&self, serial: &str) -> Result<String> {
        let url = self.session_url(serial, "stop");
        debug!("POST {}", url);
        self.execute_message(ApiOperation::StopSession, self.client.post(&url))
            .await
    }

    async fn session_output(&self, serial: &str) -> Result<Vec<String>> {
        let url = self.session_url(serial, "output");
        debug!("GET {}", url);
        let response: OutputResponse = self
            .execute(ApiOperation::SessionOutput, self.client.get(&url))
            .await?;
        Ok(response.output)
    }

    async fn session_status(&self, serial: &str) -> Result<SessionStatus> {
        let url = self.session_url(serial, "status");
        debug!("GET {}", url);
        let response: SessionStatusResponse = self
            .execute(ApiOperation::SessionStatus, self.client.get(&url))
            .await?;
        Ok(response.status)
    }
}
