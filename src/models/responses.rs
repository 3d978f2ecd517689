//! API response envelopes returned by the pool service

use serde::{Deserialize, Serialize};

use super::device::{Device, SessionStatus};

/// `GET /api/devices`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceListResponse {
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// Create/update/delete and session start/stop replies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/sessions/{serial}/output`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputResponse {
    #[serde(default)]
    pub output: Vec<String>,
}

/// `GET /api/sessions/{serial}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub status: SessionStatus,
}

/// Error body sent with non-success statuses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// The error text as sent, unless it is blank
    pub fn usable_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|msg| !msg.trim().is_empty())
    }
}
