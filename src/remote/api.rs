//! The pool service seam
//!
//! The admin panel treats the pool service as a black box behind [`PoolApi`]. The HTTP
//! implementation lives in [`crate::remote::client`]; tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::device::{Device, DeviceUpdate, NewDevice, SessionStatus};

/// Operations the panel issues against the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    ListDevices,
    CreateDevice,
    UpdateDevice,
    DeleteDevice,
    StartSession,
    StopSession,
    SessionOutput,
    SessionStatus,
}

impl ApiOperation {
    /// Shown when the service fails without an error message
    pub fn fallback_message(&self) -> &'static str {
        match self {
            ApiOperation::ListDevices | ApiOperation::SessionOutput => "Unknown error",
            ApiOperation::CreateDevice => "Failed to add device",
            ApiOperation::UpdateDevice => "Failed to update device",
            ApiOperation::DeleteDevice => "Failed to delete device",
            ApiOperation::StartSession => "Failed to start session",
            ApiOperation::StopSession => "Failed to stop session",
            ApiOperation::SessionStatus => "Failed to read session status",
        }
    }

    /// Shown when the service succeeds without a message
    pub fn success_message(&self) -> &'static str {
        match self {
            ApiOperation::CreateDevice => "Device added",
            ApiOperation::UpdateDevice => "Device updated",
            ApiOperation::DeleteDevice => "Device removed",
            ApiOperation::StartSession => "Session started",
            ApiOperation::StopSession => "Session stopped",
            ApiOperation::ListDevices | ApiOperation::SessionOutput | ApiOperation::SessionStatus => {
                "OK"
            }
        }
    }
}

/// Remote pool service as seen by the admin panel.
///
/// Mutating calls return the service's confirmation message.
#[async_trait]
pub trait PoolApi: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<Device>>;

    async fn create_device(&self, device: &NewDevice) -> Result<String>;

    async fn update_device(&self, serial: &str, update: &DeviceUpdate) -> Result<String>;

    async fn delete_device(&self, serial: &str) -> Result<String>;

    async fn start_session(&self, serial: &str) -> Result<String>;

    async fn stop_session(&self, serial: &str) -> Result<String>;

    /// Latest lines of the session log, oldest first
    async fn session_output(&self, serial: &str) -> Result<Vec<String>>;

    async fn session_status(&self, serial: &str) -> Result<SessionStatus>;
}
