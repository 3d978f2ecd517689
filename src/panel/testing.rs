//! In-memory pool service for controller tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::errors::{PanelError, Result};
use crate::models::device::{Device, DeviceUpdate, NewDevice, Role, SessionStatus};
use crate::remote::api::{ApiOperation, PoolApi};

/// Scripted failure for one operation
#[derive(Debug, Clone)]
pub enum FakeFailure {
    Service(String),
    Unknown,
    Transport(String),
}

impl FakeFailure {
    fn to_error(&self, operation: ApiOperation) -> PanelError {
        match self {
            FakeFailure::Service(message) => PanelError::Service {
                status: 500,
                message: message.clone(),
            },
            FakeFailure::Unknown => PanelError::UnknownService {
                status: 500,
                fallback: operation.fallback_message().to_string(),
            },
            FakeFailure::Transport(message) => PanelError::Transport(message.clone()),
        }
    }
}

#[derive(Default)]
struct FakeState {
    devices: Vec<Device>,
    output: HashMap<String, Vec<String>>,
    failures: HashMap<ApiOperation, FakeFailure>,
    calls: HashMap<ApiOperation, usize>,
    latency: Duration,
}

#[derive(Default)]
pub struct FakePool {
    state: Mutex<FakeState>,
}

pub fn rover(serial: &str, status: SessionStatus) -> Device {
    Device {
        name: format!("Rover {}", serial),
        serial: serial.to_string(),
        ip: "10.0.0.5".to_string(),
        port: 9001,
        role: Role::Rover,
        session_status: Some(status),
        coordinates: None,
    }
}

pub fn master(serial: &str) -> Device {
    Device {
        name: format!("Base {}", serial),
        serial: serial.to_string(),
        ip: "10.0.0.1".to_string(),
        port: 5000,
        role: Role::Master,
        session_status: None,
        coordinates: None,
    }
}

impl FakePool {
    pub fn with_devices(devices: Vec<Device>) -> Self {
        let pool = Self::default();
        pool.set_devices(devices);
        pool
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_devices(&self, devices: Vec<Device>) {
        self.lock().devices = devices;
    }

    pub fn devices(&self) -> Vec<Device> {
        self.lock().devices.clone()
    }

    pub fn set_status(&self, serial: &str, status: SessionStatus) {
        if let Some(device) = self.lock().devices.iter_mut().find(|d| d.serial == serial) {
            device.session_status = Some(status);
        }
    }

    pub fn set_output(&self, serial: &str, lines: &[&str]) {
        self.lock().output.insert(
            serial.to_string(),
            lines.iter().map(|l| l.to_string()).collect(),
        );
    }

    pub fn fail(&self, operation: ApiOperation, failure: FakeFailure) {
        self.lock().failures.insert(operation, failure);
    }

    pub fn recover(&self, operation: ApiOperation) {
        self.lock().failures.remove(&operation);
    }

    /// Delay applied before every response
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    pub fn calls(&self, operation: ApiOperation) -> usize {
        self.lock().calls.get(&operation).copied().unwrap_or(0)
    }

    /// Count the call, wait out the latency, then report a scripted failure if any
    async fn enter(&self, operation: ApiOperation) -> Result<()> {
        let latency = {
            let mut state = self.lock();
            *state.calls.entry(operation).or_default() += 1;
            state.latency
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        match self.lock().failures.get(&operation) {
            Some(failure) => Err(failure.to_error(operation)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PoolApi for FakePool {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        self.enter(ApiOperation::ListDevices).await?;
        Ok(self.devices())
    }

    async fn create_device(&self, device: &NewDevice) -> Result<String> {
        self.enter(ApiOperation::CreateDevice).await?;
        let port = device.port.parse::<i64>().map_err(|_| PanelError::Service {
            status: 400,
            message: "Invalid port".to_string(),
        })?;
        self.lock().devices.push(Device {
            name: device.name.clone(),
            serial: device.serial.clone(),
            ip: device.ip.clone(),
            port,
            role: device.role,
            session_status: None,
            coordinates: None,
        });
        Ok("ok".to_string())
    }

    async fn update_device(&self, serial: &str, update: &DeviceUpdate) -> Result<String> {
        self.enter(ApiOperation::UpdateDevice).await?;
        let mut state = self.lock();
        let device = state
            .devices
            .iter_mut()
            .find(|d| d.serial == serial)
            .ok_or_else(|| PanelError::Service {
                status: 404,
                message: "Device not found".to_string(),
            })?;
        device.name = update.name.clone();
        device.ip = update.ip.clone();
        device.port = update.port.parse().unwrap_or(device.port);
        device.role = update.role;
        Ok("updated".to_string())
    }

    async fn delete_device(&self, serial: &str) -> Result<String> {
        self.enter(ApiOperation::DeleteDevice).await?;
        self.lock().devices.retain(|d| d.serial != serial);
        Ok("deleted".to_string())
    }

    async fn start_session(&self, serial: &str) -> Result<String> {
        self.enter(ApiOperation::StartSession).await?;
        self.set_status(serial, SessionStatus::Running);
        Ok(format!("Session started for {}", serial))
    }

    async fn stop_session(&self, serial: &str) -> Result<String> {
        self.enter(ApiOperation::StopSession).await?;
        self.set_status(serial, SessionStatus::Stopped);
        Ok(format!("Session stopped for {}", serial))
    }

    async fn session_output(&self, serial: &str) -> Result<Vec<String>> {
        self.enter(ApiOperation::SessionOutput).await?;
        Ok(self.lock().output.get(serial).cloned().unwrap_or_default())
    }

    async fn session_status(&self, serial: &str) -> Result<SessionStatus> {
        self.enter(ApiOperation::SessionStatus).await?;
        let state = self.lock();
        let device = state.devices.iter().find(|d| d.serial == serial);
        Ok(device
            .and_then(|d| d.session_status)
            .unwrap_or(SessionStatus::Stopped))
    }
}
