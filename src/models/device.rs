//! Device models shared by the client, the controller and the renderers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a receiver inside the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Reference station
    Master,
    /// Mobile unit, owns a processing session
    Rover,
    /// Any role the service stores that this client does not know; treated like a master
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Master => "Master",
            Role::Rover => "Rover",
            Role::Unknown => "Unknown",
        }
    }

    /// CSS class used by the role cell in the device table
    pub fn css_class(&self) -> &'static str {
        match self {
            Role::Master => "role-master",
            Role::Rover => "role-rover",
            Role::Unknown => "role-unknown",
        }
    }

    pub fn toggled(&self) -> Role {
        match self {
            Role::Master | Role::Unknown => Role::Rover,
            Role::Rover => Role::Master,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "master" => Ok(Role::Master),
            "rover" => Ok(Role::Rover),
            other => Err(format!("Role must be Master or Rover, got '{}'", other)),
        }
    }
}

/// Processing session state reported for rovers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Stopped,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Stopped => "stopped",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, SessionStatus::Running)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known position of a device. The service may send numbers or strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub x: Option<serde_json::Value>,
    #[serde(default)]
    pub y: Option<serde_json::Value>,
    #[serde(default)]
    pub z: Option<serde_json::Value>,
}

/// Placeholder shown for every absent value in the device table
pub const PLACEHOLDER: &str = "N/A";

/// Text of a single coordinate axis, `None` when absent or null
pub fn coordinate_text(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A registered receiver, as reported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub serial: String,
    pub ip: String,
    /// Stored by the service as given, without a range check
    pub port: i64,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_status: Option<SessionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Device {
    pub fn is_rover(&self) -> bool {
        self.role == Role::Rover
    }

    /// Session status as shown to the user. Rovers without a reported status are stopped,
    /// masters have none.
    pub fn effective_status(&self) -> Option<SessionStatus> {
        match self.role {
            Role::Rover => Some(self.session_status.unwrap_or(SessionStatus::Stopped)),
            Role::Master | Role::Unknown => None,
        }
    }

    pub fn is_session_running(&self) -> bool {
        self.effective_status().is_some_and(|s| s.is_running())
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    /// x/y/z texts, each `None` when absent
    pub fn coordinate_texts(&self) -> [Option<String>; 3] {
        match &self.coordinates {
            Some(c) => [
                coordinate_text(c.x.as_ref()),
                coordinate_text(c.y.as_ref()),
                coordinate_text(c.z.as_ref()),
            ],
            None => [None, None, None],
        }
    }
}

/// Body of `POST /api/devices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDevice {
    pub name: String,
    pub serial: String,
    pub ip: String,
    pub port: String,
    pub role: Role,
}

/// Body of `PUT /api/devices/{serial}`; the serial travels in the path only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    pub name: String,
    pub ip: String,
    pub port: String,
    pub role: Role,
}
