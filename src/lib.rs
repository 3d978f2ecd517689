//! Roverpool - RTK Receiver Pool Admin Panel
//!
//! Roverpool manages a pool of RTK positioning receivers through a remote pool service:
//! it lists master and rover devices, registers and edits them, starts and stops rover
//! processing sessions and follows a rover's NMEA session output.

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod panel;
pub mod remote;
pub mod utils;

// Re-export commonly used types
pub use errors::*;
pub use models::*;
pub use panel::{ActionOutcome, AdminPanel};
pub use remote::{HttpPoolClient, PoolApi};

/// Roverpool version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Roverpool application name
pub const APP_NAME: &str = "roverpool";
