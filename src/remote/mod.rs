//! Remote operations against the pool service
//!
//! This module provides the service seam used by the panel controller and its HTTP
//! implementation.

pub mod api;
pub mod client;

pub use api::*;
pub use client::HttpPoolClient;
