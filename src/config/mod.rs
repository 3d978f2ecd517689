//! Configuration management for roverpool

pub mod app_config;

pub use app_config::*;
