//! Error handling for roverpool

pub mod types;

pub use types::*;
