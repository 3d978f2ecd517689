//! Utility functions and helpers used throughout roverpool

pub mod logging;
