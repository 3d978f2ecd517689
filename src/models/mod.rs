//! Data models and types used throughout roverpool

pub mod device;
pub mod events;
pub mod responses;
pub mod tui;

// Re-export commonly used types
pub use device::*;
pub use events::*;
pub use responses::*;
pub use tui::*;
