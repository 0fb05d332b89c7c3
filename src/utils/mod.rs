//! Utility modules for common functionality

pub mod shutdown;

// Re-export commonly used items
pub use shutdown::{setup_signal_handlers, Shutdown};

// vim: ts=4
