//! SwingSync Common Utilities
//!
//! Shared infrastructure for all SwingSync crates:
//! - Error types and result aliases
//! - Capture-rate and timestamp audit utilities
//! - Tracing/logging initialization
//! - Configuration loading, including the analysis thresholds

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
