//! Common Infrastructure Module
//!
//! This module contains:
//! - Configuration loading from environment variables
//! - Structured logging setup
//! - Common error types

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{ConfigError, ExportMode, HarnessConfig};
pub use error::{ErrorKind, HarnessError, Result};
pub use logging::{
    generate_correlation_id, init_from_config, init_logging, log_calldata, log_public_signal,
    log_scenario_event, log_verification, EventCategory, LogEvent, LogLevel, LoggingError,
};
