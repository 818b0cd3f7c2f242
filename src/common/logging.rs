//! Structured Logging
//!
//! Scenario progress is logged through `tracing`. Events are rendered as
//! JSON documents so a run can be grepped or shipped to a log collector,
//! and every scenario carries a correlation ID.
//!
//! # Usage
//!
//! ```rust,ignore
//! use zkcalldata::common::logging::{init_logging, LogLevel};
//!
//! init_logging(LogLevel::Info, false)?;
//! ```

use serde::Serialize;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::types::ProofSystem;

// ============================================================================
// Log Levels
// ============================================================================

/// Application log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

// ============================================================================
// Structured Event Types
// ============================================================================

/// Event categories for structured logging
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Calls to the proving service
    Proving,
    /// Normalization, export and parsing
    Encoding,
    /// Calls to the verifier service
    Verification,
    /// Scenario lifecycle
    Scenario,
}

/// Structured log event
#[derive(Debug, Serialize)]
pub struct LogEvent {
    /// Event timestamp (RFC 3339)
    pub timestamp: String,
    pub level: String,
    pub category: EventCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

/// Error details for failed events
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl LogEvent {
    pub fn new(level: LogLevel, category: EventCategory, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: format!("{:?}", level).to_uppercase(),
            category,
            message: message.into(),
            correlation_id: None,
            data: None,
            duration_ms: None,
            error: None,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error = Some(ErrorDetails {
            code: code.into(),
            message: message.into(),
        });
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"error\": \"failed to serialize log\", \"message\": \"{}\"}}",
                self.message
            )
        })
    }
}

// ============================================================================
// Scenario Event Logging
// ============================================================================

/// Log the outcome of one scenario case
pub fn log_scenario_event(
    scenario: &str,
    system: ProofSystem,
    case: &str,
    correlation_id: &str,
    duration_ms: u64,
    error: Option<(&str, &str)>,
) {
    let success = error.is_none();
    let level = if success { LogLevel::Info } else { LogLevel::Error };
    let mut event = LogEvent::new(
        level,
        EventCategory::Scenario,
        format!("{} {} case {}", system, case, if success { "passed" } else { "failed" }),
    )
    .with_correlation_id(correlation_id)
    .with_duration(duration_ms)
    .with_data(serde_json::json!({
        "scenario": scenario,
        "proof_system": system.to_string(),
        "case": case,
        "success": success
    }));

    if let Some((code, message)) = error {
        event = event.with_error(code, message);
    }

    if success {
        tracing::info!(target: "zkcalldata::scenario", "{}", event.to_json());
    } else {
        tracing::error!(target: "zkcalldata::scenario", "{}", event.to_json());
    }
}

/// Log the first public signal of a proof. Observability only.
pub fn log_public_signal(scenario: &str, signal: &str, correlation_id: &str) {
    let event = LogEvent::new(
        LogLevel::Info,
        EventCategory::Proving,
        format!("{} public signal = {}", scenario, signal),
    )
    .with_correlation_id(correlation_id)
    .with_data(serde_json::json!({
        "scenario": scenario,
        "public_signal": signal
    }));

    tracing::info!(target: "zkcalldata::scenario", "{}", event.to_json());
}

/// Log calldata reconstructed from the backend export
pub fn log_calldata(scenario: &str, system: ProofSystem, tokens: usize, correlation_id: &str) {
    let event = LogEvent::new(
        LogLevel::Debug,
        EventCategory::Encoding,
        format!("{} calldata parsed into {} arguments", system, tokens),
    )
    .with_correlation_id(correlation_id)
    .with_data(serde_json::json!({ "scenario": scenario }));

    tracing::debug!(target: "zkcalldata::scenario", "{}", event.to_json());
}

/// Log a verifier call result
pub fn log_verification(system: ProofSystem, accepted: bool, duration_ms: u64, correlation_id: &str) {
    let event = LogEvent::new(
        LogLevel::Debug,
        EventCategory::Verification,
        format!("{} verifier returned {}", system, accepted),
    )
    .with_correlation_id(correlation_id)
    .with_duration(duration_ms);

    tracing::debug!(target: "zkcalldata::verify", "{}", event.to_json());
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the logging system
///
/// `RUST_LOG` overrides `level` when set.
pub fn init_logging(level: LogLevel, json_format: bool) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = Level::from(level).as_str().to_lowercase();
        EnvFilter::new(format!("zkcalldata={},reqwest={}", level, level))
    });

    if json_format {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE),
        );

        subscriber
            .try_init()
            .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
    } else {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_span_events(FmtSpan::CLOSE),
        );

        subscriber
            .try_init()
            .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
    }

    Ok(())
}

/// Initialize logging from HarnessConfig
pub fn init_from_config(config: &super::config::HarnessConfig) -> Result<(), LoggingError> {
    init_logging(LogLevel::from(config.log_level.as_str()), config.log_json)
}

/// Logging errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to initialize logging: {0}")]
    InitFailed(String),
}

/// Generate a unique correlation ID for a scenario run
pub fn generate_correlation_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
