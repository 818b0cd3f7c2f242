//! Environment-based Configuration
//!
//! Settings for the external collaborators (snarkjs, JSON-RPC node) and for
//! logging are read from environment variables. `main` loads a `.env` file
//! first when one is present.
//!
//! # Environment Variables
//!
//! - `ZKCALL_SNARKJS` - snarkjs executable (default: "snarkjs")
//! - `ZKCALL_RPC_URL` - JSON-RPC endpoint hosting the verifier contracts
//!   (default: "http://127.0.0.1:8545")
//! - `ZKCALL_SCENARIOS` - scenario definition file (default: "scenarios.toml")
//! - `ZKCALL_EXPORT_MODE` - "native" or "snarkjs" (default: "native")
//! - `ZKCALL_CALL_TIMEOUT_SECS` - bound on each prove/export/verify call (default: 120)
//! - `ZKCALL_LOG_LEVEL` - trace, debug, info, warn, error (default: "info")
//! - `ZKCALL_LOG_JSON` - set to "1" for JSON log lines

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 120;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("failed to read scenario file {0}: {1}")]
    ScenarioFile(String, String),
}

/// Which implementation produces the textual calldata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// In-crate encoder
    Native,
    /// `snarkjs zkey export soliditycalldata`
    Snarkjs,
}

impl FromStr for ExportMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "native" => Ok(ExportMode::Native),
            "snarkjs" => Ok(ExportMode::Snarkjs),
            _ => Err(ConfigError::InvalidValue(
                "ZKCALL_EXPORT_MODE".to_string(),
                format!("unknown export mode: {} (use 'native' or 'snarkjs')", s),
            )),
        }
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// snarkjs executable
    pub snarkjs_bin: String,

    /// JSON-RPC endpoint for `eth_call`
    pub rpc_url: String,

    /// Scenario definition file
    pub scenarios_path: PathBuf,

    /// Calldata export implementation
    pub export_mode: ExportMode,

    /// Upper bound on every external call
    pub call_timeout: Duration,

    /// Log level
    pub log_level: String,

    /// Emit JSON log lines
    pub log_json: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            snarkjs_bin: "snarkjs".to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            scenarios_path: PathBuf::from("scenarios.toml"),
            export_mode: ExportMode::Native,
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let snarkjs_bin = env::var("ZKCALL_SNARKJS").unwrap_or(defaults.snarkjs_bin);
        let rpc_url = env::var("ZKCALL_RPC_URL").unwrap_or(defaults.rpc_url);

        let scenarios_path = env::var("ZKCALL_SCENARIOS")
            .map(PathBuf::from)
            .unwrap_or(defaults.scenarios_path);

        let export_mode = match env::var("ZKCALL_EXPORT_MODE") {
            Ok(mode) => mode.parse()?,
            Err(_) => defaults.export_mode,
        };

        let call_timeout = match env::var("ZKCALL_CALL_TIMEOUT_SECS") {
            Ok(secs) => Duration::from_secs(secs.parse().map_err(|_| {
                ConfigError::InvalidValue(
                    "ZKCALL_CALL_TIMEOUT_SECS".to_string(),
                    "must be a number".to_string(),
                )
            })?),
            Err(_) => defaults.call_timeout,
        };

        let log_level = env::var("ZKCALL_LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_json = env::var("ZKCALL_LOG_JSON").map(|v| v == "1").unwrap_or(false);

        let config = Self {
            snarkjs_bin,
            rpc_url,
            scenarios_path,
            export_mode,
            call_timeout,
            log_level,
            log_json,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no scenario could run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "ZKCALL_RPC_URL".to_string(),
                format!("expected an http(s) URL, got {}", self.rpc_url),
            ));
        }

        if self.call_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "ZKCALL_CALL_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        if self.snarkjs_bin.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("ZKCALL_SNARKJS".to_string()));
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("=== zkcalldata Configuration ===");
        println!("snarkjs: {}", self.snarkjs_bin);
        println!("RPC URL: {}", self.rpc_url);
        println!("Scenarios: {}", self.scenarios_path.display());
        println!("Export Mode: {:?}", self.export_mode);
        println!("Call Timeout: {}s", self.call_timeout.as_secs());
        println!("Log Level: {}", self.log_level);
        println!("================================");
    }
}
