//! Common Error Types
//!
//! Unified error handling for the calldata pipeline and the verification harness.

use thiserror::Error;

use crate::calldata::CalldataError;
use crate::harness::ServiceError;

/// Root error type for a verification scenario
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Logging errors
    #[error("logging error: {0}")]
    Logging(#[from] super::logging::LoggingError),

    /// Calldata could not be parsed or encoded for the selected proof system
    #[error("malformed calldata: {0}")]
    MalformedCalldata(#[from] CalldataError),

    /// Prover, exporter or verifier call failed
    #[error("external service failure: {0}")]
    ExternalService(#[from] ServiceError),

    /// Verification outcome did not match the expected result
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error kinds reported for a failed scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedCalldata,
    ExternalServiceFailure,
    AssertionFailure,
    Configuration,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::MalformedCalldata => "MalformedCalldata",
            ErrorKind::ExternalServiceFailure => "ExternalServiceFailure",
            ErrorKind::AssertionFailure => "AssertionFailure",
            ErrorKind::Configuration => "Configuration",
            ErrorKind::Internal => "Internal",
        };
        f.write_str(name)
    }
}

impl HarnessError {
    /// Create an assertion error
    pub fn assertion(msg: impl Into<String>) -> Self {
        Self::Assertion(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Classify into the scenario failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::MalformedCalldata(_)
            | HarnessError::ExternalService(ServiceError::Encoding(_)) => {
                ErrorKind::MalformedCalldata
            }
            HarnessError::ExternalService(_) | HarnessError::Io(_) => {
                ErrorKind::ExternalServiceFailure
            }
            HarnessError::Assertion(_) => ErrorKind::AssertionFailure,
            HarnessError::Config(_) | HarnessError::Logging(_) => ErrorKind::Configuration,
            HarnessError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get error code for reports
    pub fn error_code(&self) -> &'static str {
        match self {
            HarnessError::Config(_) => "CONFIG_ERROR",
            HarnessError::Logging(_) => "LOGGING_ERROR",
            HarnessError::MalformedCalldata(_)
            | HarnessError::ExternalService(ServiceError::Encoding(_)) => "MALFORMED_CALLDATA",
            HarnessError::ExternalService(_) => "EXTERNAL_SERVICE_FAILURE",
            HarnessError::Assertion(_) => "ASSERTION_FAILURE",
            HarnessError::Io(_) => "IO_ERROR",
            HarnessError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias using HarnessError
pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = HarnessError::from(CalldataError::TokenCount {
            system: crate::types::ProofSystem::Groth16,
            expected: ">= 8",
            actual: 3,
        });
        assert_eq!(err.kind(), ErrorKind::MalformedCalldata);
        assert_eq!(err.error_code(), "MALFORMED_CALLDATA");

        let err = HarnessError::from(ServiceError::Timeout {
            call: "verify",
            secs: 5,
        });
        assert_eq!(err.kind(), ErrorKind::ExternalServiceFailure);

        let err = HarnessError::from(ServiceError::Encoding(CalldataError::InvalidHex(
            "0xzz".to_string(),
        )));
        assert_eq!(err.kind(), ErrorKind::MalformedCalldata);
        assert_eq!(err.error_code(), "MALFORMED_CALLDATA");

        let err = HarnessError::assertion("expected false, got true");
        assert_eq!(err.kind(), ErrorKind::AssertionFailure);
        assert!(err.to_string().contains("expected false"));
    }

    #[test]
    fn test_startup_and_input_errors() {
        let err = HarnessError::from(super::super::logging::LoggingError::InitFailed(
            "a global default trace dispatcher has already been set".to_string(),
        ));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.error_code(), "LOGGING_ERROR");

        let read = || -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/proof.json")?)
        };
        let err = read().unwrap_err();
        assert!(matches!(err, HarnessError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::ExternalServiceFailure);
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
