//! External Service Interfaces
//!
//! The prover, the calldata exporter and the verifier are black boxes. These
//! traits are the seams the harness talks through.
//!
//! Implementations:
//! - `SnarkjsCli` - proving and export through the snarkjs CLI
//! - `NativeExporter` - export through the in-crate encoder
//! - `EthCallVerifier` - `eth_call` against a deployed verifier contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::calldata::{self, CalldataError};
use crate::common::config::{ExportMode, HarnessConfig};
use crate::types::{NormalizedValue, ProofSystem, VerifierArguments};

use super::snarkjs::SnarkjsCli;

/// Circuit inputs keyed by signal name, values as decimal strings
pub type CircuitInputs = BTreeMap<String, String>;

/// Compiled circuit artifacts, located by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitArtifacts {
    /// Witness generator
    pub wasm: PathBuf,
    /// Proving key
    pub zkey: PathBuf,
}

/// Raw prover output, exactly as the backend emitted it
#[derive(Debug, Clone, PartialEq)]
pub struct ProverOutput {
    pub proof: serde_json::Value,
    pub public_signals: serde_json::Value,
}

/// External service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("{call} call timed out after {secs}s")]
    Timeout { call: &'static str, secs: u64 },

    #[error("cannot encode verifier call: {0}")]
    Encoding(#[from] CalldataError),
}

/// Produces a proof and its public signals for a circuit
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProvingService: Send + Sync {
    /// Fails if the witness is inconsistent with the circuit constraints
    async fn full_prove(
        &self,
        system: ProofSystem,
        inputs: &CircuitInputs,
        artifacts: &CircuitArtifacts,
    ) -> Result<ProverOutput, ServiceError>;
}

/// Renders a proof as the backend's textual calldata
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CalldataExporter: Send + Sync {
    async fn export_calldata(
        &self,
        system: ProofSystem,
        proof: &NormalizedValue,
        public_signals: &NormalizedValue,
    ) -> Result<String, ServiceError>;
}

/// A verifier entry point
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VerifierService: Send + Sync {
    async fn verify_proof(&self, arguments: &VerifierArguments) -> Result<bool, ServiceError>;
}

/// Exporter backed by `calldata::export_calldata`
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeExporter;

#[async_trait]
impl CalldataExporter for NativeExporter {
    async fn export_calldata(
        &self,
        system: ProofSystem,
        proof: &NormalizedValue,
        public_signals: &NormalizedValue,
    ) -> Result<String, ServiceError> {
        Ok(calldata::export_calldata(system, proof, public_signals)?)
    }
}

/// Exporter selected by configuration
#[derive(Debug, Clone)]
pub enum Exporter {
    Native(NativeExporter),
    Snarkjs(SnarkjsCli),
}

impl Exporter {
    pub fn from_config(config: &HarnessConfig) -> Self {
        match config.export_mode {
            ExportMode::Native => Exporter::Native(NativeExporter),
            ExportMode::Snarkjs => Exporter::Snarkjs(SnarkjsCli::new(&config.snarkjs_bin)),
        }
    }
}

#[async_trait]
impl CalldataExporter for Exporter {
    async fn export_calldata(
        &self,
        system: ProofSystem,
        proof: &NormalizedValue,
        public_signals: &NormalizedValue,
    ) -> Result<String, ServiceError> {
        match self {
            Exporter::Native(exporter) => {
                exporter.export_calldata(system, proof, public_signals).await
            }
            Exporter::Snarkjs(cli) => cli.export_calldata(system, proof, public_signals).await,
        }
    }
}
