//! snarkjs CLI adapter
//!
//! Runs `snarkjs` as a child process. Every call gets its own scratch
//! directory for the JSON files snarkjs reads and writes.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use super::services::{
    CalldataExporter, CircuitArtifacts, CircuitInputs, ProverOutput, ProvingService, ServiceError,
};
use crate::types::{NormalizedValue, ProofSystem};

/// snarkjs command line wrapper
#[derive(Debug, Clone)]
pub struct SnarkjsCli {
    bin: String,
}

impl SnarkjsCli {
    pub fn new(bin: &str) -> Self {
        Self {
            bin: bin.to_string(),
        }
    }

    /// `<protocol> fullprove <input> <wasm> <zkey> <proof> <public>`
    fn fullprove_command(
        &self,
        system: ProofSystem,
        input: &Path,
        artifacts: &CircuitArtifacts,
        proof: &Path,
        public: &Path,
    ) -> Command {
        let mut command = Command::new(&self.bin);
        command
            .arg(system.protocol())
            .arg("fullprove")
            .arg(input)
            .arg(&artifacts.wasm)
            .arg(&artifacts.zkey)
            .arg(proof)
            .arg(public);
        command
    }

    /// `zkey export soliditycalldata <public> <proof>`
    fn export_command(&self, public: &Path, proof: &Path) -> Command {
        let mut command = Command::new(&self.bin);
        command
            .arg("zkey")
            .arg("export")
            .arg("soliditycalldata")
            .arg(public)
            .arg(proof);
        command
    }

    /// Run to completion, returning stdout
    async fn run(&self, mut command: Command, name: &str) -> Result<Vec<u8>, ServiceError> {
        let label = format!("{} {}", self.bin, name);
        tracing::debug!(command = %label, "running snarkjs");

        let output = command
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ServiceError::Spawn {
                command: label.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ServiceError::CommandFailed {
                command: label,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

async fn read_json(path: &Path) -> Result<serde_json::Value, ServiceError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl ProvingService for SnarkjsCli {
    async fn full_prove(
        &self,
        system: ProofSystem,
        inputs: &CircuitInputs,
        artifacts: &CircuitArtifacts,
    ) -> Result<ProverOutput, ServiceError> {
        let scratch = tempfile::tempdir()?;
        let input_path = scratch.path().join("input.json");
        let proof_path = scratch.path().join("proof.json");
        let public_path = scratch.path().join("public.json");

        tokio::fs::write(&input_path, serde_json::to_vec(inputs)?).await?;

        let command =
            self.fullprove_command(system, &input_path, artifacts, &proof_path, &public_path);
        self.run(command, &format!("{} fullprove", system)).await?;

        Ok(ProverOutput {
            proof: read_json(&proof_path).await?,
            public_signals: read_json(&public_path).await?,
        })
    }
}

#[async_trait]
impl CalldataExporter for SnarkjsCli {
    async fn export_calldata(
        &self,
        _system: ProofSystem,
        proof: &NormalizedValue,
        public_signals: &NormalizedValue,
    ) -> Result<String, ServiceError> {
        // snarkjs picks the protocol from the proof file itself
        let scratch = tempfile::tempdir()?;
        let proof_path = scratch.path().join("proof.json");
        let public_path = scratch.path().join("public.json");

        tokio::fs::write(&proof_path, serde_json::to_vec(&proof.to_json())?).await?;
        tokio::fs::write(&public_path, serde_json::to_vec(&public_signals.to_json())?).await?;

        let stdout = self
            .run(self.export_command(&public_path, &proof_path), "zkey export soliditycalldata")
            .await?;

        let calldata = String::from_utf8(stdout)
            .map_err(|e| ServiceError::InvalidResponse(format!("calldata is not UTF-8: {}", e)))?;
        Ok(calldata.trim().to_string())
    }
}
