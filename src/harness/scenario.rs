//! Verification scenarios
//!
//! A scenario proves one circuit with one proof system and checks the
//! verifier both ways:
//!
//! ```text
//! positive: Uninitialized -> Proving -> Normalizing -> Encoding -> Verifying -> Asserted
//! negative: Uninitialized -> Verifying -> Asserted
//! ```
//!
//! The negative case skips the prover entirely and sends structurally valid
//! but degenerate arguments, which the verifier must reject.

use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::services::{
    CalldataExporter, CircuitArtifacts, CircuitInputs, ProvingService, ServiceError,
    VerifierService,
};
use crate::calldata::{decode_public_signals, parse_calldata};
use crate::common::config::{ConfigError, DEFAULT_CALL_TIMEOUT_SECS};
use crate::common::error::{ErrorKind, HarnessError};
use crate::common::logging::{
    generate_correlation_id, log_calldata, log_public_signal, log_scenario_event, log_verification,
};
use crate::normalize::{canonical_decimal, normalize};
use crate::types::{ProofSystem, VerifierArguments};

/// One circuit, one proof system, one verifier contract
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub proof_system: ProofSystem,
    /// Private and public circuit inputs
    pub inputs: CircuitInputs,
    pub wasm: PathBuf,
    pub zkey: PathBuf,
    /// Verifier contract address
    pub verifier: String,
    /// Expected first public signal, decimal or hex
    #[serde(default)]
    pub expected_signal: Option<String>,
    /// Number of public signals the verifier takes
    #[serde(default = "default_public_signals")]
    pub public_signals: usize,
}

fn default_public_signals() -> usize {
    1
}

impl Scenario {
    pub fn artifacts(&self) -> CircuitArtifacts {
        CircuitArtifacts {
            wasm: self.wasm.clone(),
            zkey: self.zkey.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default, rename = "scenario")]
    scenarios: Vec<Scenario>,
}

/// Parse `[[scenario]]` tables
pub fn parse_scenarios(contents: &str) -> Result<Vec<Scenario>, ConfigError> {
    let file: ScenarioFile = toml::from_str(contents)
        .map_err(|e| ConfigError::ScenarioFile("<inline>".to_string(), e.to_string()))?;
    Ok(file.scenarios)
}

/// Load scenarios from a TOML file
pub fn load_scenarios(path: &Path) -> Result<Vec<Scenario>, ConfigError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ScenarioFile(display.clone(), e.to_string()))?;
    let file: ScenarioFile =
        toml::from_str(&contents).map_err(|e| ConfigError::ScenarioFile(display, e.to_string()))?;
    Ok(file.scenarios)
}

/// Where a scenario is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioState {
    Uninitialized,
    Proving,
    Normalizing,
    Encoding,
    Verifying,
    Asserted,
}

impl fmt::Display for ScenarioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScenarioState::Uninitialized => "uninitialized",
            ScenarioState::Proving => "proving",
            ScenarioState::Normalizing => "normalizing",
            ScenarioState::Encoding => "encoding",
            ScenarioState::Verifying => "verifying",
            ScenarioState::Asserted => "asserting",
        };
        f.write_str(name)
    }
}

/// Which verifier outcome a case expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    /// A real proof, must verify
    Positive,
    /// Degenerate arguments, must be rejected
    Negative,
}

impl CaseKind {
    pub fn expected(&self) -> bool {
        matches!(self, CaseKind::Positive)
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            CaseKind::Positive => "positive",
            CaseKind::Negative => "negative",
        })
    }
}

/// Successful case outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub scenario: String,
    pub proof_system: ProofSystem,
    pub case: CaseKind,
    /// What the verifier returned
    pub verified: bool,
    /// Public signals as canonical decimal strings (empty for negative cases)
    pub public_signals: Vec<String>,
    pub duration_ms: u64,
}

/// A failed case, identifying the proof system, the case and the stage
#[derive(Debug, thiserror::Error)]
#[error("{proof_system} {case} case of '{scenario}' failed while {state}: {source}")]
pub struct ScenarioFailure {
    pub scenario: String,
    pub proof_system: ProofSystem,
    pub case: CaseKind,
    pub state: ScenarioState,
    #[source]
    pub source: HarnessError,
}

impl ScenarioFailure {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Result of one case
pub type CaseResult = Result<CaseReport, ScenarioFailure>;

/// Drives scenarios against one set of services.
///
/// A harness owns its verifier handle; build one per scenario when running
/// scenarios concurrently.
pub struct VerificationHarness<P, E, V> {
    prover: P,
    exporter: E,
    verifier: V,
    call_timeout: Duration,
    correlation_id: String,
}

impl<P, E, V> VerificationHarness<P, E, V>
where
    P: ProvingService,
    E: CalldataExporter,
    V: VerifierService,
{
    pub fn new(prover: P, exporter: E, verifier: V) -> Self {
        Self {
            prover,
            exporter,
            verifier,
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
            correlation_id: generate_correlation_id(),
        }
    }

    /// Bound every external call by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Run the positive then the negative case
    pub async fn run_scenario(&self, scenario: &Scenario) -> Vec<CaseResult> {
        vec![
            self.run_positive_case(scenario).await,
            self.run_negative_case(scenario).await,
        ]
    }

    /// Prove, normalize, export, parse, verify. The verifier must accept.
    pub async fn run_positive_case(&self, scenario: &Scenario) -> CaseResult {
        let started = Instant::now();
        let mut state = ScenarioState::Uninitialized;
        let result = self.positive_steps(scenario, &mut state).await;
        self.finish(scenario, CaseKind::Positive, state, started, result)
    }

    /// Verify degenerate arguments. The verifier must reject.
    pub async fn run_negative_case(&self, scenario: &Scenario) -> CaseResult {
        let started = Instant::now();
        let mut state = ScenarioState::Uninitialized;
        let result = self.negative_steps(scenario, &mut state).await;
        self.finish(scenario, CaseKind::Negative, state, started, result)
    }

    async fn positive_steps(
        &self,
        scenario: &Scenario,
        state: &mut ScenarioState,
    ) -> Result<(bool, Vec<String>), HarnessError> {
        let system = scenario.proof_system;

        *state = ScenarioState::Proving;
        let output = self
            .bounded(
                "prove",
                self.prover
                    .full_prove(system, &scenario.inputs, &scenario.artifacts()),
            )
            .await?;

        *state = ScenarioState::Normalizing;
        let proof = normalize(&output.proof);
        let public_signals = normalize(&output.public_signals);
        let decoded = decode_public_signals(&public_signals)?;
        if let Some(first) = decoded.first() {
            log_public_signal(&scenario.name, &first.to_string(), &self.correlation_id);
        }
        let signals: Vec<String> = decoded.0.iter().map(ToString::to_string).collect();

        *state = ScenarioState::Encoding;
        let calldata = self
            .bounded(
                "export",
                self.exporter
                    .export_calldata(system, &proof, &public_signals),
            )
            .await?;
        let arguments = parse_calldata(system, &calldata)?;
        log_calldata(
            &scenario.name,
            system,
            arguments.flat_tokens().len(),
            &self.correlation_id,
        );

        *state = ScenarioState::Verifying;
        let verified = self.verify(&arguments).await?;

        *state = ScenarioState::Asserted;
        if verified != CaseKind::Positive.expected() {
            return Err(HarnessError::assertion(
                "verifier rejected a proof the prover produced",
            ));
        }
        if let Some(expected) = &scenario.expected_signal {
            let expected = canonical_decimal(expected).unwrap_or_else(|| expected.clone());
            if signals.first() != Some(&expected) {
                return Err(HarnessError::assertion(format!(
                    "expected public signal {}, got {:?}",
                    expected,
                    signals.first()
                )));
            }
        }

        Ok((verified, signals))
    }

    async fn negative_steps(
        &self,
        scenario: &Scenario,
        state: &mut ScenarioState,
    ) -> Result<(bool, Vec<String>), HarnessError> {
        let arguments =
            VerifierArguments::degenerate(scenario.proof_system, scenario.public_signals);

        *state = ScenarioState::Verifying;
        let verified = self.verify(&arguments).await?;

        *state = ScenarioState::Asserted;
        if verified != CaseKind::Negative.expected() {
            return Err(HarnessError::assertion(
                "verifier accepted degenerate arguments",
            ));
        }

        Ok((verified, Vec::new()))
    }

    async fn verify(&self, arguments: &VerifierArguments) -> Result<bool, HarnessError> {
        let started = Instant::now();
        let verified = self
            .bounded("verify", self.verifier.verify_proof(arguments))
            .await?;
        log_verification(
            arguments.system(),
            verified,
            started.elapsed().as_millis() as u64,
            &self.correlation_id,
        );
        Ok(verified)
    }

    async fn bounded<T, F>(&self, call: &'static str, future: F) -> Result<T, HarnessError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        match tokio::time::timeout(self.call_timeout, future).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ServiceError::Timeout {
                call,
                secs: self.call_timeout.as_secs(),
            }
            .into()),
        }
    }

    fn finish(
        &self,
        scenario: &Scenario,
        case: CaseKind,
        state: ScenarioState,
        started: Instant,
        result: Result<(bool, Vec<String>), HarnessError>,
    ) -> CaseResult {
        let duration_ms = started.elapsed().as_millis() as u64;
        let case_name = case.to_string();

        match result {
            Ok((verified, public_signals)) => {
                log_scenario_event(
                    &scenario.name,
                    scenario.proof_system,
                    &case_name,
                    &self.correlation_id,
                    duration_ms,
                    None,
                );
                Ok(CaseReport {
                    scenario: scenario.name.clone(),
                    proof_system: scenario.proof_system,
                    case,
                    verified,
                    public_signals,
                    duration_ms,
                })
            }
            Err(source) => {
                log_scenario_event(
                    &scenario.name,
                    scenario.proof_system,
                    &case_name,
                    &self.correlation_id,
                    duration_ms,
                    Some((source.error_code(), &source.to_string())),
                );
                Err(ScenarioFailure {
                    scenario: scenario.name.clone(),
                    proof_system: scenario.proof_system,
                    case,
                    state,
                    source,
                })
            }
        }
    }
}
