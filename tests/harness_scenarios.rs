//! Scenario runs against in-process fake services.
//!
//! The fake prover returns fixture proofs whose public signal is the product
//! of the circuit inputs. The fake verifier accepts exactly the arguments the
//! fixture proofs encode to.

use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use zkcalldata::harness::{
    load_scenarios, parse_scenarios, run_scenarios, CaseKind, CircuitArtifacts, CircuitInputs,
    NativeExporter, ProverOutput, ProvingService, ScenarioState, ServiceError,
    VerificationHarness, VerifierService,
};
use zkcalldata::{encode_arguments, normalize, ErrorKind, ProofSystem, VerifierArguments};

fn fixture_proof(system: ProofSystem) -> serde_json::Value {
    let contents = match system {
        ProofSystem::Groth16 => include_str!("fixtures/groth16_proof.json"),
        ProofSystem::Plonk => include_str!("fixtures/plonk_proof.json"),
    };
    serde_json::from_str(contents).unwrap()
}

struct FixtureProver;

#[async_trait]
impl ProvingService for FixtureProver {
    async fn full_prove(
        &self,
        system: ProofSystem,
        inputs: &CircuitInputs,
        _artifacts: &CircuitArtifacts,
    ) -> Result<ProverOutput, ServiceError> {
        let mut product: u64 = 1;
        for value in inputs.values() {
            product *= value.parse::<u64>().map_err(|e| ServiceError::CommandFailed {
                command: "fake fullprove".to_string(),
                status: "exit status: 1".to_string(),
                stderr: e.to_string(),
            })?;
        }

        Ok(ProverOutput {
            proof: fixture_proof(system),
            public_signals: json!([product.to_string()]),
        })
    }
}

/// Accepts the fixture proof for its system with any non-zero signal
struct FixtureVerifier {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl VerifierService for FixtureVerifier {
    async fn verify_proof(&self, arguments: &VerifierArguments) -> Result<bool, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let system = arguments.system();
        let signals = normalize(&json!(arguments
            .public_inputs()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()));
        let expected = encode_arguments(system, &normalize(&fixture_proof(system)), &signals)?;

        Ok(*arguments == expected && arguments.public_inputs().iter().all(|v| !v.is_zero()))
    }
}

#[tokio::test]
async fn shipped_scenarios_pass_against_fixture_services() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios.toml");
    let scenarios = load_scenarios(&path).unwrap();
    assert_eq!(scenarios.len(), 3);

    let calls = Arc::new(AtomicUsize::new(0));
    let results = run_scenarios(scenarios, |_| {
        Ok(VerificationHarness::new(
            FixtureProver,
            NativeExporter,
            FixtureVerifier {
                calls: calls.clone(),
            },
        ))
    })
    .await;

    assert_eq!(results.len(), 6);
    for result in &results {
        let report = result.as_ref().unwrap();
        assert_eq!(report.verified, report.case == CaseKind::Positive);
    }

    let signals: Vec<_> = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .filter(|r| r.case == CaseKind::Positive)
        .map(|r| (r.scenario.as_str(), r.public_signals[0].as_str()))
        .collect();
    assert_eq!(
        signals,
        vec![
            ("hello_world", "2"),
            ("multiplier3_groth16", "6"),
            ("multiplier3_plonk", "6")
        ]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn failures_name_the_system_and_case() {
    let scenarios = parse_scenarios(
        r#"
        [[scenario]]
        name = "wrong_output"
        proof_system = "plonk"
        wasm = "Multiplier3.wasm"
        zkey = "circuit_final.zkey"
        verifier = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0"
        expected_signal = "7"
        inputs = { a = "1", b = "2", c = "3" }

        [[scenario]]
        name = "bad_witness"
        proof_system = "groth16"
        wasm = "HelloWorld.wasm"
        zkey = "circuit_final.zkey"
        verifier = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        inputs = { a = "x", b = "2" }
        "#,
    )
    .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let results = run_scenarios(scenarios, |_| {
        Ok(VerificationHarness::new(
            FixtureProver,
            NativeExporter,
            FixtureVerifier {
                calls: calls.clone(),
            },
        ))
    })
    .await;

    let wrong_output = results[0].as_ref().unwrap_err();
    assert_eq!(wrong_output.kind(), ErrorKind::AssertionFailure);
    assert_eq!(wrong_output.state, ScenarioState::Asserted);
    assert!(wrong_output
        .to_string()
        .starts_with("plonk positive case of 'wrong_output'"));
    assert!(results[1].is_ok());

    let bad_witness = results[2].as_ref().unwrap_err();
    assert_eq!(bad_witness.kind(), ErrorKind::ExternalServiceFailure);
    assert_eq!(bad_witness.state, ScenarioState::Proving);
    assert_eq!(bad_witness.proof_system, ProofSystem::Groth16);

    // Negative cases never touch the prover
    assert!(results[3].is_ok());
}
