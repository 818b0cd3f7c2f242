//! Verification Harness
//!
//! Runs a circuit through prove → normalize → encode → verify and checks the
//! verifier's answer, once with the real proof (must accept) and once with
//! degenerate arguments (must reject).

pub mod rpc;
pub mod runner;
pub mod scenario;
pub mod services;
pub mod snarkjs;

// Re-exports for convenience
pub use rpc::EthCallVerifier;
pub use runner::run_scenarios;
pub use scenario::{
    load_scenarios, parse_scenarios, CaseKind, CaseReport, CaseResult, Scenario, ScenarioFailure,
    ScenarioState, VerificationHarness,
};
pub use services::{
    CalldataExporter, CircuitArtifacts, CircuitInputs, Exporter, NativeExporter, ProverOutput,
    ProvingService, ServiceError, VerifierService,
};
pub use snarkjs::SnarkjsCli;
