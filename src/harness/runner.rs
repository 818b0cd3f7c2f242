//! Concurrent scenario runner

use tokio::task::JoinHandle;

use super::scenario::{
    CaseKind, CaseResult, Scenario, ScenarioFailure, ScenarioState, VerificationHarness,
};
use super::services::{CalldataExporter, ProvingService, VerifierService};
use crate::common::error::HarnessError;

/// Run every scenario on its own task, with a harness built for it by `build`.
///
/// Results come back in scenario order, positive case before negative case.
/// A scenario whose harness cannot be built, or whose task panics, yields a
/// single failure and does not stop the others.
pub async fn run_scenarios<P, E, V, F>(scenarios: Vec<Scenario>, build: F) -> Vec<CaseResult>
where
    P: ProvingService + 'static,
    E: CalldataExporter + 'static,
    V: VerifierService + 'static,
    F: Fn(&Scenario) -> Result<VerificationHarness<P, E, V>, HarnessError>,
{
    let mut pending = Vec::with_capacity(scenarios.len());

    for scenario in scenarios {
        match build(&scenario) {
            Ok(harness) => {
                tracing::debug!(
                    scenario = %scenario.name,
                    correlation_id = harness.correlation_id(),
                    "scenario started"
                );
                let task_scenario = scenario.clone();
                let handle =
                    tokio::spawn(async move { harness.run_scenario(&task_scenario).await });
                pending.push(Pending::Running(scenario, handle));
            }
            Err(source) => pending.push(Pending::NotBuilt(scenario, source)),
        }
    }

    let mut results = Vec::new();
    for entry in pending {
        match entry {
            Pending::Running(scenario, handle) => match handle.await {
                Ok(cases) => results.extend(cases),
                Err(e) => results.push(Err(failure(
                    &scenario,
                    HarnessError::internal(format!("scenario task failed: {}", e)),
                ))),
            },
            Pending::NotBuilt(scenario, source) => results.push(Err(failure(&scenario, source))),
        }
    }

    results
}

enum Pending {
    Running(Scenario, JoinHandle<Vec<CaseResult>>),
    NotBuilt(Scenario, HarnessError),
}

fn failure(scenario: &Scenario, source: HarnessError) -> ScenarioFailure {
    tracing::error!(scenario = %scenario.name, error = %source, "scenario did not run");
    ScenarioFailure {
        scenario: scenario.name.clone(),
        proof_system: scenario.proof_system,
        case: CaseKind::Positive,
        state: ScenarioState::Uninitialized,
        source,
    }
}
