//! zkcalldata CLI
//!
//! Normalize proofs, convert between calldata shapes and run verification
//! scenarios against a deployed verifier.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use zkcalldata::calldata::{encode_call, function_signature};
use zkcalldata::common::{init_from_config, HarnessConfig};
use zkcalldata::harness::{
    load_scenarios, run_scenarios, CaseResult, EthCallVerifier, Exporter, SnarkjsCli,
    VerificationHarness,
};
use zkcalldata::{export_calldata, normalize, parse_calldata, ProofSystem};

#[derive(Parser)]
#[command(name = "zkcalldata")]
#[command(about = "Proof normalization and verifier calldata for Groth16 and PLONK")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a JSON file with every integer-like value in canonical decimal
    Normalize {
        /// JSON file (proof, public signals or anything else)
        file: PathBuf,
    },

    /// Parse exported calldata into verifier arguments
    ParseCalldata {
        /// groth16 or plonk
        #[arg(short, long)]
        system: ProofSystem,

        /// Calldata string, or `-` to read stdin
        #[arg(default_value = "-")]
        calldata: String,
    },

    /// Render calldata from a proof and its public signals
    Export {
        #[arg(short, long)]
        system: ProofSystem,

        /// proof.json
        #[arg(short, long)]
        proof: PathBuf,

        /// public.json
        #[arg(long)]
        public: PathBuf,
    },

    /// Print the Ethereum ABI call data for exported calldata
    Abi {
        #[arg(short, long)]
        system: ProofSystem,

        /// Calldata string, or `-` to read stdin
        #[arg(default_value = "-")]
        calldata: String,
    },

    /// Run verification scenarios (positive and negative case each)
    Run {
        /// Scenario file; falls back to the configured default
        #[arg(long, env = "ZKCALL_SCENARIOS")]
        scenarios: Option<PathBuf>,

        /// Only run the scenario with this name
        #[arg(long)]
        only: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let config = startup()?;

    match cli.command {
        Commands::Normalize { file } => {
            let value = read_json(&file)?;
            println!("{}", serde_json::to_string_pretty(&normalize(&value).to_json())?);
        }
        Commands::ParseCalldata { system, calldata } => {
            let arguments = parse_calldata(system, &read_calldata(calldata)?)?;
            println!("{}", serde_json::to_string_pretty(&arguments)?);
        }
        Commands::Export {
            system,
            proof,
            public,
        } => {
            let proof = normalize(&read_json(&proof)?);
            let public = normalize(&read_json(&public)?);
            println!("{}", export_calldata(system, &proof, &public)?);
        }
        Commands::Abi { system, calldata } => {
            let arguments = parse_calldata(system, &read_calldata(calldata)?)?;
            eprintln!("{}", function_signature(&arguments));
            println!("0x{}", hex::encode(encode_call(&arguments)?));
        }
        Commands::Run { scenarios, only } => {
            let passed = run(config, scenarios, only).await?;
            if !passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Load and validate configuration, then install the subscriber
fn startup() -> zkcalldata::Result<HarnessConfig> {
    let config = HarnessConfig::from_env()?;
    init_from_config(&config)?;
    Ok(config)
}

/// Run scenarios and print a report. Returns whether every case passed.
async fn run(
    config: HarnessConfig,
    scenarios: Option<PathBuf>,
    only: Option<String>,
) -> Result<bool, Box<dyn std::error::Error>> {
    config.print_summary();

    let path = scenarios.unwrap_or_else(|| config.scenarios_path.clone());
    let mut scenarios = load_scenarios(&path)?;
    if let Some(name) = &only {
        scenarios.retain(|s| &s.name == name);
        if scenarios.is_empty() {
            return Err(format!("no scenario named '{}' in {}", name, path.display()).into());
        }
    }

    tracing::info!(count = scenarios.len(), file = %path.display(), "Running scenarios");

    let results = run_scenarios(scenarios, |scenario| {
        let verifier = EthCallVerifier::new(&config.rpc_url, &scenario.verifier)?;
        Ok(VerificationHarness::new(
            SnarkjsCli::new(&config.snarkjs_bin),
            Exporter::from_config(&config),
            verifier,
        )
        .with_timeout(config.call_timeout))
    })
    .await;

    Ok(print_report(&results))
}

fn print_report(results: &[CaseResult]) -> bool {
    let mut failed = 0;

    for result in results {
        match result {
            Ok(report) => println!(
                "PASS  {:<24} {:<8} {:<8} verified={} signals={:?} ({}ms)",
                report.scenario,
                report.proof_system,
                report.case,
                report.verified,
                report.public_signals,
                report.duration_ms
            ),
            Err(failure) => {
                failed += 1;
                println!(
                    "FAIL  {:<24} {:<8} {:<8} [{}] {}",
                    failure.scenario,
                    failure.proof_system,
                    failure.case,
                    failure.kind(),
                    failure
                );
            }
        }
    }

    println!();
    println!("{} passed, {} failed", results.len() - failed, failed);
    failed == 0
}

fn read_json(path: &Path) -> zkcalldata::Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents).map_err(std::io::Error::from)?)
}

fn read_calldata(arg: String) -> zkcalldata::Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut calldata = String::new();
    std::io::stdin().read_to_string(&mut calldata)?;
    Ok(calldata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkcalldata::ErrorKind;

    #[test]
    fn test_run_arguments() {
        let cli = Cli::try_parse_from([
            "zkcalldata",
            "run",
            "--scenarios",
            "ci.toml",
            "--only",
            "hello_world",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { scenarios, only } => {
                assert_eq!(scenarios, Some(PathBuf::from("ci.toml")));
                assert_eq!(only.as_deref(), Some("hello_world"));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_system_accepts_aliases() {
        let cli =
            Cli::try_parse_from(["zkcalldata", "abi", "--system", "polynomial", "0x00 [\"1\"]"])
                .unwrap();
        match cli.command {
            Commands::Abi { system, calldata } => {
                assert_eq!(system, ProofSystem::Plonk);
                assert_eq!(calldata, "0x00 [\"1\"]");
            }
            _ => panic!("expected abi"),
        }
        assert!(Cli::try_parse_from(["zkcalldata", "abi", "--system", "fflonk"]).is_err());
    }

    #[test]
    fn test_unreadable_input_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = read_json(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");

        let path = dir.path().join("proof.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalServiceFailure);

        std::fs::write(&path, r#"{"pi_a": ["1", "2"]}"#).unwrap();
        assert_eq!(read_json(&path).unwrap()["pi_a"][1], "2");
    }
}
