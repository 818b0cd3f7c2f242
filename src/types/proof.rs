//! Proof, public signal and verifier argument types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::uint::Uint;

/// Proof system a proof was produced with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofSystem {
    /// Pairing-based: three curve-point groups plus public inputs
    #[serde(alias = "pairing")]
    Groth16,
    /// Universal polynomial-commitment: one opaque proof blob plus public inputs
    #[serde(alias = "polynomial")]
    Plonk,
}

impl ProofSystem {
    /// Protocol name used by snarkjs subcommands and proof files
    pub fn protocol(&self) -> &'static str {
        match self {
            ProofSystem::Groth16 => "groth16",
            ProofSystem::Plonk => "plonk",
        }
    }
}

impl fmt::Display for ProofSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.protocol())
    }
}

impl FromStr for ProofSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groth16" | "pairing" => Ok(ProofSystem::Groth16),
            "plonk" | "polynomial" => Ok(ProofSystem::Plonk),
            _ => Err(format!("unknown proof system: {} (use 'groth16' or 'plonk')", s)),
        }
    }
}

/// Ordered pair of coordinates
pub type Point2 = [Uint; 2];

/// Ordered pair of pairs, kept in the order the backend emitted
pub type Point2x2 = [Point2; 2];

/// A proof as emitted by the proving backend
#[derive(Debug, Clone, PartialEq)]
pub enum Proof {
    Pairing { a: Point2, b: Point2x2, c: Point2 },
    /// `0x`-prefixed hex encoding of the proof bytes
    Opaque { blob: String },
}

/// Circuit public outputs, in circuit declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicSignals(pub Vec<Uint>);

impl PublicSignals {
    /// The circuit's first declared output
    pub fn first(&self) -> Option<&Uint> {
        self.0.first()
    }
}

/// Positional arguments for one verifier entry point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VerifierArguments {
    /// `verifyProof(uint[2] a, uint[2][2] b, uint[2] c, uint[k] input)`
    Pairing {
        a: Point2,
        b: Point2x2,
        c: Point2,
        input: Vec<Uint>,
    },
    /// `verifyProof(bytes proof, uint[] pubSignals)`
    Opaque { proof: String, input: Vec<Uint> },
}

impl VerifierArguments {
    pub fn system(&self) -> ProofSystem {
        match self {
            VerifierArguments::Pairing { .. } => ProofSystem::Groth16,
            VerifierArguments::Opaque { .. } => ProofSystem::Plonk,
        }
    }

    pub fn public_inputs(&self) -> &[Uint] {
        match self {
            VerifierArguments::Pairing { input, .. } | VerifierArguments::Opaque { input, .. } => {
                input
            }
        }
    }

    /// Structurally valid arguments that no sound verifier accepts:
    /// zero points / a zero proof blob and `public_inputs` zero signals.
    pub fn degenerate(system: ProofSystem, public_inputs: usize) -> Self {
        let input = vec![Uint::zero(); public_inputs];
        match system {
            ProofSystem::Groth16 => VerifierArguments::Pairing {
                a: [Uint::zero(), Uint::zero()],
                b: [
                    [Uint::zero(), Uint::zero()],
                    [Uint::zero(), Uint::zero()],
                ],
                c: [Uint::zero(), Uint::zero()],
                input,
            },
            ProofSystem::Plonk => VerifierArguments::Opaque {
                proof: "0x0".to_string(),
                input,
            },
        }
    }

    /// Flat argument list in ABI order, integers as canonical decimal strings
    pub fn flat_tokens(&self) -> Vec<String> {
        match self {
            VerifierArguments::Pairing { a, b, c, input } => a
                .iter()
                .chain(b.iter().flatten())
                .chain(c.iter())
                .chain(input.iter())
                .map(Uint::to_string)
                .collect(),
            VerifierArguments::Opaque { proof, input } => std::iter::once(proof.clone())
                .chain(input.iter().map(Uint::to_string))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(n: u64) -> Uint {
        Uint::from(n)
    }

    #[test]
    fn test_proof_system_parsing() {
        assert_eq!("groth16".parse::<ProofSystem>(), Ok(ProofSystem::Groth16));
        assert_eq!("PLONK".parse::<ProofSystem>(), Ok(ProofSystem::Plonk));
        assert_eq!("pairing".parse::<ProofSystem>(), Ok(ProofSystem::Groth16));
        assert!("fflonk".parse::<ProofSystem>().is_err());
        assert_eq!(ProofSystem::Plonk.to_string(), "plonk");
    }

    #[test]
    fn test_proof_system_deserializes_like_from_str() {
        for name in ["groth16", "pairing", "plonk", "polynomial"] {
            let parsed: ProofSystem = serde_json::from_value(serde_json::json!(name)).unwrap();
            assert_eq!(Ok(parsed), name.parse::<ProofSystem>());
        }
        assert_eq!(
            serde_json::to_value(ProofSystem::Groth16).unwrap(),
            serde_json::json!("groth16")
        );
        assert!(serde_json::from_value::<ProofSystem>(serde_json::json!("fflonk")).is_err());
    }

    #[test]
    fn test_first_public_signal() {
        let signals: PublicSignals = serde_json::from_str(r#"["6", "33"]"#).unwrap();
        assert_eq!(signals.first(), Some(&u(6)));
        assert_eq!(PublicSignals::default().first(), None);
    }

    #[test]
    fn test_degenerate_arguments() {
        let args = VerifierArguments::degenerate(ProofSystem::Groth16, 1);
        assert_eq!(args.flat_tokens(), vec!["0"; 9]);

        let args = VerifierArguments::degenerate(ProofSystem::Plonk, 1);
        assert_eq!(args.flat_tokens(), vec!["0x0", "0"]);
        assert_eq!(args.system(), ProofSystem::Plonk);
    }

    #[test]
    fn test_flat_token_order() {
        let args = VerifierArguments::Pairing {
            a: [u(1), u(2)],
            b: [[u(3), u(4)], [u(5), u(6)]],
            c: [u(7), u(8)],
            input: vec![u(9), u(10)],
        };
        assert_eq!(
            args.flat_tokens(),
            vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]
        );
        assert_eq!(args.public_inputs().len(), 2);
    }

    #[test]
    fn test_arguments_serialize_like_verifier_call() {
        let args = VerifierArguments::Opaque {
            proof: "0xabcd".to_string(),
            input: vec![u(6)],
        };
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json, serde_json::json!({"proof": "0xabcd", "input": ["6"]}));
    }
}
