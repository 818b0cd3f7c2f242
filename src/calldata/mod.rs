//! Verifier Calldata
//!
//! Bridges proving-backend output and verifier entry points:
//!
//! - `encoder` turns a normalized proof and its public signals into typed
//!   `VerifierArguments`, and renders the backend's textual calldata export
//! - `parser` reconstructs `VerifierArguments` from that textual export
//! - `abi` produces Ethereum ABI call data for the two `verifyProof` shapes

pub mod abi;
pub mod encoder;
pub mod parser;

use thiserror::Error;

use crate::types::ProofSystem;

// Re-exports for convenience
pub use abi::{decode_bool, encode_call, function_signature, selector};
pub use encoder::{
    arguments_from_proof, decode_proof, decode_public_signals, encode_arguments, export_calldata,
    render_calldata, PLONK_COMMITMENTS, PLONK_EVALUATIONS, PLONK_PROOF_SIZE,
};
pub use parser::{parse_calldata, tokenize, PAIRING_PROOF_TOKENS};

/// Calldata errors.
///
/// All of these mean the caller handed data for the wrong proof system or
/// data the backend could not have produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalldataError {
    #[error("{system} calldata has {actual} tokens, expected {expected}")]
    TokenCount {
        system: ProofSystem,
        expected: &'static str,
        actual: usize,
    },

    #[error("{system} calldata token {index} is empty")]
    EmptyToken { system: ProofSystem, index: usize },

    #[error("{system} calldata token {index} is not an integer: {token:?}")]
    InvalidInteger {
        system: ProofSystem,
        index: usize,
        token: String,
    },

    #[error("malformed {system} proof: {reason}")]
    MalformedProof { system: ProofSystem, reason: String },

    #[error("public signal {index} is not an integer")]
    MalformedPublicSignals { index: usize },

    #[error("{field} does not fit in 256 bits")]
    IntegerOverflow { field: String },

    #[error("{system} verifier cannot take {count} public inputs")]
    UnsupportedArity { system: ProofSystem, count: usize },

    #[error("invalid hex proof blob: {0}")]
    InvalidHex(String),
}

impl CalldataError {
    pub(crate) fn malformed_proof(system: ProofSystem, reason: impl Into<String>) -> Self {
        Self::MalformedProof {
            system,
            reason: reason.into(),
        }
    }
}
