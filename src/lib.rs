//! zkcalldata
//!
//! Proof canonicalization and verifier calldata for Groth16 and PLONK.
//!
//! - `normalize`: canonical integer form for arbitrary proof JSON
//! - `calldata`: typed verifier arguments, the backend's textual export,
//!   its parser and Ethereum ABI call data
//! - `harness`: end-to-end accept/reject scenarios against a prover and a
//!   deployed verifier

pub mod calldata;
pub mod common;
pub mod harness;
pub mod normalize;
pub mod types;

pub use calldata::{encode_arguments, export_calldata, parse_calldata, CalldataError};
pub use common::{ErrorKind, HarnessConfig, HarnessError, Result};
pub use normalize::{canonical_decimal, normalize, renormalize};
pub use types::{NormalizedValue, Proof, ProofSystem, PublicSignals, Uint, VerifierArguments};
