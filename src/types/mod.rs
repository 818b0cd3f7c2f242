//! Shared Types Module
//!
//! Data model shared by the normalizer, the calldata codec and the harness.

pub mod proof;
pub mod uint;
pub mod value;

// Re-exports for convenience
pub use proof::{Point2, Point2x2, Proof, ProofSystem, PublicSignals, VerifierArguments};
pub use uint::{ParseUintError, Uint, WORD_SIZE};
pub use value::NormalizedValue;
