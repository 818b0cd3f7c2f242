//! Textual calldata parser
//!
//! The proving backend exports calldata as one copy-pasteable string:
//!
//! ```text
//! groth16: ["0x..", "0x.."],[["0x..", "0x.."],["0x..", "0x.."]],["0x..", "0x.."],["0x.."]
//! plonk:   0x<proof bytes>,["0x.."]
//! ```
//!
//! Parsing strips `[`, `]`, `"` and whitespace, splits on `,` and assigns the
//! tokens positionally.

use super::CalldataError;
use crate::types::{ProofSystem, Uint, VerifierArguments};

/// Tokens taken by `a`, `b` and `c` before the public inputs start
pub const PAIRING_PROOF_TOKENS: usize = 8;

/// Parse exported calldata into verifier arguments for `system`
pub fn parse_calldata(
    system: ProofSystem,
    calldata: &str,
) -> Result<VerifierArguments, CalldataError> {
    let tokens = tokenize(calldata);
    match system {
        ProofSystem::Groth16 => parse_pairing(&tokens),
        ProofSystem::Plonk => parse_opaque(&tokens),
    }
}

/// Strip structural characters and split on commas
pub fn tokenize(calldata: &str) -> Vec<String> {
    let flat: String = calldata
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '"') && !c.is_whitespace())
        .collect();
    flat.split(',').map(str::to_string).collect()
}

fn parse_pairing(tokens: &[String]) -> Result<VerifierArguments, CalldataError> {
    let system = ProofSystem::Groth16;

    // `...,"0xc1"],[]` leaves one empty token behind: zero public inputs
    let tokens = match tokens {
        [proof @ .., last] if proof.len() == PAIRING_PROOF_TOKENS && last.is_empty() => proof,
        _ => tokens,
    };

    if tokens.len() < PAIRING_PROOF_TOKENS {
        return Err(CalldataError::TokenCount {
            system,
            expected: "at least 8",
            actual: tokens.len(),
        });
    }

    let values = tokens
        .iter()
        .enumerate()
        .map(|(index, token)| parse_integer(system, index, token))
        .collect::<Result<Vec<_>, _>>()?;

    let v = |i: usize| values[i].clone();
    Ok(VerifierArguments::Pairing {
        a: [v(0), v(1)],
        b: [[v(2), v(3)], [v(4), v(5)]],
        c: [v(6), v(7)],
        input: values[PAIRING_PROOF_TOKENS..].to_vec(),
    })
}

fn parse_opaque(tokens: &[String]) -> Result<VerifierArguments, CalldataError> {
    let system = ProofSystem::Plonk;

    let [proof, signal] = tokens else {
        return Err(CalldataError::TokenCount {
            system,
            expected: "exactly 2",
            actual: tokens.len(),
        });
    };

    // The blob is an encoding, not a number: keep it verbatim
    if proof.is_empty() {
        return Err(CalldataError::EmptyToken { system, index: 0 });
    }

    Ok(VerifierArguments::Opaque {
        proof: proof.clone(),
        input: vec![parse_integer(system, 1, signal)?],
    })
}

fn parse_integer(system: ProofSystem, index: usize, token: &str) -> Result<Uint, CalldataError> {
    if token.is_empty() {
        return Err(CalldataError::EmptyToken { system, index });
    }
    Uint::parse(token).ok_or_else(|| CalldataError::InvalidInteger {
        system,
        index,
        token: token.to_string(),
    })
}
