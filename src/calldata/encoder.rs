//! Proof encoder
//!
//! Reads normalized snarkjs proof objects and produces the argument lists of
//! the matching verifier entry point.
//!
//! # Groth16
//!
//! `pi_a`, `pi_b`, `pi_c` are projective points; only the affine coordinates
//! are used. The verifier expects each G2 coordinate pair as `(c1, c0)`, the
//! reverse of the backend's `(c0, c1)`, so `b` is emitted as
//! `[[pi_b[0][1], pi_b[0][0]], [pi_b[1][1], pi_b[1][0]]]`.
//!
//! # PLONK
//!
//! The proof blob is 9 G1 commitments followed by 7 field evaluations, every
//! coordinate and evaluation a 32-byte big-endian word (800 bytes).

use super::CalldataError;
use crate::types::{
    NormalizedValue, Point2, Point2x2, Proof, ProofSystem, PublicSignals, Uint, VerifierArguments,
};

/// G1 commitments in proof-blob order
pub const PLONK_COMMITMENTS: [&str; 9] = ["A", "B", "C", "Z", "T1", "T2", "T3", "Wxi", "Wxiw"];

/// Field evaluations in proof-blob order
pub const PLONK_EVALUATIONS: [&str; 7] = [
    "eval_a", "eval_b", "eval_c", "eval_s1", "eval_s2", "eval_zw", "eval_r",
];

/// Size of an encoded PLONK proof in bytes
pub const PLONK_PROOF_SIZE: usize = (PLONK_COMMITMENTS.len() * 2 + PLONK_EVALUATIONS.len()) * 32;

/// Encode a normalized proof and public signals as verifier arguments
pub fn encode_arguments(
    system: ProofSystem,
    proof: &NormalizedValue,
    public_signals: &NormalizedValue,
) -> Result<VerifierArguments, CalldataError> {
    let proof = decode_proof(system, proof)?;
    let public_signals = decode_public_signals(public_signals)?;
    Ok(arguments_from_proof(&proof, &public_signals))
}

/// Render the backend's textual calldata for a normalized proof
pub fn export_calldata(
    system: ProofSystem,
    proof: &NormalizedValue,
    public_signals: &NormalizedValue,
) -> Result<String, CalldataError> {
    Ok(render_calldata(&encode_arguments(system, proof, public_signals)?))
}

/// Apply the verifier's argument conventions to a typed proof
pub fn arguments_from_proof(proof: &Proof, public_signals: &PublicSignals) -> VerifierArguments {
    let input = public_signals.0.clone();
    match proof {
        Proof::Pairing { a, b, c } => VerifierArguments::Pairing {
            a: a.clone(),
            b: [
                [b[0][1].clone(), b[0][0].clone()],
                [b[1][1].clone(), b[1][0].clone()],
            ],
            c: c.clone(),
            input,
        },
        Proof::Opaque { blob } => VerifierArguments::Opaque {
            proof: blob.clone(),
            input,
        },
    }
}

/// Render verifier arguments in the backend's textual calldata format
pub fn render_calldata(arguments: &VerifierArguments) -> String {
    fn quoted(values: &[Uint]) -> String {
        values
            .iter()
            .map(|value| format!("\"{}\"", value.to_hex_word()))
            .collect::<Vec<_>>()
            .join(",")
    }

    match arguments {
        VerifierArguments::Pairing { a, b, c, input } => format!(
            "[{}],[[{}],[{}]],[{}],[{}]",
            quoted(a),
            quoted(&b[0]),
            quoted(&b[1]),
            quoted(c),
            quoted(input)
        ),
        VerifierArguments::Opaque { proof, input } => format!("{},[{}]", proof, quoted(input)),
    }
}

/// Extract a typed proof from a normalized snarkjs proof object
pub fn decode_proof(system: ProofSystem, proof: &NormalizedValue) -> Result<Proof, CalldataError> {
    if let Some(NormalizedValue::Passthrough(serde_json::Value::String(protocol))) =
        proof.get("protocol")
    {
        if protocol != system.protocol() {
            return Err(CalldataError::malformed_proof(
                system,
                format!("proof was produced with {}", protocol),
            ));
        }
    }

    match system {
        ProofSystem::Groth16 => decode_pairing_proof(proof),
        ProofSystem::Plonk => decode_opaque_proof(proof),
    }
}

/// Public signals must be a sequence of integers
pub fn decode_public_signals(value: &NormalizedValue) -> Result<PublicSignals, CalldataError> {
    let items = match value {
        NormalizedValue::Sequence(items) => items,
        _ => return Err(CalldataError::MalformedPublicSignals { index: 0 }),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_integer()
                .cloned()
                .ok_or(CalldataError::MalformedPublicSignals { index })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(PublicSignals)
}

fn decode_pairing_proof(proof: &NormalizedValue) -> Result<Proof, CalldataError> {
    let pi_b = field(ProofSystem::Groth16, proof, "pi_b")?;

    Ok(Proof::Pairing {
        a: point(ProofSystem::Groth16, proof, "pi_a")?,
        b: point2x2(pi_b)?,
        c: point(ProofSystem::Groth16, proof, "pi_c")?,
    })
}

fn point2x2(pi_b: &NormalizedValue) -> Result<Point2x2, CalldataError> {
    let row = |index: usize| {
        let name = format!("pi_b[{}]", index);
        match pi_b.at(index) {
            Some(row) => coordinates(ProofSystem::Groth16, row, &name),
            None => Err(CalldataError::malformed_proof(
                ProofSystem::Groth16,
                format!("{} is missing", name),
            )),
        }
    };

    Ok([row(0)?, row(1)?])
}

fn decode_opaque_proof(proof: &NormalizedValue) -> Result<Proof, CalldataError> {
    let system = ProofSystem::Plonk;
    let mut bytes = Vec::with_capacity(PLONK_PROOF_SIZE);

    for name in PLONK_COMMITMENTS {
        for (axis, coordinate) in point(system, proof, name)?.iter().enumerate() {
            bytes.extend_from_slice(&word(coordinate, &format!("{}[{}]", name, axis))?);
        }
    }

    for name in PLONK_EVALUATIONS {
        let value = field(system, proof, name)?.as_integer().ok_or_else(|| {
            CalldataError::malformed_proof(system, format!("{} is not an integer", name))
        })?;
        bytes.extend_from_slice(&word(value, name)?);
    }

    Ok(Proof::Opaque {
        blob: format!("0x{}", hex::encode(bytes)),
    })
}

fn field<'a>(
    system: ProofSystem,
    proof: &'a NormalizedValue,
    name: &str,
) -> Result<&'a NormalizedValue, CalldataError> {
    proof
        .get(name)
        .ok_or_else(|| CalldataError::malformed_proof(system, format!("{} is missing", name)))
}

fn point(system: ProofSystem, proof: &NormalizedValue, name: &str) -> Result<Point2, CalldataError> {
    coordinates(system, field(system, proof, name)?, name)
}

/// First two entries of a coordinate list. Projective `z` entries are ignored.
fn coordinates(
    system: ProofSystem,
    value: &NormalizedValue,
    name: &str,
) -> Result<Point2, CalldataError> {
    let coordinate = |index: usize| {
        value.at(index).and_then(NormalizedValue::as_integer).cloned().ok_or_else(|| {
            CalldataError::malformed_proof(
                system,
                format!("{}[{}] is missing or not an integer", name, index),
            )
        })
    };

    Ok([coordinate(0)?, coordinate(1)?])
}

fn word(value: &Uint, name: &str) -> Result<[u8; 32], CalldataError> {
    value.to_word().ok_or_else(|| CalldataError::IntegerOverflow {
        field: name.to_string(),
    })
}
