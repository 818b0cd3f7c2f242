//! Ethereum ABI encoding for verifier calls
//!
//! The two `verifyProof` entry points are declared with `sol!` and encoded
//! through `SolCall`. Groth16 verifiers are generated per circuit with a
//! `uint256[k]` input array; the single-output shape is declared directly,
//! other arities are encoded as the same static parameter tuple under their
//! own selector.

use alloy_primitives::{keccak256, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};

use super::CalldataError;
use crate::types::{Point2, Point2x2, ProofSystem, Uint, VerifierArguments};

mod pairing {
    alloy_sol_types::sol! {
        function verifyProof(
            uint256[2] a,
            uint256[2][2] b,
            uint256[2] c,
            uint256[1] input
        ) returns (bool);
    }
}

mod opaque {
    alloy_sol_types::sol! {
        function verifyProof(bytes proof, uint256[] pubSignals) returns (bool);
    }
}

/// Solidity signature of the entry point the arguments target
pub fn function_signature(arguments: &VerifierArguments) -> String {
    match arguments {
        VerifierArguments::Pairing { input, .. } => format!(
            "verifyProof(uint256[2],uint256[2][2],uint256[2],uint256[{}])",
            input.len()
        ),
        VerifierArguments::Opaque { .. } => opaque::verifyProofCall::SIGNATURE.to_string(),
    }
}

/// First four bytes of the Keccak-256 hash of a function signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Encode a complete `verifyProof` call
pub fn encode_call(arguments: &VerifierArguments) -> Result<Vec<u8>, CalldataError> {
    match arguments {
        VerifierArguments::Pairing { a, b, c, input } => match input.as_slice() {
            // Solidity has no zero-length static arrays
            [] => Err(CalldataError::UnsupportedArity {
                system: ProofSystem::Groth16,
                count: 0,
            }),
            [signal] => Ok(pairing::verifyProofCall {
                a: point(a, 0)?,
                b: point2x2(b)?,
                c: point(c, 6)?,
                input: [u256(signal, 8)?],
            }
            .abi_encode()),
            _ => encode_pairing(arguments, a, b, c, input),
        },
        VerifierArguments::Opaque { proof, input } => Ok(opaque::verifyProofCall {
            proof: Bytes::from(decode_blob(proof)?),
            pubSignals: input
                .iter()
                .enumerate()
                .map(|(index, value)| u256(value, index + 1))
                .collect::<Result<Vec<_>, _>>()?,
        }
        .abi_encode()),
    }
}

/// Decode the `bool` a verifier returns
pub fn decode_bool(return_data: &[u8]) -> Option<bool> {
    pairing::verifyProofCall::abi_decode_returns(return_data, true)
        .ok()
        .map(|returns| returns._0)
}

/// `uint256[k]` for k > 1: the static parameters are laid out exactly as for
/// the declared single-output entry point, under the arity's own selector
fn encode_pairing(
    arguments: &VerifierArguments,
    a: &Point2,
    b: &Point2x2,
    c: &Point2,
    input: &[Uint],
) -> Result<Vec<u8>, CalldataError> {
    let mut data = selector(&function_signature(arguments)).to_vec();
    data.extend((point(a, 0)?, point2x2(b)?, point(c, 6)?).abi_encode());
    for (index, value) in input.iter().enumerate() {
        data.extend(u256(value, 8 + index)?.abi_encode());
    }
    Ok(data)
}

/// Hex blob to bytes. An odd digit count is padded with a leading zero,
/// so `0x0` is one zero byte.
fn decode_blob(blob: &str) -> Result<Vec<u8>, CalldataError> {
    let digits = blob.strip_prefix("0x").unwrap_or(blob);
    let result = if digits.len() % 2 == 1 {
        hex::decode(format!("0{}", digits))
    } else {
        hex::decode(digits)
    };
    result.map_err(|e| CalldataError::InvalidHex(format!("{}: {}", blob, e)))
}

fn u256(value: &Uint, index: usize) -> Result<U256, CalldataError> {
    value
        .to_word()
        .map(U256::from_be_bytes)
        .ok_or_else(|| CalldataError::IntegerOverflow {
            field: format!("argument {}", index),
        })
}

fn point(p: &Point2, first: usize) -> Result<[U256; 2], CalldataError> {
    Ok([u256(&p[0], first)?, u256(&p[1], first + 1)?])
}

fn point2x2(b: &Point2x2) -> Result<[[U256; 2]; 2], CalldataError> {
    Ok([point(&b[0], 2)?, point(&b[1], 4)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WORD_SIZE;

    fn u(n: u64) -> Uint {
        Uint::from(n)
    }

    fn word(n: u64) -> [u8; WORD_SIZE] {
        U256::from(n).to_be_bytes()
    }

    fn word_at(data: &[u8], index: usize) -> &[u8] {
        let start = 4 + index * WORD_SIZE;
        &data[start..start + WORD_SIZE]
    }

    fn groth16(input: Vec<Uint>) -> VerifierArguments {
        VerifierArguments::Pairing {
            a: [u(1), u(2)],
            b: [[u(3), u(4)], [u(5), u(6)]],
            c: [u(7), u(8)],
            input,
        }
    }

    #[test]
    fn test_selector_matches_known_value() {
        // ERC-20 transfer
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(
            selector(pairing::verifyProofCall::SIGNATURE),
            pairing::verifyProofCall::SELECTOR
        );
    }

    #[test]
    fn test_declared_signatures_match() {
        assert_eq!(
            function_signature(&groth16(vec![u(2)])),
            pairing::verifyProofCall::SIGNATURE
        );
        assert_eq!(
            function_signature(&VerifierArguments::degenerate(ProofSystem::Plonk, 1)),
            "verifyProof(bytes,uint256[])"
        );
    }

    #[test]
    fn test_groth16_call_layout() {
        let data = encode_call(&groth16(vec![u(2)])).unwrap();

        assert_eq!(data.len(), 4 + 9 * WORD_SIZE);
        assert_eq!(
            data[..4],
            selector("verifyProof(uint256[2],uint256[2][2],uint256[2],uint256[1])")
        );
        for index in 0..8 {
            assert_eq!(word_at(&data, index), word(index as u64 + 1));
        }
        assert_eq!(word_at(&data, 8), word(2));
    }

    #[test]
    fn test_wider_groth16_inputs_share_the_static_layout() {
        let args = groth16(vec![u(2)]);
        let (a, b, c, input) = match &args {
            VerifierArguments::Pairing { a, b, c, input } => (a, b, c, input),
            _ => unreachable!(),
        };
        assert_eq!(
            encode_pairing(&args, a, b, c, input).unwrap(),
            encode_call(&args).unwrap()
        );

        let data = encode_call(&groth16(vec![u(10), u(11), u(12)])).unwrap();
        assert_eq!(
            data[..4],
            selector("verifyProof(uint256[2],uint256[2][2],uint256[2],uint256[3])")
        );
        assert_eq!(data.len(), 4 + 11 * WORD_SIZE);
        assert_eq!(word_at(&data, 7), word(8));
        assert_eq!(word_at(&data, 10), word(12));
    }

    #[test]
    fn test_groth16_requires_public_inputs() {
        let args = VerifierArguments::degenerate(ProofSystem::Groth16, 0);
        assert_eq!(
            encode_call(&args),
            Err(CalldataError::UnsupportedArity {
                system: ProofSystem::Groth16,
                count: 0
            })
        );
    }

    #[test]
    fn test_oversized_argument_is_rejected() {
        let too_wide = Uint::parse(&format!("0x1{}", "0".repeat(64))).unwrap();
        let args = VerifierArguments::Pairing {
            a: [u(1), u(2)],
            b: [[u(3), too_wide], [u(5), u(6)]],
            c: [u(7), u(8)],
            input: vec![u(2)],
        };
        assert_eq!(
            encode_call(&args),
            Err(CalldataError::IntegerOverflow {
                field: "argument 3".to_string()
            })
        );
    }

    #[test]
    fn test_plonk_call_layout() {
        let args = VerifierArguments::Opaque {
            proof: format!("0x{}", "ab".repeat(40)),
            input: vec![u(6)],
        };
        let data = encode_call(&args).unwrap();

        assert_eq!(data[..4], selector("verifyProof(bytes,uint256[])"));
        // head: bytes at 0x40, array after 32 (len) + 64 (40 bytes padded)
        assert_eq!(word_at(&data, 0), word(0x40));
        assert_eq!(word_at(&data, 1), word(0x40 + 32 + 64));
        assert_eq!(word_at(&data, 2), word(40));
        assert_eq!(data[4 + 3 * WORD_SIZE], 0xab);
        assert!(word_at(&data, 4)[8..].iter().all(|&b| b == 0));
        assert_eq!(word_at(&data, 5), word(1));
        assert_eq!(word_at(&data, 6), word(6));
        assert_eq!(data.len(), 4 + 7 * WORD_SIZE);
    }

    #[test]
    fn test_degenerate_plonk_proof_is_one_zero_byte() {
        let data = encode_call(&VerifierArguments::degenerate(ProofSystem::Plonk, 1)).unwrap();
        assert_eq!(word_at(&data, 2), word(1));
        assert!(word_at(&data, 3).iter().all(|&b| b == 0));
        assert_eq!(word_at(&data, 4), word(1));
        assert_eq!(word_at(&data, 5), word(0));
    }

    #[test]
    fn test_invalid_blob_is_rejected() {
        let args = VerifierArguments::Opaque {
            proof: "0xnothex".to_string(),
            input: vec![u(6)],
        };
        assert!(matches!(encode_call(&args), Err(CalldataError::InvalidHex(_))));
    }

    #[test]
    fn test_decode_bool() {
        assert_eq!(decode_bool(&word(1)), Some(true));
        assert_eq!(decode_bool(&word(0)), Some(false));
        assert_eq!(decode_bool(&word(2)), None);
        assert_eq!(decode_bool(&[]), None);
    }
}
