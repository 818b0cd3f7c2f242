//! Arbitrary-precision unsigned integers
//!
//! Field elements produced by proving backends routinely exceed 64 bits, and
//! backends disagree on whether they print them in decimal or `0x` hex.
//! `Uint` is the one integer type used for proof coordinates, public signals
//! and verifier arguments.

use num_bigint::BigUint;
use num_traits::{Num, Zero};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Size of an EVM word in bytes
pub const WORD_SIZE: usize = 32;

/// Unsigned integer with no range limit
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint(BigUint);

/// Error returned when a string is not a decimal or `0x` hex integer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a decimal or 0x-hex integer: {0:?}")]
pub struct ParseUintError(pub String);

impl Uint {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Parse `^[0-9]+$` as decimal or `^0x[0-9a-fA-F]+$` as hex.
    ///
    /// Anything else (signs, underscores, whitespace, empty digits) is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.strip_prefix("0x") {
            Some(digits) => parse_hex(digits),
            None => parse_decimal(s),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Big-endian 32-byte word, or `None` if the value needs more than 256 bits
    pub fn to_word(&self) -> Option<[u8; WORD_SIZE]> {
        if self.0.is_zero() {
            return Some([0u8; WORD_SIZE]);
        }

        let bytes = self.0.to_bytes_be();
        if bytes.len() > WORD_SIZE {
            return None;
        }

        let mut word = [0u8; WORD_SIZE];
        word[WORD_SIZE - bytes.len()..].copy_from_slice(&bytes);
        Some(word)
    }

    /// `0x` followed by at least 64 lowercase hex digits
    pub fn to_hex_word(&self) -> String {
        format!("0x{:064x}", self.0)
    }
}

fn parse_decimal(digits: &str) -> Option<Uint> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::from_str_radix(digits, 10).ok().map(Uint)
}

fn parse_hex(digits: &str) -> Option<Uint> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    BigUint::from_str_radix(digits, 16).ok().map(Uint)
}

impl fmt::Display for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Uint {
    type Err = ParseUintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uint::parse(s).ok_or_else(|| ParseUintError(s.to_string()))
    }
}

impl From<u64> for Uint {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for Uint {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl Serialize for Uint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Uint::parse(&s).ok_or_else(|| de::Error::custom(ParseUintError(s)))
    }
}
