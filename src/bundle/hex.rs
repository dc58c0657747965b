// src/bundle/hex.rs

//! Arbitrary-width bit patterns serialised as hexadecimal string literals.
//!
//! Consuming backends read `mask`/`val` as strings such as `"0xA"`, never
//! as JSON numbers, and the flat classical address space may be wider than
//! any machine integer.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A bit pattern over the flat classical address space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HexBits(BigUint);

/// Returned when a string is not a `0x`-prefixed hexadecimal literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex bit pattern '{0}'")]
pub struct ParseHexBitsError(String);

impl HexBits {
    /// The all-zero pattern.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// The pattern as an unsigned integer.
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Whether the bit at flat position `index` is set.
    pub fn bit(&self, index: usize) -> bool {
        self.0.bit(index as u64)
    }

    /// Sets the bit at flat position `index`.
    pub fn set_bit(&mut self, index: usize) {
        self.0.set_bit(index as u64, true);
    }

    /// Positions of all set bits, ascending.
    pub fn ones(&self) -> Vec<usize> {
        (0..self.0.bits())
            .filter(|&i| self.0.bit(i))
            .map(|i| i as usize)
            .collect()
    }

    /// `true` if no bit is set.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<BigUint> for HexBits {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u64> for HexBits {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for HexBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl FromStr for HexBits {
    type Err = ParseHexBitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| ParseHexBitsError(s.to_string()))?;
        BigUint::parse_bytes(digits.as_bytes(), 16)
            .map(HexBits)
            .ok_or_else(|| ParseHexBitsError(s.to_string()))
    }
}

impl Serialize for HexBits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexBits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_uppercase_prefixed_hex() {
        assert_eq!(HexBits::from(10u64).to_string(), "0xA");
        assert_eq!(HexBits::zero().to_string(), "0x0");
    }

    #[test]
    fn test_serializes_as_string_not_number() {
        let json = serde_json::to_value(HexBits::from(255u64)).unwrap();
        assert_eq!(json, serde_json::json!("0xFF"));
    }

    #[test]
    fn test_wide_patterns_survive() {
        let mut bits = HexBits::zero();
        bits.set_bit(0);
        bits.set_bit(100);
        assert_eq!(bits.ones(), vec![0, 100]);
        let parsed: HexBits = bits.to_string().parse().unwrap();
        assert_eq!(parsed, bits);
    }

    #[test]
    fn test_bit_queries() {
        let bits = HexBits::from(0b1010u64);
        assert!(bits.bit(1) && bits.bit(3));
        assert!(!bits.bit(0) && !bits.bit(200));
        assert_eq!(bits.value(), &BigUint::from(10u32));
        assert!(!bits.is_zero());
        assert!(HexBits::zero().is_zero());
    }

    #[test]
    fn test_rejects_unprefixed_or_garbage() {
        assert!("FF".parse::<HexBits>().is_err());
        assert!("0xZZ".parse::<HexBits>().is_err());
        assert_eq!("0Xa".parse::<HexBits>().unwrap(), HexBits::from(10u64));
    }
}
