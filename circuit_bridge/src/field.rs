// circuit_bridge/src/field.rs
//
// Constants of the BLS12-381 scalar field as they appear in descriptions.

use bls12_381::Scalar;
use ff::Field;
use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// A constant written either as a JSON integer or a decimal string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(u64),
    Decimal(String),
}

impl FieldValue {
    pub fn to_scalar(&self) -> BridgeResult<Scalar> {
        match self {
            FieldValue::Int(value) => Ok(Scalar::from(*value)),
            FieldValue::Decimal(text) => parse_scalar(text),
        }
    }
}

pub fn modulus() -> BigUint {
    BigUint::from_bytes_le(&(-Scalar::ONE).to_bytes()) + BigUint::one()
}

/// Parses a decimal constant, `-` prefix meaning the additive inverse.
/// Magnitudes not below the field modulus are rejected.
pub fn parse_scalar(text: &str) -> BridgeResult<Scalar> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BridgeError::FieldElement(text.to_string()));
    }
    let magnitude = BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| BridgeError::FieldElement(text.to_string()))?;
    if magnitude >= modulus() {
        return Err(BridgeError::FieldElement(text.to_string()));
    }

    let mut repr = [0u8; 32];
    let bytes = magnitude.to_bytes_le();
    repr[..bytes.len()].copy_from_slice(&bytes);
    let value: Option<Scalar> = Scalar::from_bytes(&repr).into();
    let value = value.ok_or_else(|| BridgeError::FieldElement(text.to_string()))?;
    Ok(if negative { -value } else { value })
}

pub fn to_decimal(value: &Scalar) -> String {
    BigUint::from_bytes_le(&value.to_bytes()).to_str_radix(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_match_u64_conversion() {
        assert_eq!(parse_scalar("9").unwrap(), Scalar::from(9u64));
        assert_eq!(
            FieldValue::Decimal("18446744073709551615".into()).to_scalar().unwrap(),
            Scalar::from(u64::MAX)
        );
        assert_eq!(FieldValue::Int(7).to_scalar().unwrap(), Scalar::from(7u64));
    }

    #[test]
    fn negative_values_are_inverses() {
        let minus_five = parse_scalar("-5").unwrap();
        assert_eq!(minus_five + Scalar::from(5u64), Scalar::ZERO);
    }

    #[test]
    fn modulus_is_rejected_but_predecessor_is_not() {
        let r = modulus();
        assert!(parse_scalar(&r.to_str_radix(10)).is_err());
        let max = parse_scalar(&(r - BigUint::one()).to_str_radix(10)).unwrap();
        assert_eq!(max, -Scalar::ONE);
    }

    #[test]
    fn garbage_is_rejected() {
        for text in ["", "-", "0x10", "1e3", "12a"] {
            assert!(
                matches!(parse_scalar(text), Err(BridgeError::FieldElement(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn decimal_rendering() {
        assert_eq!(to_decimal(&Scalar::from(81u64)), "81");
        assert_eq!(to_decimal(&parse_scalar("-1").unwrap()), (modulus() - BigUint::one()).to_string());
    }
}
