//! Field element type and scalar operations.
//!
//! The admission field is fixed to the prime used by the spend circuit.
//! Elements live in Montgomery form and are reduced at construction, so a
//! [`Felt`] is canonical by the time any ledger or wire code can observe
//! it. Equality, hashing and ordering therefore agree on canonical
//! residues.
//!
//! ## Field parameters
//!
//! - Modulus: `P = 2^251 + 17 * 2^192 + 1` (252 bits)
//! - Multiplicative generator: 3
//! - Two-adicity: 192

use ark_ff::fields::{Fp256, MontBackend, MontConfig};
use ark_ff::{BigInt, Field, PrimeField};
use ark_std::Zero;
use num_bigint::BigUint;

use crate::{FieldError, Result};

/// Montgomery configuration for the admission field.
#[derive(MontConfig)]
#[modulus = "3618502788666131213697322783095070105623107215331596699973092056135872020481"]
#[generator = "3"]
pub struct FeltConfig;

/// An element of the admission field, canonically reduced.
pub type Felt = Fp256<MontBackend<FeltConfig, 4>>;

/// Fermat inversion exponent, `P - 2`.
const FERMAT_EXPONENT: BigInt<4> =
    BigInt!("3618502788666131213697322783095070105623107215331596699973092056135872020479");

/// Parse a felt literal and normalize it into the field.
///
/// Accepts decimal or `0x`-prefixed hexadecimal text with an optional
/// leading sign and surrounding whitespace. Values of any magnitude are
/// reduced modulo the field prime; negative values wrap to `P - |n|`.
///
/// # Errors
///
/// Returns [`FieldError::Malformed`] when the text is not an integer
/// literal in either base.
pub fn from_text(text: &str) -> Result<Felt> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'+') => (false, &trimmed[1..]),
        Some(b'-') => (true, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
        None => BigUint::parse_bytes(digits.as_bytes(), 10),
    };
    let magnitude = magnitude.ok_or_else(|| FieldError::Malformed(trimmed.to_string()))?;
    let value = Felt::from_le_bytes_mod_order(&magnitude.to_bytes_le());
    Ok(if negative { -value } else { value })
}

/// Multiplicative inverse by Fermat exponentiation, `value^(P-2)`.
///
/// # Errors
///
/// Returns [`FieldError::ZeroInverse`] for the zero element.
pub fn inverse(value: &Felt) -> Result<Felt> {
    if value.is_zero() {
        return Err(FieldError::ZeroInverse);
    }
    Ok(value.pow(FERMAT_EXPONENT))
}

/// Canonical hex encoding of a felt: lowercase, `0x`-prefixed, unpadded.
///
/// Zero renders as `0x0`. This is the only encoding used for field values
/// on the wire and in ledger snapshots.
pub fn to_hex(value: &Felt) -> String {
    let canonical: BigUint = value.into_bigint().into();
    format!("{canonical:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;

    #[test]
    fn test_modulus_shape() {
        assert_eq!(Felt::MODULUS_BIT_SIZE, 252);
        // P - 1 == -1 in the field.
        let p_minus_one = from_text(
            "3618502788666131213697322783095070105623107215331596699973092056135872020480",
        )
        .expect("valid literal");
        assert_eq!(p_minus_one, -Felt::from(1u64));
    }

    #[test]
    fn test_from_text_decimal() {
        assert_eq!(from_text("42").expect("valid literal"), Felt::from(42u64));
        assert_eq!(from_text("0").expect("valid literal"), Felt::from(0u64));
    }

    #[test]
    fn test_from_text_hex() {
        assert_eq!(from_text("0x2a").expect("valid literal"), Felt::from(42u64));
        assert_eq!(from_text("0X2A").expect("valid literal"), Felt::from(42u64));
    }

    #[test]
    fn test_from_text_sign_and_whitespace() {
        assert_eq!(from_text(" +7 ").expect("valid literal"), Felt::from(7u64));
        assert_eq!(from_text("-1").expect("valid literal"), -Felt::from(1u64));
        assert_eq!(
            from_text("-0x10").expect("valid literal"),
            -Felt::from(16u64)
        );
    }

    #[test]
    fn test_from_text_reduces_modulo_p() {
        let p = from_text(
            "3618502788666131213697322783095070105623107215331596699973092056135872020481",
        )
        .expect("valid literal");
        assert_eq!(p, Felt::from(0u64));
        let p_plus_one = from_text(
            "3618502788666131213697322783095070105623107215331596699973092056135872020482",
        )
        .expect("valid literal");
        assert_eq!(p_plus_one, Felt::from(1u64));
    }

    #[test]
    fn test_from_text_rejects_garbage() {
        for bad in ["", "  ", "abc", "0x", "0xg1", "12.5", "1e3", "-", "+"] {
            assert!(
                matches!(from_text(bad), Err(FieldError::Malformed(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_inverse_small() {
        let two = Felt::from(2u64);
        let inv = inverse(&two).expect("nonzero element");
        assert_eq!(two * inv, Felt::from(1u64));
    }

    #[test]
    fn test_inverse_zero_rejected() {
        assert!(matches!(
            inverse(&Felt::from(0u64)),
            Err(FieldError::ZeroInverse)
        ));
    }

    #[test]
    fn test_inverse_agrees_with_builtin() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let value = Felt::rand(&mut rng);
            if value.is_zero() {
                continue;
            }
            let expected = value.inverse().expect("nonzero element");
            assert_eq!(inverse(&value).expect("nonzero element"), expected);
        }
    }

    #[test]
    fn test_hex_encoding() {
        assert_eq!(to_hex(&Felt::from(0u64)), "0x0");
        assert_eq!(to_hex(&Felt::from(31u64)), "0x1f");
        assert_eq!(
            to_hex(&-Felt::from(1u64)),
            "0x800000000000011000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_hex_roundtrip() {
        let value = Felt::from(0xdead_beefu64);
        assert_eq!(from_text(&to_hex(&value)).expect("valid literal"), value);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_decimal_parse_matches_bigint_reduction(digits in "[0-9]{1,80}") {
                let parsed = from_text(&digits).expect("decimal literal");
                let modulus: BigUint = Felt::MODULUS.into();
                let expected = BigUint::parse_bytes(digits.as_bytes(), 10)
                    .expect("decimal literal")
                    % &modulus;
                prop_assert_eq!(to_hex(&parsed), format!("{expected:#x}"));
            }

            #[test]
            fn prop_inverse_roundtrip(value in 1u128..) {
                let felt = Felt::from(value);
                let inv = inverse(&felt).expect("nonzero element");
                prop_assert_eq!(felt * inv, Felt::from(1u64));
            }

            #[test]
            fn prop_double_inverse_is_identity(value in 1u128..) {
                let felt = Felt::from(value);
                let inv = inverse(&felt).expect("nonzero element");
                prop_assert_eq!(inverse(&inv).expect("nonzero element"), felt);
            }

            #[test]
            fn prop_hex_roundtrip(value in any::<u128>()) {
                let felt = Felt::from(value);
                prop_assert_eq!(from_text(&to_hex(&felt)).expect("valid literal"), felt);
            }
        }
    }
}
