//! Conversion between raw token units and human decimal amounts.
//!
//! `rust_decimal` is used only at the display boundary; every pricing path
//! stays in integer arithmetic.

use std::str::FromStr;

use alloy::primitives::U256;
use rust_decimal::Decimal;

use super::ServiceResult;
use super::error::ServiceError;

/// Parses a human decimal string ("1.5") into raw token units at the
/// given decimal precision.
pub fn parse_amount(value: &str, decimals: u8) -> ServiceResult<U256> {
    let decimal = Decimal::from_str(value)
        .map_err(|e| ServiceError::InvalidAmount(format!("{value}: {e}")))?;
    if decimal.is_sign_negative() {
        return Err(ServiceError::InvalidAmount(format!(
            "{value}: amounts must be non-negative"
        )));
    }
    let scaled = decimal
        .checked_mul(Decimal::from(10u64.pow(u32::from(decimals))))
        .ok_or_else(|| ServiceError::InvalidAmount(format!("{value}: too large to scale")))?;
    if scaled.fract() != Decimal::ZERO {
        return Err(ServiceError::InvalidAmount(format!(
            "{value}: more fractional digits than the token's {decimals} decimals"
        )));
    }
    U256::from_str(&scaled.trunc().to_string())
        .map_err(|e| ServiceError::InvalidAmount(format!("{value}: {e}")))
}

/// Formats raw token units as a human decimal string, trailing zeros
/// stripped. Falls back to the raw integer when the value exceeds
/// `Decimal` range.
pub fn format_amount(value: U256, decimals: u8) -> String {
    match Decimal::from_str(&value.to_string()) {
        Ok(mut decimal) => {
            if decimals > 0 {
                decimal /= Decimal::from(10u64.pow(u32::from(decimals)));
            }
            decimal.normalize().to_string()
        }
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(
            parse_amount("1.5", 18).unwrap(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(parse_amount("2", 6).unwrap(), U256::from(2_000_000u64));
        assert_eq!(parse_amount("0", 18).unwrap(), U256::ZERO);
    }

    #[test]
    fn rejects_excess_precision() {
        assert!(parse_amount("0.0000001", 6).is_err());
        assert!(parse_amount("1.000001", 6).is_ok());
    }

    #[test]
    fn rejects_garbage_and_negatives() {
        assert!(parse_amount("abc", 18).is_err());
        assert!(parse_amount("-1", 18).is_err());
    }

    #[test]
    fn formats_with_trailing_zeros_stripped() {
        assert_eq!(
            format_amount(U256::from(1_500_000_000_000_000_000u128), 18),
            "1.5"
        );
        assert_eq!(format_amount(U256::from(2_000_000u64), 6), "2");
    }

    #[test]
    fn parse_format_round_trips() {
        for value in ["0.25", "1000", "19.743160687941225977"] {
            let raw = parse_amount(value, 18).unwrap();
            assert_eq!(format_amount(raw, 18), value);
        }
    }
}
