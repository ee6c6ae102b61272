//! Exact decimal ↔ base-unit conversion.
//!
//! Amounts arrive as human decimal strings ("100.5") and are compared
//! against on-chain balances in base units. Scaling is done on the digit
//! string so no precision is lost to floating point.

use crate::CodecError;
use alloy_primitives::U256;

/// Scale a human decimal amount into base units.
///
/// Rejects negative, empty and non-numeric input, and input with more
/// significant fractional digits than `decimals`. Zero is accepted.
pub fn parse_decimal_amount(input: &str, decimals: u8) -> Result<U256, CodecError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CodecError::amount(input, "amount is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(CodecError::amount(input, "amount must not be negative"));
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::amount(input, "amount is not a decimal number"));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::amount(input, "amount is not a decimal number"));
    }

    let fraction = fraction.trim_end_matches('0');
    let scale = usize::from(decimals);
    if fraction.len() > scale {
        return Err(CodecError::amount(
            input,
            format!("more than {decimals} fractional digits"),
        ));
    }

    let mut digits = String::with_capacity(whole.len() + scale);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(scale - fraction.len()));

    U256::from_str_radix(&digits, 10)
        .map_err(|_| CodecError::amount(input, "amount does not fit in 256 bits"))
}

/// Render base units as a human decimal string.
///
/// Trailing fractional zeros are dropped, so `500_000_000` at 6 decimals
/// renders as `"500"` and `1_500_000` as `"1.5"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let scale = usize::from(decimals);
    if scale == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = scale + 1);
    let (whole, fraction) = padded.split_at(padded.len() - scale);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scales_whole_and_fractional_amounts() {
        assert_eq!(parse_decimal_amount("100", 6).unwrap(), U256::from(100_000_000u64));
        assert_eq!(parse_decimal_amount("0.000001", 6).unwrap(), U256::from(1u64));
        assert_eq!(parse_decimal_amount("1.50", 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(parse_decimal_amount("0", 6).unwrap(), U256::ZERO);
    }

    #[test]
    fn rejects_malformed_amounts() {
        for bad in ["", "-1", "abc", "1.2.3", ".5", "1e6", "0.0000001"] {
            assert!(parse_decimal_amount(bad, 6).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn formats_without_trailing_zeros() {
        assert_eq!(format_units(U256::from(500_000_000u64), 6), "500");
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(42u64), 6), "0.000042");
        assert_eq!(format_units(U256::ZERO, 6), "0");
        assert_eq!(format_units(U256::from(7u64), 0), "7");
    }

    proptest! {
        #[test]
        fn format_then_parse_recovers_base_units(raw in any::<u64>(), decimals in 0u8..18) {
            let value = U256::from(raw);
            let rendered = format_units(value, decimals);
            prop_assert_eq!(parse_decimal_amount(&rendered, decimals).unwrap(), value);
        }

        #[test]
        fn scaling_preserves_order(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let left = parse_decimal_amount(&format!("{}.{:02}", a / 100, a % 100), 6).unwrap();
            let right = parse_decimal_amount(&format!("{}.{:02}", b / 100, b % 100), 6).unwrap();
            prop_assert_eq!(left.cmp(&right), a.cmp(&b));
        }
    }
}
