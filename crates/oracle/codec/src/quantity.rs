//! Hex-encoded integer quantities as returned by JSON-RPC.

use crate::CodecError;
use alloy_primitives::U256;

/// Decode a `0x`-prefixed hex quantity or 32-byte word.
///
/// An empty result (`"0x"`) decodes to zero.
pub fn decode_hex_quantity(input: &str) -> Result<U256, CodecError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| CodecError::InvalidHex(input.to_string()))?;

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(U256::ZERO);
    }
    if significant.len() > 64 {
        return Err(CodecError::InvalidHex(input.to_string()));
    }

    U256::from_str_radix(significant, 16).map_err(|_| CodecError::InvalidHex(input.to_string()))
}

/// Decode an ABI `bool` return word: any non-zero word is `true`.
pub fn decode_word_bool(input: &str) -> Result<bool, CodecError> {
    decode_hex_quantity(input).map(|word| !word.is_zero())
}

pub fn encode_hex_quantity(value: u64) -> String {
    format!("0x{value:x}")
}
