//! Observations exchanged between nodes

use alloy_primitives::U256;
use oracle_codec::{DelimitedRecord, ERROR_SENTINEL};
use std::fmt;

/// A single node's observation for one step.
///
/// The derived ordering compares variants first, then contents: numbers
/// numerically, text and bytes lexicographically, fields element-wise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConsensusValue {
    Number(U256),
    Text(String),
    Bytes(Vec<u8>),
    Fields(Vec<ConsensusValue>),
    /// The node could not produce a value; carries the reason.
    Error(String),
}

impl ConsensusValue {
    pub fn number(value: impl Into<U256>) -> Self {
        Self::Number(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error(reason.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn as_number(&self) -> Option<U256> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&[ConsensusValue]> {
        match self {
            Self::Fields(f) => Some(f),
            _ => None,
        }
    }

    pub fn error_reason(&self) -> Option<&str> {
        match self {
            Self::Error(reason) => Some(reason),
            _ => None,
        }
    }

    /// Field at `index`, if this is a `Fields` value of sufficient arity.
    pub fn field(&self, index: usize) -> Option<&ConsensusValue> {
        self.as_fields().and_then(|fields| fields.get(index))
    }

    /// Legacy `|`-joined rendering. Errors collapse to the sentinel and
    /// nested fields are joined with `,`.
    pub fn to_record(&self) -> DelimitedRecord {
        match self {
            Self::Fields(fields) => {
                DelimitedRecord::sanitized(fields.iter().map(Self::render_scalar))
            }
            other => DelimitedRecord::sanitized([Self::render_scalar(other)]),
        }
    }

    fn render_scalar(value: &ConsensusValue) -> String {
        match value {
            Self::Number(n) => n.to_string(),
            Self::Text(t) => t.clone(),
            Self::Bytes(b) => format!("0x{}", hex::encode(b)),
            Self::Fields(nested) => nested
                .iter()
                .map(Self::render_scalar)
                .collect::<Vec<_>>()
                .join(","),
            Self::Error(_) => ERROR_SENTINEL.to_string(),
        }
    }
}

impl fmt::Display for ConsensusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_order_numerically() {
        let mut values = vec![
            ConsensusValue::number(U256::from(100u64)),
            ConsensusValue::number(U256::from(9u64)),
            ConsensusValue::number(U256::from(50u64)),
        ];
        values.sort();
        assert_eq!(values[0], ConsensusValue::number(U256::from(9u64)));
        assert_eq!(values[2], ConsensusValue::number(U256::from(100u64)));
    }

    #[test]
    fn renders_fields_with_error_sentinel() {
        let value = ConsensusValue::Fields(vec![
            ConsensusValue::number(U256::from(500u64)),
            ConsensusValue::error("timeout"),
            ConsensusValue::Fields(vec![ConsensusValue::text("0.0.1"), ConsensusValue::text("0.0.2")]),
        ]);
        assert_eq!(value.to_string(), "500|error|0.0.1,0.0.2");
    }

    #[test]
    fn delimiter_inside_text_is_replaced() {
        assert_eq!(ConsensusValue::text("a|b").to_string(), "a/b");
    }
}
