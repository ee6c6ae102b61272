use oracle_types::OracleError;

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("invalid hex quantity '{0}'")]
    InvalidHex(String),

    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("invalid report payload: {0}")]
    InvalidPayload(String),

    #[error("malformed JSON-RPC response: {0}")]
    MalformedResponse(String),
}

impl CodecError {
    pub(crate) fn amount(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<CodecError> for OracleError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::InvalidAmount { .. } | CodecError::InvalidAddress(_) => {
                OracleError::Validation(err.to_string())
            }
            other => OracleError::Codec(other.to_string()),
        }
    }
}
