use oracle_types::OracleError;

/// Report signing and verification errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("invalid signing seed for node {index}: {reason}")]
    InvalidSeed { index: usize, reason: String },

    #[error("invalid signer set: {0}")]
    InvalidSignerSet(String),

    #[error("report payload is empty")]
    EmptyPayload,

    #[error("report payload is not valid base64")]
    MalformedPayload,

    #[error("digest does not match payload")]
    DigestMismatch,

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("signature from '{signer}' failed verification")]
    BadSignature { signer: String },

    #[error("only {valid} valid signatures, threshold is {threshold}")]
    BelowThreshold { valid: usize, threshold: usize },
}

impl From<ReportError> for OracleError {
    fn from(err: ReportError) -> Self {
        OracleError::Signing(err.to_string())
    }
}
