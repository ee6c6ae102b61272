//! Error taxonomy shared by every oracle crate

/// Errors that can occur while running an oracle workflow
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The requested direction or feature cannot be simulated.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Unknown chain identifier or malformed request.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A single outbound call failed.
    #[error("Upstream call to {target} failed: {message}")]
    UpstreamCall { target: String, message: String },

    /// The call was sent but no reply arrived in time; the peer may still
    /// have acted on it.
    #[error("Upstream call to {target} timed out")]
    UpstreamTimeout { target: String },

    /// Not enough agreeing nodes for a step.
    #[error("Consensus failure in step '{step}': {reason}")]
    ConsensusFailure { step: String, reason: String },

    #[error("Analysis degraded: {0}")]
    AnalysisDegraded(String),

    #[error("Delivery failure: {0}")]
    DeliveryFailure(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signing error: {0}")]
    Signing(String),

    /// Illegal workflow state transition.
    #[error("Workflow engine error: {0}")]
    Engine(String),
}

impl OracleError {
    pub fn upstream(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamCall {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn timeout(target: impl Into<String>) -> Self {
        Self::UpstreamTimeout {
            target: target.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::UpstreamTimeout { .. })
    }

    pub fn consensus(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConsensusFailure {
            step: step.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedOperation(_) => "unsupported_operation",
            Self::Validation(_) => "validation_error",
            Self::UpstreamCall { .. } => "upstream_call_error",
            Self::UpstreamTimeout { .. } => "upstream_timeout",
            Self::ConsensusFailure { .. } => "consensus_failure",
            Self::AnalysisDegraded(_) => "analysis_degraded",
            Self::DeliveryFailure(_) => "delivery_failure",
            Self::Codec(_) => "codec_error",
            Self::Config(_) => "config_error",
            Self::Signing(_) => "signing_error",
            Self::Engine(_) => "engine_error",
        }
    }

    /// Whether a fresh invocation could succeed where this one failed.
    ///
    /// Delivery failures are deliberately excluded: resubmitting a signed
    /// report can double-deliver when the first submission was only slow.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamCall { .. } | Self::UpstreamTimeout { .. } | Self::ConsensusFailure { .. }
        )
    }
}

/// Result type alias for oracle operations
pub type OracleResult<T> = Result<T, OracleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct_for_business_and_consensus_failures() {
        let validation = OracleError::Validation("bad chain".into());
        let consensus = OracleError::consensus("preflight", "2 of 4 nodes agreed");

        assert_eq!(validation.kind(), "validation_error");
        assert_eq!(consensus.kind(), "consensus_failure");
        assert!(consensus.to_string().contains("preflight"));
    }

    #[test]
    fn delivery_failures_are_not_retryable() {
        assert!(!OracleError::DeliveryFailure("reverted".into()).is_retryable());
        assert!(!OracleError::UnsupportedOperation("hedera".into()).is_retryable());
        assert!(OracleError::upstream("http://rpc.local", "timeout").is_retryable());
    }

    #[test]
    fn timeouts_are_distinguished_from_other_upstream_errors() {
        let timeout = OracleError::timeout("http://forwarder.local");
        assert!(timeout.is_timeout());
        assert_eq!(timeout.kind(), "upstream_timeout");
        assert!(!OracleError::upstream("http://forwarder.local", "connection refused").is_timeout());
    }
}
