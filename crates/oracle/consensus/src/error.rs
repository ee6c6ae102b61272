use oracle_types::OracleError;

/// Consensus errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsensusError {
    #[error(
        "only {observed} usable observations for a quorum of {required} ({errors} nodes errored)"
    )]
    InsufficientObservations {
        observed: usize,
        errors: usize,
        required: usize,
    },

    #[error("no value reached quorum: best had {best} of {required} votes")]
    NoMajority { best: usize, required: usize },

    #[error("field {index}: {source}")]
    Field {
        index: usize,
        source: Box<ConsensusError>,
    },

    #[error("invalid network shape: {0}")]
    InvalidTopology(String),
}

impl ConsensusError {
    /// Attach the failing workflow step.
    pub fn at_step(self, step: &str) -> OracleError {
        OracleError::consensus(step, self.to_string())
    }
}

impl From<ConsensusError> for OracleError {
    fn from(err: ConsensusError) -> Self {
        err.at_step("unknown")
    }
}
