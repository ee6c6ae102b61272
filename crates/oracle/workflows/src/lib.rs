//! Consensus-gated workflows.
//!
//! Each workflow owns a per-invocation [`StateMachine`] and runs its steps
//! strictly in sequence. A step fans out to every node through the
//! [`ConsensusRuntime`](oracle_consensus::ConsensusRuntime), and the
//! workflow branches only on the reduced value.
//!
//! - [`BridgeSimulationWorkflow`]: HTTP-triggered, read-only dry run of a
//!   cross-chain transfer with an AI-written summary.
//! - [`ComplianceSyncWorkflow`]: cron-triggered propagation of frozen
//!   accounts into a destination-chain blacklist through one signed report.

#![deny(unsafe_code)]

pub mod bridge_simulation;
pub mod compliance_sync;
pub mod engine;

pub use bridge_simulation::{
    decode_request, BridgeSimulationResponse, BridgeSimulationWorkflow, PreflightView,
    SimulatedReport,
};
pub use compliance_sync::{ComplianceSyncOutcome, ComplianceSyncWorkflow};
pub use engine::{BridgeState, ComplianceState, StateMachine, WorkflowState};
