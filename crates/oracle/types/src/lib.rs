//! Domain types for the oracle workflows.
//!
//! Every entity here except [`WorkflowConfig`] is request-scoped: it is
//! created inside one workflow invocation and dropped when the invocation
//! returns. The configuration is resolved once per deployment and shared
//! read-only.
//!
//! # Key Concepts
//!
//! - **BridgeRequest**: the inbound payload of the HTTP-triggered bridge
//!   simulation.
//! - **PreflightResult / SimulationOutcome / AnalysisSummary**: derived
//!   per-step results of the bridge simulation.
//! - **ComplianceEvent**: a frozen account observed on the source ledger.
//! - **SignedReport / DeliveryOutcome**: the attestation and the result of
//!   submitting it to the destination chain.

#![deny(unsafe_code)]

mod bridge;
mod chains;
mod compliance;
mod config;
mod errors;
mod report;

pub use bridge::*;
pub use chains::*;
pub use compliance::*;
pub use config::*;
pub use errors::*;
pub use report::*;
