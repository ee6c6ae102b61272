//! Node-local execution and consensus reduction.
//!
//! A workflow step that touches the outside world is expressed as a
//! [`NodeTask`]. The [`ConsensusRuntime`] runs that task once on every
//! participating node, each with its own HTTP transport, and collapses the
//! observations into a single agreed [`ConsensusValue`] with a [`Reducer`].
//!
//! ```text
//! step ──fan-out──▶ node-0 ─┐
//!                   node-1 ─┼──fan-in──▶ Reducer ──▶ agreed value
//!                   node-2 ─┤                    └─▶ ConsensusError
//!                   node-3 ─┘
//! ```
//!
//! Failed upstream calls never abort a step: the node reports
//! [`ConsensusValue::Error`] and the reducer treats it as an abstention.

#![deny(unsafe_code)]

mod error;
mod node;
mod reducer;
mod runtime;
mod value;

pub use error::ConsensusError;
pub use node::{
    HttpClient, HttpMethod, HttpRequest, HttpResponse, NodeContext, NodeId, NodeTask,
};
pub use reducer::{ReductionPolicy, Reducer};
pub use runtime::{ConsensusRuntime, LocalDon};
pub use value::ConsensusValue;
