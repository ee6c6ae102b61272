//! Outbound connectors.
//!
//! Each connector speaks one external protocol over the node-supplied
//! [`HttpClient`](oracle_consensus::HttpClient), so the same code runs under
//! every node of the consensus runtime and against scripted transports in
//! tests.

#![deny(unsafe_code)]

mod address;
mod evm;
mod forwarder;
mod gemini;
mod http;
mod mirror;

pub use address::{long_zero_alias, AddressResolver};
pub use evm::EvmRpc;
pub use forwarder::ForwarderDeliveryClient;
pub use gemini::{extract_candidate_text, ExtractionError, GeminiClient, TextGenerator, AUTH_ENV_VAR};
pub use http::ReqwestHttpClient;
pub use mirror::{MirrorNodeClient, ZeroBalanceSnapshot};
