//! Signed reports and their delivery.
//!
//! A report is the only thing a workflow sends on-chain. It is signed once
//! by the network ([`ReportSigner`]) and then moved into a
//! [`DeliveryClient`], which submits it exactly once.

#![deny(unsafe_code)]

mod delivery;
mod error;
mod signer;

pub use delivery::{DeliveryClient, InMemoryDeliveryClient, RecordedDelivery};
pub use error::ReportError;
pub use signer::{report_digest, QuorumReportSigner, ReportRequest, ReportSigner};
