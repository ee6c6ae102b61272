use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A frozen account observed on the source ledger.
///
/// "Frozen" is currently approximated as "holds a zero balance of the
/// tracked token"; see `MirrorNodeClient::zero_balance_accounts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceEvent {
    /// Source-ledger account id, e.g. `0.0.12345`.
    pub account: String,
    pub frozen: bool,
    /// Consensus timestamp reported by the source ledger.
    pub source_timestamp: String,
    /// Destination-chain address, filled in once the account is mapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evm_address: Option<Address>,
}

impl ComplianceEvent {
    pub fn frozen(account: impl Into<String>, source_timestamp: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            frozen: true,
            source_timestamp: source_timestamp.into(),
            evm_address: None,
        }
    }

    pub fn with_evm_address(mut self, address: Address) -> Self {
        self.evm_address = Some(address);
        self
    }
}
