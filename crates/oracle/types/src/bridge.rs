//! Bridge simulation request and per-step results

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Inbound payload of the HTTP-triggered bridge simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRequest {
    pub source_chain: String,
    pub dest_chain: String,
    /// Decimal string in human units, e.g. `"100.5"`.
    pub amount: String,
    pub sender_address: String,
    pub receiver_address: String,
}

impl BridgeRequest {
    /// Human-readable direction, e.g. `sepolia → hedera`.
    pub fn direction(&self) -> String {
        format!("{} → {}", self.source_chain, self.dest_chain)
    }

    /// Same request with both chain identifiers lower-cased and trimmed.
    pub fn normalized(mut self) -> Self {
        self.source_chain = self.source_chain.trim().to_lowercase();
        self.dest_chain = self.dest_chain.trim().to_lowercase();
        self.amount = self.amount.trim().to_string();
        self.sender_address = self.sender_address.trim().to_string();
        self.receiver_address = self.receiver_address.trim().to_string();
        self
    }
}

/// Agreed result of the three preflight reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightResult {
    /// Sender balance in base units.
    pub balance: U256,
    pub sender_blacklisted: bool,
    pub receiver_blacklisted: bool,
    pub has_sufficient_balance: bool,
    /// Checks whose agreed value was the error sentinel.
    pub degraded_checks: Vec<String>,
}

impl PreflightResult {
    /// True when nothing in the preflight would block the transfer.
    pub fn is_clear(&self) -> bool {
        self.has_sufficient_balance && !self.sender_blacklisted && !self.receiver_blacklisted
    }
}

/// Agreed result of the dry-run of the bridge call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub success: bool,
    pub gas_used: Option<u64>,
    pub error_message: Option<String>,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub raw_return_data: String,
}

/// Natural-language risk summary. Always present in a simulated response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisSummary {
    Generated(String),
    Fallback(String),
}

impl AnalysisSummary {
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) | Self::Fallback(text) => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_fields() {
        let request: BridgeRequest = serde_json::from_str(
            r#"{"sourceChain":"Sepolia","destChain":"hedera","amount":"100",
                "senderAddress":"0xabc","receiverAddress":"0xdef"}"#,
        )
        .unwrap();

        let normalized = request.normalized();
        assert_eq!(normalized.source_chain, "sepolia");
        assert_eq!(normalized.direction(), "sepolia → hedera");
    }

    #[test]
    fn preflight_is_clear_only_without_blockers() {
        let mut preflight = PreflightResult {
            balance: U256::from(10u64),
            sender_blacklisted: false,
            receiver_blacklisted: false,
            has_sufficient_balance: true,
            degraded_checks: vec![],
        };
        assert!(preflight.is_clear());

        preflight.receiver_blacklisted = true;
        assert!(!preflight.is_clear());
    }

    #[test]
    fn fallback_summary_is_degraded() {
        let summary = AnalysisSummary::Fallback("Raw AI response: {}".into());
        assert!(summary.is_degraded());
        assert_eq!(summary.text(), "Raw AI response: {}");
    }
}
