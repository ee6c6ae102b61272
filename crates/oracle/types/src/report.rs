//! Signed attestations and their delivery

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the report payload was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    Evm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningAlgorithm {
    Ed25519,
    Ecdsa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Keccak256,
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keccak256 => write!(f, "keccak256"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

/// One node's signature over the report digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSignature {
    /// Hex-encoded public key.
    pub signer: String,
    /// Hex-encoded signature bytes.
    pub signature: String,
}

/// A consensus-finalized payload plus attestation metadata.
///
/// Created exactly once per delivery and moved into the delivery client,
/// hence not `Clone`.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedReport {
    /// Base64 of the ABI-encoded payload.
    pub encoded_payload: String,
    pub encoder_kind: EncoderKind,
    pub signing_algorithm: SigningAlgorithm,
    pub hash_algorithm: HashAlgorithm,
    /// Hex digest of the raw payload.
    pub digest: String,
    pub signatures: Vec<NodeSignature>,
}

/// Gas settings for one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasConfig {
    pub gas_limit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failure,
    Pending,
}

/// Result of submitting a report to the destination chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    pub tx_hash: Option<String>,
    pub status: TxStatus,
    pub error_message: Option<String>,
}

impl DeliveryOutcome {
    pub fn success(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: Some(tx_hash.into()),
            status: TxStatus::Success,
            error_message: None,
        }
    }

    pub fn pending(tx_hash: Option<String>) -> Self {
        Self {
            tx_hash,
            status: TxStatus::Pending,
            error_message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            tx_hash: None,
            status: TxStatus::Failure,
            error_message: Some(message.into()),
        }
    }

    /// Operator-facing summary line.
    pub fn status_line(&self) -> String {
        let hash = self.tx_hash.as_deref().unwrap_or("pending");
        match self.status {
            TxStatus::Success => format!("Compliance sync complete. Tx: {hash}"),
            TxStatus::Pending => format!("Compliance sync pending. Tx: {hash}"),
            TxStatus::Failure => format!(
                "Failed: {}",
                self.error_message.as_deref().unwrap_or("unknown delivery error")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lines_cover_every_delivery_status() {
        assert_eq!(
            DeliveryOutcome::success("0xfeed").status_line(),
            "Compliance sync complete. Tx: 0xfeed"
        );
        assert_eq!(
            DeliveryOutcome::pending(None).status_line(),
            "Compliance sync pending. Tx: pending"
        );
        assert_eq!(
            DeliveryOutcome::failure("execution reverted").status_line(),
            "Failed: execution reverted"
        );
    }

    #[test]
    fn report_metadata_serializes_lowercase() {
        let report = SignedReport {
            encoded_payload: "AAEC".into(),
            encoder_kind: EncoderKind::Evm,
            signing_algorithm: SigningAlgorithm::Ed25519,
            hash_algorithm: HashAlgorithm::Keccak256,
            digest: "00".into(),
            signatures: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["encoderKind"], "evm");
        assert_eq!(json["hashAlgorithm"], "keccak256");
        assert_eq!(json["encodedPayload"], "AAEC");
    }
}
