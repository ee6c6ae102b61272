//! Threshold report signing

use crate::ReportError;
use alloy_primitives::keccak256;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use oracle_codec::{base64_to_bytes, bytes_to_base64};
use oracle_types::{
    EncoderKind, HashAlgorithm, NodeSignature, SignedReport, SigningAlgorithm,
};
use std::collections::BTreeSet;

/// Finalized payload awaiting signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub payload: Vec<u8>,
    pub encoder_kind: EncoderKind,
    pub hash_algorithm: HashAlgorithm,
}

impl ReportRequest {
    /// ABI-encoded payload hashed with keccak256, as EVM receivers expect.
    pub fn evm(payload: Vec<u8>) -> Self {
        Self {
            payload,
            encoder_kind: EncoderKind::Evm,
            hash_algorithm: HashAlgorithm::Keccak256,
        }
    }

    pub fn with_hash(mut self, hash_algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = hash_algorithm;
        self
    }
}

/// Turns a consensus-finalized payload into an attestation.
pub trait ReportSigner: Send + Sync {
    /// Deterministic: identical requests yield identical reports.
    fn sign(&self, request: ReportRequest) -> Result<SignedReport, ReportError>;

    fn verify(&self, report: &SignedReport) -> Result<(), ReportError>;
}

pub fn report_digest(algorithm: HashAlgorithm, payload: &[u8]) -> [u8; 32] {
    match algorithm {
        HashAlgorithm::Keccak256 => keccak256(payload).0,
        HashAlgorithm::Blake3 => *blake3::hash(payload).as_bytes(),
    }
}

/// One Ed25519 key per network node; a report is valid once `threshold`
/// distinct nodes have signed its digest.
pub struct QuorumReportSigner {
    keys: Vec<SigningKey>,
    threshold: usize,
}

impl QuorumReportSigner {
    pub fn new(keys: Vec<SigningKey>, threshold: usize) -> Result<Self, ReportError> {
        if keys.is_empty() {
            return Err(ReportError::InvalidSignerSet("no signing keys".to_string()));
        }
        if threshold == 0 || threshold > keys.len() {
            return Err(ReportError::InvalidSignerSet(format!(
                "threshold {threshold} is outside 1..={}",
                keys.len()
            )));
        }
        Ok(Self { keys, threshold })
    }

    /// Build from hex-encoded 32-byte seeds, one per node.
    pub fn from_hex_seeds(seeds: &[String], threshold: usize) -> Result<Self, ReportError> {
        let keys = seeds
            .iter()
            .enumerate()
            .map(|(index, seed)| {
                let bytes = hex::decode(seed.trim().trim_start_matches("0x")).map_err(|e| {
                    ReportError::InvalidSeed {
                        index,
                        reason: e.to_string(),
                    }
                })?;
                let secret: [u8; 32] =
                    bytes
                        .as_slice()
                        .try_into()
                        .map_err(|_| ReportError::InvalidSeed {
                            index,
                            reason: format!("expected 32 bytes, found {}", bytes.len()),
                        })?;
                Ok(SigningKey::from_bytes(&secret))
            })
            .collect::<Result<Vec<_>, ReportError>>()?;
        Self::new(keys, threshold)
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Hex-encoded public keys in node order.
    pub fn public_keys(&self) -> Vec<String> {
        self.keys
            .iter()
            .map(|k| hex::encode(k.verifying_key().as_bytes()))
            .collect()
    }

    fn verify_one(&self, digest: &[u8], entry: &NodeSignature) -> Result<(), ReportError> {
        let bad = || ReportError::BadSignature {
            signer: entry.signer.clone(),
        };

        let pk_bytes: [u8; 32] = hex::decode(&entry.signer)
            .map_err(|_| bad())?
            .as_slice()
            .try_into()
            .map_err(|_| bad())?;
        let sig_bytes: [u8; 64] = hex::decode(&entry.signature)
            .map_err(|_| bad())?
            .as_slice()
            .try_into()
            .map_err(|_| bad())?;

        let verifying_key = VerifyingKey::from_bytes(&pk_bytes).map_err(|_| bad())?;
        verifying_key
            .verify(digest, &Signature::from_bytes(&sig_bytes))
            .map_err(|_| bad())
    }
}

impl ReportSigner for QuorumReportSigner {
    fn sign(&self, request: ReportRequest) -> Result<SignedReport, ReportError> {
        if request.payload.is_empty() {
            return Err(ReportError::EmptyPayload);
        }

        let digest = report_digest(request.hash_algorithm, &request.payload);
        let signatures = self
            .keys
            .iter()
            .map(|key| NodeSignature {
                signer: hex::encode(key.verifying_key().as_bytes()),
                signature: hex::encode(key.sign(&digest).to_bytes()),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            hash = %request.hash_algorithm,
            signatures = signatures.len(),
            payload_bytes = request.payload.len(),
            "Report signed"
        );

        Ok(SignedReport {
            encoded_payload: bytes_to_base64(&request.payload),
            encoder_kind: request.encoder_kind,
            signing_algorithm: SigningAlgorithm::Ed25519,
            hash_algorithm: request.hash_algorithm,
            digest: format!("0x{}", hex::encode(digest)),
            signatures,
        })
    }

    fn verify(&self, report: &SignedReport) -> Result<(), ReportError> {
        if report.signing_algorithm != SigningAlgorithm::Ed25519 {
            return Err(ReportError::UnsupportedAlgorithm(format!(
                "{:?}",
                report.signing_algorithm
            )));
        }

        let payload =
            base64_to_bytes(&report.encoded_payload).map_err(|_| ReportError::MalformedPayload)?;
        let digest = report_digest(report.hash_algorithm, &payload);
        if report.digest != format!("0x{}", hex::encode(digest)) {
            return Err(ReportError::DigestMismatch);
        }

        let members: BTreeSet<String> = self.public_keys().into_iter().collect();
        let mut signed_by = BTreeSet::new();
        for entry in &report.signatures {
            self.verify_one(&digest, entry)?;
            if members.contains(&entry.signer) {
                signed_by.insert(entry.signer.as_str());
            }
        }

        if signed_by.len() < self.threshold {
            return Err(ReportError::BelowThreshold {
                valid: signed_by.len(),
                threshold: self.threshold,
            });
        }
        Ok(())
    }
}
