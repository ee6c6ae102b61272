//! HTTP trigger authentication
//!
//! Callers sign the raw request body with Ed25519 and send the hex
//! signature in [`SIGNATURE_HEADER`]. A request is accepted when any
//! authorized key verifies it.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use oracle_types::{OracleError, TriggerAuthConfig};
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "x-oracle-signature";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing x-oracle-signature header")]
    MissingSignature,

    #[error("signature is not valid hex: {0}")]
    Encoding(String),

    #[error("signature must be 64 bytes, found {0}")]
    Length(usize),

    #[error("signature does not match any authorized key")]
    Unauthorized,
}

#[derive(Debug, Clone)]
pub struct TriggerAuthenticator {
    keys: Vec<VerifyingKey>,
}

impl TriggerAuthenticator {
    pub fn from_config(config: &TriggerAuthConfig) -> Result<Self, OracleError> {
        let keys = config
            .authorized_keys
            .iter()
            .enumerate()
            .map(|(index, key)| parse_key(key).map_err(|reason| {
                OracleError::Config(format!("auth.authorized_keys[{index}]: {reason}"))
            }))
            .collect::<Result<Vec<_>, _>>()?;
        if keys.is_empty() {
            return Err(OracleError::Config(
                "auth.authorized_keys: at least one key is required".to_string(),
            ));
        }
        Ok(Self { keys })
    }

    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<(), AuthError> {
        let signature = signature.ok_or(AuthError::MissingSignature)?;
        let bytes = hex::decode(signature.trim().trim_start_matches("0x"))
            .map_err(|e| AuthError::Encoding(e.to_string()))?;
        let bytes: [u8; 64] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AuthError::Length(bytes.len()))?;
        let signature = Signature::from_bytes(&bytes);

        if self.keys.iter().any(|key| key.verify(body, &signature).is_ok()) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }
}

fn parse_key(key: &str) -> Result<VerifyingKey, String> {
    let bytes = hex::decode(key.trim().trim_start_matches("0x")).map_err(|e| e.to_string())?;
    let bytes: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| format!("expected 32 bytes, found {}", bytes.len()))?;
    VerifyingKey::from_bytes(&bytes).map_err(|e| e.to_string())
}
