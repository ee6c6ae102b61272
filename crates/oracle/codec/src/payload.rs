//! Base64 transport encoding of report payloads.

use crate::CodecError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn base64_to_bytes(input: &str) -> Result<Vec<u8>, CodecError> {
    STANDARD
        .decode(input)
        .map_err(|e| CodecError::InvalidPayload(format!("not base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_bytes_round_trip_through_base64() {
        assert_eq!(bytes_to_base64(&[0x70, 0xa0, 0x82, 0x31]), "cKCCMQ==");
        assert_eq!(base64_to_bytes("cKCCMQ==").unwrap(), vec![0x70, 0xa0, 0x82, 0x31]);
        assert!(base64_to_bytes("not base64!").is_err());
    }
}
