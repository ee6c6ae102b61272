//! Minimal Solidity ABI encoder.
//!
//! Covers the argument kinds the workflows call with: `address`,
//! `uint<N>`, `bool`, `bytes` and dynamic arrays of those.

use crate::CodecError;
use alloy_primitives::{keccak256, Address, U256};

/// One ABI-encodable argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    /// Any `uint<N>`; always encoded as a full word.
    Uint(U256),
    Bool(bool),
    Bytes(Vec<u8>),
    Array(Vec<Token>),
}

impl Token {
    fn is_dynamic(&self) -> bool {
        matches!(self, Token::Bytes(_) | Token::Array(_))
    }
}

/// First four bytes of the keccak256 hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Encode a tuple of arguments using the head/tail layout.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = 32 * tokens.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&word(head_len + tail.len()));
            tail.extend(encode_token(token));
        } else {
            head.extend(encode_token(token));
        }
    }

    head.extend(tail);
    head
}

pub fn encode_call(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    out.extend(encode(tokens));
    out
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Address(address) => {
            let mut out = vec![0u8; 12];
            out.extend_from_slice(address.as_slice());
            out
        }
        Token::Uint(value) => value.to_be_bytes::<32>().to_vec(),
        Token::Bool(flag) => U256::from(u8::from(*flag)).to_be_bytes::<32>().to_vec(),
        Token::Bytes(data) => {
            let mut out = word(data.len()).to_vec();
            out.extend_from_slice(data);
            let padding = (32 - data.len() % 32) % 32;
            out.extend(std::iter::repeat(0u8).take(padding));
            out
        }
        Token::Array(items) => {
            let mut out = word(items.len()).to_vec();
            out.extend(encode(items));
            out
        }
    }
}

fn word(value: usize) -> [u8; 32] {
    U256::from(value).to_be_bytes::<32>()
}

pub fn parse_address(input: &str) -> Result<Address, CodecError> {
    let trimmed = input.trim();
    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(CodecError::InvalidAddress(input.to_string()));
    }
    trimmed
        .parse::<Address>()
        .map_err(|_| CodecError::InvalidAddress(input.to_string()))
}

/// `0x`-prefixed lower-case hex, the form JSON-RPC expects for `data`.
pub fn to_hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ── Calls used by the workflows ──────────────────────────────────────

pub fn balance_of(owner: Address) -> Vec<u8> {
    encode_call("balanceOf(address)", &[Token::Address(owner)])
}

pub fn address_rejected(account: Address) -> Vec<u8> {
    encode_call("addressRejected(address)", &[Token::Address(account)])
}

pub fn reject_address(account: Address) -> Vec<u8> {
    encode_call("rejectAddress(address)", &[Token::Address(account)])
}

/// Bridge entrypoint `(uint64 destinationChainSelector, bytes receiver, uint256 amount)`.
///
/// The receiver travels as its 32-byte left-padded word so non-EVM
/// destinations can interpret it themselves.
pub fn bridge_call(
    signature: &str,
    destination_selector: u64,
    receiver: Address,
    amount: U256,
) -> Vec<u8> {
    let receiver_word = encode_token(&Token::Address(receiver));
    encode_call(
        signature,
        &[
            Token::Uint(U256::from(destination_selector)),
            Token::Bytes(receiver_word),
            Token::Uint(amount),
        ],
    )
}

/// ABI `bytes[]` of several calldata blobs.
pub fn bytes_array(items: Vec<Vec<u8>>) -> Vec<u8> {
    encode(&[Token::Array(items.into_iter().map(Token::Bytes).collect())])
}
