//! JSON-RPC request and response shapes for `eth_call` / `eth_estimateGas`.

use crate::delimited::ERROR_SENTINEL;
use crate::quantity::encode_hex_quantity;
use crate::CodecError;
use serde::Serialize;
use serde_json::{json, Value};

/// Transaction object passed as the first parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
}

/// One JSON-RPC call against block `latest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcCall {
    method: &'static str,
    params: CallParams,
    id: u64,
}

impl RpcCall {
    pub fn eth_call(to: impl Into<String>, data: &[u8]) -> Self {
        Self::new("eth_call", to.into(), data)
    }

    pub fn estimate_gas(to: impl Into<String>, data: &[u8]) -> Self {
        Self::new("eth_estimateGas", to.into(), data)
    }

    fn new(method: &'static str, to: String, data: &[u8]) -> Self {
        Self {
            method,
            params: CallParams {
                from: None,
                to,
                data: crate::abi::to_hex_data(data),
                gas: None,
            },
            id: 1,
        }
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.params.from = Some(from.into());
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.params.gas = Some(encode_hex_quantity(gas));
        self
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn method(&self) -> &str {
        self.method
    }

    pub fn to_json(&self) -> Value {
        json!({
            "jsonrpc": "2.0",
            "method": self.method,
            "params": [self.params, "latest"],
            "id": self.id,
        })
    }

    pub fn to_body(&self) -> Vec<u8> {
        self.to_json().to_string().into_bytes()
    }
}

/// Decoded JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcReply {
    Result(String),
    Error(String),
    /// Neither a usable `result` nor an `error.message`.
    Empty,
}

impl RpcReply {
    pub fn decode(body: &[u8]) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| CodecError::MalformedResponse(e.to_string()))?;

        let result = value
            .get("result")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        if let Some(result) = result {
            return Ok(Self::Result(result.to_string()));
        }

        let message = value
            .pointer("/error/message")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        Ok(match message {
            Some(message) => Self::Error(message.to_string()),
            None => Self::Empty,
        })
    }

    /// Collapse to a single string: the result, else the error message,
    /// else the error sentinel.
    pub fn into_value(self) -> String {
        match self {
            Self::Result(v) | Self::Error(v) => v,
            Self::Empty => ERROR_SENTINEL.to_string(),
        }
    }

    pub fn result(&self) -> Option<&str> {
        match self {
            Self::Result(v) => Some(v),
            _ => None,
        }
    }
}
