//! Scripted ledger, RPC node, mirror node and Gemini backend shared by
//! the workflow suites.

#![allow(dead_code)]

use alloy_primitives::Address;
use async_trait::async_trait;
use oracle_codec::abi;
use oracle_consensus::{HttpClient, HttpRequest, HttpResponse, LocalDon};
use oracle_types::{OracleError, WorkflowConfig};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TOKEN: &str = "0x00000000000000000000000000000000000000aa";
pub const POLICY: &str = "0x00000000000000000000000000000000000000bb";
pub const SPOKE: &str = "0x00000000000000000000000000000000000000cc";
pub const SENDER: &str = "0x1111111111111111111111111111111111111111";
pub const RECEIVER: &str = "0x2222222222222222222222222222222222222222";
pub const MAPPED: &str = "0x3333333333333333333333333333333333333333";

pub const ANALYSIS_TEXT: &str = "The bridge would succeed. Confidence: high.";

/// What the fake world looks like to every node.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub balance: u64,
    pub sender_blacklisted: bool,
    pub receiver_blacklisted: bool,
    pub bridge_revert: Option<&'static str>,
    pub gemini_status: u16,
    pub zero_accounts: Vec<&'static str>,
    /// Accounts the mirror node knows an EVM address for.
    pub known_evm: Vec<(&'static str, &'static str)>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            balance: 500_000_000,
            sender_blacklisted: false,
            receiver_blacklisted: false,
            bridge_revert: None,
            gemini_status: 200,
            zero_accounts: Vec::new(),
            known_evm: Vec::new(),
        }
    }
}

pub struct ScriptedTransport {
    ledger: Ledger,
    offline: bool,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(ledger: Ledger) -> Arc<Self> {
        Arc::new(Self {
            ledger,
            offline: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn offline() -> Arc<Self> {
        Arc::new(Self {
            ledger: Ledger::default(),
            offline: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn route(&self, request: &HttpRequest) -> HttpResponse {
        let url = request.url.as_str();
        if url.contains(":generateContent") {
            return self.gemini();
        }
        if url.contains("/balances") {
            return self.balances();
        }
        if let Some(account) = url.split("/api/v1/accounts/").nth(1) {
            return self.account(account);
        }
        self.rpc(request.body.as_deref().unwrap_or_default())
    }

    fn gemini(&self) -> HttpResponse {
        if self.ledger.gemini_status != 200 {
            return respond(self.ledger.gemini_status, json!({ "error": "unavailable" }));
        }
        respond(
            200,
            json!({ "candidates": [{ "content": { "parts": [{ "text": ANALYSIS_TEXT }] } }] }),
        )
    }

    fn balances(&self) -> HttpResponse {
        let balances: Vec<Value> = self
            .ledger
            .zero_accounts
            .iter()
            .map(|account| json!({ "account": account, "balance": 0 }))
            .collect();
        respond(
            200,
            json!({ "timestamp": "1700000000.000000001", "balances": balances }),
        )
    }

    fn account(&self, account: &str) -> HttpResponse {
        let evm = self
            .ledger
            .known_evm
            .iter()
            .find(|(id, _)| *id == account)
            .map(|(_, address)| *address);
        respond(200, json!({ "account": account, "evm_address": evm }))
    }

    fn rpc(&self, body: &[u8]) -> HttpResponse {
        let request: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let method = request["method"].as_str().unwrap_or_default();
        let data = request["params"][0]["data"].as_str().unwrap_or_default();

        let reply = if method == "eth_estimateGas" {
            match self.ledger.bridge_revert {
                Some(reason) => revert(reason),
                None => json!({ "result": "0x7a120" }),
            }
        } else if data.starts_with(&selector_of(&abi::balance_of(Address::ZERO))) {
            json!({ "result": word(self.ledger.balance) })
        } else if data.starts_with(&selector_of(&abi::address_rejected(Address::ZERO))) {
            let subject = data.to_lowercase();
            let blacklisted = (self.ledger.sender_blacklisted && subject.ends_with(&SENDER[2..]))
                || (self.ledger.receiver_blacklisted && subject.ends_with(&RECEIVER[2..]));
            json!({ "result": word(u64::from(blacklisted)) })
        } else {
            match self.ledger.bridge_revert {
                Some(reason) => revert(reason),
                None => json!({ "result": "0x" }),
            }
        };
        let mut reply = reply;
        reply["jsonrpc"] = json!("2.0");
        reply["id"] = request["id"].clone();
        respond(200, reply)
    }
}

#[async_trait]
impl HttpClient for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(OracleError::upstream(&request.url, "connection refused"));
        }
        Ok(self.route(&request))
    }
}

fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string().into_bytes(),
    }
}

fn revert(reason: &str) -> Value {
    json!({ "error": { "code": 3, "message": format!("execution reverted: {reason}") } })
}

fn word(value: u64) -> String {
    format!("0x{value:064x}")
}

fn selector_of(calldata: &[u8]) -> String {
    format!("0x{}", hex::encode(&calldata[..4]))
}

pub fn config() -> WorkflowConfig {
    let mut config = WorkflowConfig::default();
    config.bridge.rpc_url = "http://rpc.test".to_string();
    config.bridge.token_address = TOKEN.to_string();
    config.bridge.reject_policy_address = POLICY.to_string();
    config.bridge.spoke_bridge_address = SPOKE.to_string();
    config.analysis.endpoint = "http://gemini.test".to_string();
    config.analysis.api_key = "test-key".to_string();
    config.compliance.mirror_url = "http://mirror.test".to_string();
    config.compliance.token_id = "0.0.5005".to_string();
    config.compliance.reject_policy_address = POLICY.to_string();
    config
}

pub fn hex_seed(byte: u8) -> String {
    hex::encode([byte; 32])
}

/// Four nodes, one tolerated fault.
pub fn don(transports: &[Arc<ScriptedTransport>]) -> Arc<LocalDon> {
    let transports = transports
        .iter()
        .map(|t| Arc::clone(t) as Arc<dyn HttpClient>)
        .collect();
    Arc::new(LocalDon::from_transports(transports, 1).expect("valid topology"))
}

pub fn healthy_network(ledger: Ledger) -> Vec<Arc<ScriptedTransport>> {
    (0..4).map(|_| ScriptedTransport::new(ledger.clone())).collect()
}

pub fn total_calls(transports: &[Arc<ScriptedTransport>]) -> usize {
    transports.iter().map(|t| t.calls()).sum()
}
