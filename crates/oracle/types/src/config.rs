//! Workflow configuration

use crate::{ChainSelectorTable, OracleError, OracleResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deployment-wide workflow configuration.
///
/// Loaded once at startup, validated, and then shared read-only behind an
/// `Arc` by every invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Chain identifier → cross-chain selector
    #[serde(default)]
    pub chains: ChainSelectorTable,

    /// Oracle network shape
    #[serde(default)]
    pub don: DonConfig,

    /// HTTP trigger authorization
    #[serde(default)]
    pub auth: TriggerAuthConfig,

    /// Bridge simulation workflow
    #[serde(default)]
    pub bridge: BridgeSimulationConfig,

    /// Text generation service
    #[serde(default)]
    pub analysis: TextGenerationConfig,

    /// Compliance sync workflow
    #[serde(default)]
    pub compliance: ComplianceSyncConfig,

    /// Report delivery
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

/// Oracle network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonConfig {
    /// Number of participating nodes
    #[serde(default = "default_nodes")]
    pub nodes: usize,

    /// Tolerated faulty nodes; derived from `nodes` when absent
    #[serde(default)]
    pub fault_tolerance: Option<usize>,

    /// Per-call timeout applied to each node's HTTP client
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Hex-encoded 32-byte signing seeds, one per node
    #[serde(default)]
    pub signing_seeds: Vec<String>,
}

impl Default for DonConfig {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            fault_tolerance: None,
            request_timeout_secs: default_request_timeout(),
            signing_seeds: Vec::new(),
        }
    }
}

impl DonConfig {
    pub fn fault_tolerance(&self) -> usize {
        self.fault_tolerance
            .unwrap_or_else(|| self.nodes.saturating_sub(1) / 3)
    }

    /// Number of agreeing nodes needed for a reduction to succeed.
    pub fn quorum(&self) -> usize {
        2 * self.fault_tolerance() + 1
    }
}

/// HTTP trigger authorization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerAuthConfig {
    /// Hex-encoded Ed25519 public keys allowed to invoke HTTP workflows
    #[serde(default)]
    pub authorized_keys: Vec<String>,
}

/// Bridge simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSimulationConfig {
    /// JSON-RPC endpoint of the source chain (simulation-capable)
    #[serde(default)]
    pub rpc_url: String,

    /// Bridged token contract
    #[serde(default)]
    pub token_address: String,

    /// Reject-policy contract consulted for blacklists
    #[serde(default)]
    pub reject_policy_address: String,

    /// Spoke bridge contract the dry-run targets
    #[serde(default)]
    pub spoke_bridge_address: String,

    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,

    #[serde(default = "default_token_decimals")]
    pub token_decimals: u8,

    /// Gas supplied to the dry-run call
    #[serde(default = "default_simulation_gas")]
    pub simulation_gas: u64,

    /// Source chains whose bridge path cannot be simulated
    #[serde(default = "default_unsupported_sources")]
    pub unsupported_sources: Vec<String>,

    /// Solidity signature of the bridge entrypoint
    #[serde(default = "default_bridge_function")]
    pub bridge_function: String,
}

impl Default for BridgeSimulationConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            token_address: String::new(),
            reject_policy_address: String::new(),
            spoke_bridge_address: String::new(),
            token_symbol: default_token_symbol(),
            token_decimals: default_token_decimals(),
            simulation_gas: default_simulation_gas(),
            unsupported_sources: default_unsupported_sources(),
            bridge_function: default_bridge_function(),
        }
    }
}

impl BridgeSimulationConfig {
    pub fn is_unsupported_source(&self, chain: &str) -> bool {
        self.unsupported_sources
            .iter()
            .any(|c| c.eq_ignore_ascii_case(chain))
    }
}

/// Text generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextGenerationConfig {
    /// Base URL of the generation API, or a full `:generateContent` URL
    #[serde(default = "default_analysis_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_analysis_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for TextGenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_analysis_endpoint(),
            model: default_analysis_model(),
            api_key: String::new(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// Compliance sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceSyncConfig {
    /// Six-field cron expression
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// Source ledger mirror node base URL
    #[serde(default)]
    pub mirror_url: String,

    /// Tracked token id on the source ledger
    #[serde(default)]
    pub token_id: String,

    /// Chain identifier the policy update is delivered to
    #[serde(default = "default_destination_chain")]
    pub destination_chain: String,

    /// Reject-policy contract on the destination chain
    #[serde(default)]
    pub reject_policy_address: String,

    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,

    /// Maximum accounts fetched per sync
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Static account id → EVM address overrides
    #[serde(default)]
    pub address_book: BTreeMap<String, String>,
}

impl Default for ComplianceSyncConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
            mirror_url: String::new(),
            token_id: String::new(),
            destination_chain: default_destination_chain(),
            reject_policy_address: String::new(),
            gas_limit: default_gas_limit(),
            page_limit: default_page_limit(),
            address_book: BTreeMap::new(),
        }
    }
}

/// Report delivery configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Endpoint of the report forwarder
    #[serde(default)]
    pub forwarder_url: String,
}

impl WorkflowConfig {
    /// Reject configurations that cannot serve a single invocation.
    pub fn validate(&self) -> OracleResult<()> {
        let mut problems = Vec::new();

        if self.chains.is_empty() {
            problems.push("chains: at least one chain selector is required".to_string());
        }

        let f = self.don.fault_tolerance();
        if self.don.nodes == 0 {
            problems.push("don.nodes: must be at least 1".to_string());
        } else if self.don.nodes < 3 * f + 1 {
            problems.push(format!(
                "don.nodes: {} nodes cannot tolerate {} faults (need {})",
                self.don.nodes,
                f,
                3 * f + 1
            ));
        }
        if self.don.signing_seeds.len() != self.don.nodes {
            problems.push(format!(
                "don.signing_seeds: expected {} seeds, found {}",
                self.don.nodes,
                self.don.signing_seeds.len()
            ));
        }
        if self.auth.authorized_keys.is_empty() {
            problems.push("auth.authorized_keys: at least one key is required".to_string());
        }

        let required = [
            ("bridge.rpc_url", &self.bridge.rpc_url),
            ("bridge.token_address", &self.bridge.token_address),
            ("bridge.reject_policy_address", &self.bridge.reject_policy_address),
            ("bridge.spoke_bridge_address", &self.bridge.spoke_bridge_address),
            ("analysis.endpoint", &self.analysis.endpoint),
            ("analysis.api_key", &self.analysis.api_key),
            ("compliance.schedule", &self.compliance.schedule),
            ("compliance.mirror_url", &self.compliance.mirror_url),
            ("compliance.token_id", &self.compliance.token_id),
            ("compliance.reject_policy_address", &self.compliance.reject_policy_address),
            ("delivery.forwarder_url", &self.delivery.forwarder_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                problems.push(format!("{field}: required"));
            }
        }

        if !self.chains.contains(&self.compliance.destination_chain) {
            problems.push(format!(
                "compliance.destination_chain: '{}' is not in the chain table",
                self.compliance.destination_chain
            ));
        }
        if self.bridge.token_decimals > 36 {
            problems.push("bridge.token_decimals: must be at most 36".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(OracleError::Config(problems.join("; ")))
        }
    }
}

// Default value helpers
fn default_nodes() -> usize {
    4
}

fn default_request_timeout() -> u64 {
    30
}

fn default_token_symbol() -> String {
    "wKESY".to_string()
}

fn default_token_decimals() -> u8 {
    6
}

fn default_simulation_gas() -> u64 {
    500_000
}

fn default_unsupported_sources() -> Vec<String> {
    vec!["hedera".to_string()]
}

fn default_bridge_function() -> String {
    "bridgeKESY(uint64,bytes,uint256)".to_string()
}

fn default_analysis_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_analysis_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_output_tokens() -> u32 {
    512
}

fn default_schedule() -> String {
    "0 */5 * * * *".to_string()
}

fn default_destination_chain() -> String {
    "sepolia".to_string()
}

fn default_gas_limit() -> u64 {
    200_000
}

fn default_page_limit() -> u32 {
    10
}
