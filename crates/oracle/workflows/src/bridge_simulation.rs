//! HTTP-triggered bridge simulation.
//!
//! Validates the requested direction, reads the sender's balance and the
//! blacklist status of both parties, dry-runs the bridge call, and asks a
//! text generator for a plain-language risk summary. Every network read
//! runs on all nodes and is reduced before the workflow branches on it.
//! The workflow is read-only: it never signs or delivers anything.

use crate::engine::{BridgeState, StateMachine};
use alloy_primitives::{Address, U256};
use oracle_codec::text::{prefix, truncate};
use oracle_codec::{abi, decode_hex_quantity, decode_word_bool, format_units, parse_address, parse_decimal_amount};
use oracle_codec::{CodecError, RpcCall, RpcReply, ERROR_SENTINEL};
use oracle_connectors::{extract_candidate_text, EvmRpc, TextGenerator};
use oracle_consensus::{ConsensusError, ConsensusRuntime, ConsensusValue, NodeContext, ReductionPolicy};
use oracle_types::{
    AnalysisSummary, BridgeRequest, ChainSelector, OracleError, OracleResult, PreflightResult,
    SimulationOutcome, WorkflowConfig,
};
use serde::Serialize;
use std::sync::Arc;

pub const PREFLIGHT_STEP: &str = "preflight";
pub const SIMULATION_STEP: &str = "simulation";
pub const ANALYSIS_STEP: &str = "analysis";

const PROCEED_WITH_ACTUAL_BRIDGE: &str = "proceed_with_actual_bridge";
const EXCERPT_CHARS: usize = 500;

// ── Response payloads ───────────────────────────────────────────────

/// Structured payload returned to the HTTP caller. Every terminal state
/// produces one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BridgeSimulationResponse {
    Simulated(SimulatedReport),
    Unsupported {
        direction: String,
        message: String,
        recommendation: String,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        direction: Option<String>,
        message: String,
    },
    ConsensusFailure {
        direction: String,
        step: String,
        message: String,
    },
}

impl BridgeSimulationResponse {
    pub fn rejected(direction: Option<String>, message: impl Into<String>) -> Self {
        Self::Error {
            direction,
            message: message.into(),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Simulated(_) => "simulated",
            Self::Unsupported { .. } => "unsupported",
            Self::Error { .. } => "error",
            Self::ConsensusFailure { .. } => "consensus_failure",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "status": "error", "message": e.to_string() })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedReport {
    pub direction: String,
    pub amount: String,
    pub sender: String,
    pub receiver: String,
    pub preflight: PreflightView,
    pub simulation: SimulationOutcome,
    pub ai_analysis: String,
    pub analysis_degraded: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightView {
    /// Balance in token units, e.g. `"500"`.
    pub balance: String,
    pub has_sufficient_balance: bool,
    pub sender_blacklisted: bool,
    pub receiver_blacklisted: bool,
    pub degraded_checks: Vec<String>,
}

impl PreflightView {
    fn new(result: &PreflightResult, decimals: u8) -> Self {
        Self {
            balance: format_units(result.balance, decimals),
            has_sufficient_balance: result.has_sufficient_balance,
            sender_blacklisted: result.sender_blacklisted,
            receiver_blacklisted: result.receiver_blacklisted,
            degraded_checks: result.degraded_checks.clone(),
        }
    }
}

/// Parse an HTTP trigger body.
pub fn decode_request(body: &[u8]) -> OracleResult<BridgeRequest> {
    serde_json::from_slice(body)
        .map_err(|e| OracleError::Validation(format!("invalid bridge request: {e}")))
}

// ── Workflow ────────────────────────────────────────────────────────

struct ValidatedRequest {
    request: BridgeRequest,
    destination: ChainSelector,
    amount: U256,
    sender: Address,
    receiver: Address,
}

struct Rejection {
    state: BridgeState,
    response: BridgeSimulationResponse,
}

pub struct BridgeSimulationWorkflow {
    config: Arc<WorkflowConfig>,
    runtime: Arc<dyn ConsensusRuntime>,
    generator: Arc<dyn TextGenerator>,
    rpc: EvmRpc,
}

impl BridgeSimulationWorkflow {
    pub fn new(
        config: Arc<WorkflowConfig>,
        runtime: Arc<dyn ConsensusRuntime>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let rpc = EvmRpc::new(config.bridge.rpc_url.clone());
        Self {
            config,
            runtime,
            generator,
            rpc,
        }
    }

    /// Run one invocation to a terminal state.
    pub async fn run(&self, request: BridgeRequest) -> BridgeSimulationResponse {
        let request = request.normalized();
        tracing::info!(
            direction = %request.direction(),
            amount = %request.amount,
            sender = %request.sender_address,
            receiver = %request.receiver_address,
            "Bridge simulation triggered"
        );

        let mut machine = StateMachine::<BridgeState>::new();
        let direction = request.direction();
        match self.drive(&mut machine, request).await {
            Ok(response) => {
                tracing::info!(
                    status = response.status(),
                    state = ?machine.state(),
                    "Bridge simulation finished"
                );
                response
            }
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Bridge simulation aborted");
                BridgeSimulationResponse::rejected(Some(direction), e.to_string())
            }
        }
    }

    async fn drive(
        &self,
        machine: &mut StateMachine<BridgeState>,
        request: BridgeRequest,
    ) -> OracleResult<BridgeSimulationResponse> {
        let validated = match self.validate(request) {
            Ok(validated) => validated,
            Err(rejection) => {
                machine.transition(rejection.state)?;
                return Ok(rejection.response);
            }
        };
        machine.transition(BridgeState::DirectionValidated)?;

        let preflight = match self.preflight(&validated).await {
            Ok(preflight) => preflight,
            Err(e) => {
                machine.transition(BridgeState::ConsensusFailed)?;
                return Ok(consensus_failure(&validated, PREFLIGHT_STEP, e));
            }
        };
        machine.transition(BridgeState::PreflightChecked)?;

        // Runs even when the preflight already predicts failure: the revert
        // reason is what the summary explains.
        let simulation = match self.simulate(&validated).await {
            Ok(simulation) => simulation,
            Err(e) => {
                machine.transition(BridgeState::ConsensusFailed)?;
                return Ok(consensus_failure(&validated, SIMULATION_STEP, e));
            }
        };
        machine.transition(BridgeState::Simulated)?;

        let analysis = self.analyze(&validated, &preflight, &simulation).await;
        machine.transition(BridgeState::Analyzed)?;

        let request = &validated.request;
        let response = BridgeSimulationResponse::Simulated(SimulatedReport {
            direction: request.direction(),
            amount: request.amount.clone(),
            sender: request.sender_address.clone(),
            receiver: request.receiver_address.clone(),
            preflight: PreflightView::new(&preflight, self.config.bridge.token_decimals),
            simulation,
            analysis_degraded: analysis.is_degraded(),
            ai_analysis: analysis.text().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        });
        machine.transition(BridgeState::Responded)?;
        Ok(response)
    }

    /// Direction, chain and payload checks. No network access.
    fn validate(&self, request: BridgeRequest) -> Result<ValidatedRequest, Rejection> {
        let source = request.source_chain.as_str();
        let dest = request.dest_chain.as_str();
        let direction = request.direction();
        let bridge = &self.config.bridge;

        if bridge.is_unsupported_source(source) {
            tracing::warn!(direction = %direction, "Simulation unavailable for source chain");
            return Err(Rejection {
                state: BridgeState::UnsupportedDirection,
                response: BridgeSimulationResponse::Unsupported {
                    message: format!(
                        "Simulation for {source} → EVM bridges is not available yet: no \
                         simulation backend exists for {source}. The bridge would lock tokens \
                         on {source} and mint {} on {dest} through cross-chain messaging. \
                         Please proceed with the actual bridge; transfers remain subject to \
                         the compliance policies on the destination chain.",
                        bridge.token_symbol
                    ),
                    direction,
                    recommendation: PROCEED_WITH_ACTUAL_BRIDGE.to_string(),
                },
            });
        }

        let supported = self.config.chains.supported().join(", ");
        let reject = |state: BridgeState, message: String| Rejection {
            state,
            response: BridgeSimulationResponse::rejected(Some(request.direction()), message),
        };

        let Some(destination) = self.config.chains.resolve(dest) else {
            return Err(reject(
                BridgeState::UnknownChain,
                format!("Unknown destination chain: {dest}. Supported: {supported}"),
            ));
        };
        if !self.config.chains.contains(source) {
            return Err(reject(
                BridgeState::UnknownChain,
                format!("Unknown source chain: {source}. Supported: {supported}"),
            ));
        }
        if source == dest {
            return Err(reject(
                BridgeState::Rejected,
                format!("Source and destination chain are both {source}"),
            ));
        }

        let amount = parse_decimal_amount(&request.amount, bridge.token_decimals)
            .map_err(|e| reject(BridgeState::Rejected, e.to_string()))?;
        let sender = parse_address(&request.sender_address)
            .map_err(|e| reject(BridgeState::Rejected, format!("sender: {e}")))?;
        let receiver = parse_address(&request.receiver_address)
            .map_err(|e| reject(BridgeState::Rejected, format!("receiver: {e}")))?;

        Ok(ValidatedRequest {
            request,
            destination,
            amount,
            sender,
            receiver,
        })
    }

    async fn preflight(&self, validated: &ValidatedRequest) -> Result<PreflightResult, ConsensusError> {
        let bridge = &self.config.bridge;
        let [balance_call, sender_call, receiver_call] = [
            RpcCall::eth_call(bridge.token_address.clone(), &abi::balance_of(validated.sender)),
            RpcCall::eth_call(
                bridge.reject_policy_address.clone(),
                &abi::address_rejected(validated.sender),
            )
            .with_id(2),
            RpcCall::eth_call(
                bridge.reject_policy_address.clone(),
                &abi::address_rejected(validated.receiver),
            )
            .with_id(3),
        ];

        let rpc = self.rpc.clone();
        let task = move |ctx: NodeContext| {
            let rpc = rpc.clone();
            let balance_call = balance_call.clone();
            let sender_call = sender_call.clone();
            let receiver_call = receiver_call.clone();
            async move {
                let http = ctx.http();
                ConsensusValue::Fields(vec![
                    quantity_observation(rpc.call(http.as_ref(), &balance_call).await),
                    flag_observation(rpc.call(http.as_ref(), &sender_call).await),
                    flag_observation(rpc.call(http.as_ref(), &receiver_call).await),
                ])
            }
        };

        let policy = ReductionPolicy::PerField(vec![ReductionPolicy::Median; 3]);
        let agreed = self
            .runtime
            .run_in_node_mode(PREFLIGHT_STEP, &task, &policy)
            .await?;
        tracing::info!(step = PREFLIGHT_STEP, record = %agreed, "Preflight results");

        let result = interpret_preflight(&agreed, validated.amount);
        tracing::info!(
            balance = %format_units(result.balance, bridge.token_decimals),
            required = %validated.request.amount,
            sufficient = result.has_sufficient_balance,
            sender_blacklisted = result.sender_blacklisted,
            receiver_blacklisted = result.receiver_blacklisted,
            degraded = ?result.degraded_checks,
            "Preflight checked"
        );
        Ok(result)
    }

    async fn simulate(&self, validated: &ValidatedRequest) -> Result<SimulationOutcome, ConsensusError> {
        let bridge = &self.config.bridge;
        let calldata = abi::bridge_call(
            &bridge.bridge_function,
            validated.destination.0,
            validated.receiver,
            validated.amount,
        );
        let sender = validated.sender.to_string();
        let dry_run = RpcCall::eth_call(bridge.spoke_bridge_address.clone(), &calldata)
            .from(sender.clone())
            .gas(bridge.simulation_gas)
            .with_id(4);
        let estimate = RpcCall::estimate_gas(bridge.spoke_bridge_address.clone(), &calldata)
            .from(sender)
            .with_id(5);

        let rpc = self.rpc.clone();
        let task = move |ctx: NodeContext| {
            let rpc = rpc.clone();
            let dry_run = dry_run.clone();
            let estimate = estimate.clone();
            async move {
                let http = ctx.http();
                let (status, data, error) = match rpc.call(http.as_ref(), &dry_run).await {
                    Ok(RpcReply::Result(data)) => ("success", data, String::new()),
                    Ok(RpcReply::Error(message)) => ("reverted", String::new(), message),
                    Ok(RpcReply::Empty) => return ConsensusValue::error("empty eth_call response"),
                    Err(e) => return ConsensusValue::error(e.to_string()),
                };
                let gas = quantity_observation(rpc.call(http.as_ref(), &estimate).await);
                ConsensusValue::Fields(vec![
                    ConsensusValue::text(status),
                    ConsensusValue::text(data),
                    ConsensusValue::text(error),
                    gas,
                ])
            }
        };

        let policy = ReductionPolicy::PerField(vec![
            ReductionPolicy::Majority,
            ReductionPolicy::Majority,
            ReductionPolicy::Majority,
            ReductionPolicy::Median,
        ]);
        let agreed = self
            .runtime
            .run_in_node_mode(SIMULATION_STEP, &task, &policy)
            .await?;

        let outcome = interpret_simulation(&agreed);
        tracing::info!(
            success = outcome.success,
            gas_used = ?outcome.gas_used,
            error = outcome.error_message.as_deref().unwrap_or(""),
            "Bridge call simulated"
        );
        Ok(outcome)
    }

    /// Never fails: every problem degrades to a fallback summary.
    async fn analyze(
        &self,
        validated: &ValidatedRequest,
        preflight: &PreflightResult,
        simulation: &SimulationOutcome,
    ) -> AnalysisSummary {
        let prompt = Arc::new(self.analysis_prompt(validated, preflight, simulation));
        let generator = Arc::clone(&self.generator);
        let task = move |ctx: NodeContext| {
            let generator = Arc::clone(&generator);
            let prompt = Arc::clone(&prompt);
            async move {
                let http = ctx.http();
                match generator.generate(http.as_ref(), &prompt).await {
                    Ok(raw) => ConsensusValue::Text(raw),
                    Err(e) => ConsensusValue::error(e.to_string()),
                }
            }
        };

        let summary = match self
            .runtime
            .run_in_node_mode(ANALYSIS_STEP, &task, &ReductionPolicy::Median)
            .await
        {
            Ok(ConsensusValue::Text(raw)) => summarize(&raw),
            Ok(other) => AnalysisSummary::Fallback(format!(
                "AI analysis unavailable: {}",
                other.error_reason().unwrap_or("unexpected response shape")
            )),
            Err(e) => AnalysisSummary::Fallback(format!("AI analysis unavailable: {e}")),
        };

        if summary.is_degraded() {
            let degraded = OracleError::AnalysisDegraded(truncate(summary.text(), 120));
            tracing::warn!(kind = degraded.kind(), error = %degraded, "Using fallback analysis");
        }
        summary
    }

    fn analysis_prompt(
        &self,
        validated: &ValidatedRequest,
        preflight: &PreflightResult,
        simulation: &SimulationOutcome,
    ) -> String {
        let bridge = &self.config.bridge;
        let request = &validated.request;
        let symbol = &bridge.token_symbol;
        let decimals = bridge.token_decimals;
        let simulation_output = if simulation.success {
            format!("success, return data {}", simulation.raw_return_data)
        } else {
            format!(
                "reverted: {}",
                simulation.error_message.as_deref().unwrap_or(ERROR_SENTINEL)
            )
        };
        let gas = simulation
            .gas_used
            .map(|g| g.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        format!(
            "You are an assistant for a cross-chain token bridge. Analyze this bridge \
             simulation and give the user a clear, friendly summary.\n\
             \n\
             ## Bridge Request\n\
             - Direction: {direction}\n\
             - Amount: {amount} {symbol} ({decimals} decimals)\n\
             - Sender: {sender}\n\
             - Receiver: {receiver}\n\
             \n\
             ## Pre-flight Checks\n\
             - Sender balance: {balance} {symbol}\n\
             - Has sufficient balance: {sufficient}\n\
             - Sender blacklisted: {sender_blacklisted}\n\
             - Receiver blacklisted: {receiver_blacklisted}\n\
             - Checks that could not be completed: {degraded}\n\
             \n\
             ## Bridge Simulation\n\
             - Estimated gas: {gas}\n\
             - Output: {output}\n\
             \n\
             ## Instructions\n\
             1. Say whether the bridge would succeed or fail.\n\
             2. If it would fail, explain exactly why (balance, blacklist, policy limits).\n\
             3. Estimate the approximate costs.\n\
             4. Give a confidence level (high/medium/low) for the simulation.\n\
             5. Flag any compliance concerns clearly.\n\
             6. Keep it under 200 words.",
            direction = request.direction(),
            amount = request.amount,
            sender = request.sender_address,
            receiver = request.receiver_address,
            balance = format_units(preflight.balance, decimals),
            sufficient = preflight.has_sufficient_balance,
            sender_blacklisted = preflight.sender_blacklisted,
            receiver_blacklisted = preflight.receiver_blacklisted,
            degraded = if preflight.degraded_checks.is_empty() {
                "none".to_string()
            } else {
                preflight.degraded_checks.join(", ")
            },
            output = prefix(&simulation_output, EXCERPT_CHARS),
        )
    }
}

// ── Interpretation of agreed values ─────────────────────────────────

fn quantity_observation(reply: OracleResult<RpcReply>) -> ConsensusValue {
    rpc_observation(reply, decode_hex_quantity)
}

/// ABI `bool` word normalized to 0 or 1.
fn flag_observation(reply: OracleResult<RpcReply>) -> ConsensusValue {
    rpc_observation(reply, |raw| decode_word_bool(raw).map(|flag| U256::from(u8::from(flag))))
}

fn rpc_observation(
    reply: OracleResult<RpcReply>,
    decode: impl FnOnce(&str) -> Result<U256, CodecError>,
) -> ConsensusValue {
    match reply {
        Ok(RpcReply::Result(raw)) => match decode(&raw) {
            Ok(value) => ConsensusValue::Number(value),
            Err(e) => ConsensusValue::error(e.to_string()),
        },
        Ok(RpcReply::Error(message)) => ConsensusValue::Error(message),
        Ok(RpcReply::Empty) => ConsensusValue::error(ERROR_SENTINEL),
        Err(e) => ConsensusValue::error(e.to_string()),
    }
}

/// An agreed error in any field reads as balance 0 / not blacklisted and
/// is reported as degraded.
fn interpret_preflight(agreed: &ConsensusValue, required: U256) -> PreflightResult {
    let mut degraded_checks = Vec::new();
    let mut number = |index: usize, check: &str| match agreed.field(index) {
        Some(ConsensusValue::Number(value)) => Some(*value),
        _ => {
            degraded_checks.push(check.to_string());
            None
        }
    };

    let balance = number(0, "balance").unwrap_or(U256::ZERO);
    let sender_blacklisted = number(1, "senderBlacklist").is_some_and(|flag| !flag.is_zero());
    let receiver_blacklisted = number(2, "receiverBlacklist").is_some_and(|flag| !flag.is_zero());

    PreflightResult {
        balance,
        sender_blacklisted,
        receiver_blacklisted,
        has_sufficient_balance: balance >= required,
        degraded_checks,
    }
}

fn interpret_simulation(agreed: &ConsensusValue) -> SimulationOutcome {
    if let Some(reason) = agreed.error_reason() {
        return SimulationOutcome {
            success: false,
            gas_used: None,
            error_message: Some(format!("simulation unavailable: {reason}")),
            raw_return_data: String::new(),
        };
    }

    let text = |index: usize| {
        agreed
            .field(index)
            .and_then(ConsensusValue::as_text)
            .unwrap_or_default()
            .to_string()
    };
    let error = text(2);
    SimulationOutcome {
        success: text(0) == "success",
        gas_used: agreed
            .field(3)
            .and_then(ConsensusValue::as_number)
            .and_then(|gas| u64::try_from(gas).ok()),
        error_message: (!error.is_empty()).then_some(error),
        raw_return_data: text(1),
    }
}

fn summarize(raw: &str) -> AnalysisSummary {
    match extract_candidate_text(raw) {
        Ok(text) => AnalysisSummary::Generated(text),
        Err(_) => AnalysisSummary::Fallback(format!(
            "Raw AI response: {}",
            prefix(raw, EXCERPT_CHARS)
        )),
    }
}

fn consensus_failure(
    validated: &ValidatedRequest,
    step: &str,
    error: ConsensusError,
) -> BridgeSimulationResponse {
    let error = error.at_step(step);
    tracing::warn!(step, kind = error.kind(), error = %error, "Step failed to reach consensus");
    BridgeSimulationResponse::ConsensusFailure {
        direction: validated.request.direction(),
        step: step.to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: Vec<ConsensusValue>) -> ConsensusValue {
        ConsensusValue::Fields(values)
    }

    #[test]
    fn preflight_sufficiency_uses_base_units() {
        let agreed = fields(vec![
            ConsensusValue::number(U256::from(500_000_000u64)),
            ConsensusValue::number(U256::from(0u64)),
            ConsensusValue::number(U256::from(1u64)),
        ]);
        let result = interpret_preflight(&agreed, U256::from(100_000_000u64));
        assert!(result.has_sufficient_balance);
        assert!(!result.sender_blacklisted);
        assert!(result.receiver_blacklisted);
        assert!(result.degraded_checks.is_empty());
    }

    #[test]
    fn agreed_errors_become_degraded_checks() {
        let agreed = fields(vec![
            ConsensusValue::error("execution reverted"),
            ConsensusValue::number(U256::from(0u64)),
            ConsensusValue::error("error"),
        ]);
        let result = interpret_preflight(&agreed, U256::from(1u64));
        assert_eq!(result.balance, U256::ZERO);
        assert!(!result.has_sufficient_balance);
        assert!(!result.receiver_blacklisted);
        assert_eq!(result.degraded_checks, vec!["balance", "receiverBlacklist"]);
    }

    #[test]
    fn blacklist_words_are_normalized_to_flags() {
        let word = |digits: &str| Ok(RpcReply::Result(format!("0x{digits:0>64}")));
        assert_eq!(flag_observation(word("1")), ConsensusValue::number(U256::from(1u64)));
        assert_eq!(flag_observation(word("ff00")), ConsensusValue::number(U256::from(1u64)));
        assert_eq!(flag_observation(word("0")), ConsensusValue::number(U256::from(0u64)));
        assert!(matches!(
            flag_observation(Ok(RpcReply::Result("reverted".into()))),
            ConsensusValue::Error(_)
        ));
        assert_eq!(
            flag_observation(Ok(RpcReply::Error("execution reverted".into()))),
            ConsensusValue::Error("execution reverted".into())
        );
    }

    #[test]
    fn sufficiency_is_monotonic_in_balance() {
        let required = U256::from(100_000_000u64);
        let mut previous = false;
        for balance in [0u64, 50_000_000, 99_999_999, 100_000_000, 100_000_001, 500_000_000] {
            let agreed = fields(vec![
                ConsensusValue::number(U256::from(balance)),
                ConsensusValue::number(U256::from(0u64)),
                ConsensusValue::number(U256::from(0u64)),
            ]);
            let sufficient = interpret_preflight(&agreed, required).has_sufficient_balance;
            assert!(sufficient || !previous, "sufficiency regressed at {balance}");
            previous = sufficient;
        }
        assert!(previous);
    }

    #[test]
    fn reverted_simulation_keeps_reason() {
        let agreed = fields(vec![
            ConsensusValue::text("reverted"),
            ConsensusValue::text(""),
            ConsensusValue::text("execution reverted: insufficient balance"),
            ConsensusValue::error("execution reverted"),
        ]);
        let outcome = interpret_simulation(&agreed);
        assert!(!outcome.success);
        assert_eq!(outcome.gas_used, None);
        assert_eq!(
            outcome.error_message.as_deref(),
            Some("execution reverted: insufficient balance")
        );
    }

    #[test]
    fn unparseable_generation_falls_back_to_raw_excerpt() {
        let raw = "x".repeat(800);
        let summary = summarize(&raw);
        assert!(summary.is_degraded());
        assert_eq!(summary.text().len(), "Raw AI response: ".len() + 500);
    }

    #[test]
    fn response_serializes_with_status_tag() {
        let json = BridgeSimulationResponse::Unsupported {
            direction: "hedera → sepolia".into(),
            message: "n/a".into(),
            recommendation: PROCEED_WITH_ACTUAL_BRIDGE.into(),
        }
        .to_json();
        assert_eq!(json["status"], "unsupported");
        assert_eq!(json["recommendation"], "proceed_with_actual_bridge");

        let json = BridgeSimulationResponse::rejected(None, "bad").to_json();
        assert_eq!(json["status"], "error");
        assert!(json.get("direction").is_none());
    }

    #[test]
    fn decode_request_rejects_garbage() {
        assert_eq!(decode_request(b"{").unwrap_err().kind(), "validation_error");
    }
}
