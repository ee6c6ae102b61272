//! Scheduled compliance sync.
//!
//! Polls the source ledger for frozen accounts, agrees on the list across
//! nodes, maps each account to a destination-chain address and submits a
//! single signed blacklist update to the reject policy contract.

use crate::engine::{ComplianceState, StateMachine};
use alloy_primitives::Address;
use oracle_codec::{abi, parse_address};
use oracle_connectors::{AddressResolver, MirrorNodeClient};
use oracle_consensus::{ConsensusError, ConsensusRuntime, ConsensusValue, NodeContext, ReductionPolicy};
use oracle_report::{DeliveryClient, ReportRequest, ReportSigner};
use oracle_types::{
    ComplianceEvent, DeliveryOutcome, GasConfig, OracleError, OracleResult, WorkflowConfig,
};
use serde::Serialize;
use std::sync::Arc;

pub const FETCH_STEP: &str = "compliance_fetch";
pub const ADDRESS_MAP_STEP: &str = "compliance_address_map";

pub const NO_UPDATES_NEEDED: &str = "No updates needed";

/// Terminal result of one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComplianceSyncOutcome {
    NoUpdateNeeded,
    /// Terminal whatever the delivery status.
    PolicyUpdateSubmitted {
        events: Vec<ComplianceEvent>,
        delivery: DeliveryOutcome,
    },
    ConsensusFailed {
        step: String,
        reason: String,
    },
    Aborted {
        reason: String,
    },
}

impl ComplianceSyncOutcome {
    pub fn status_line(&self) -> String {
        match self {
            Self::NoUpdateNeeded => NO_UPDATES_NEEDED.to_string(),
            Self::PolicyUpdateSubmitted { delivery, .. } => delivery.status_line(),
            Self::ConsensusFailed { step, reason } => {
                format!("Consensus failed at {step}: {reason}")
            }
            Self::Aborted { reason } => format!("Aborted: {reason}"),
        }
    }

    fn state(&self) -> ComplianceState {
        match self {
            Self::NoUpdateNeeded => ComplianceState::NoUpdateNeeded,
            Self::PolicyUpdateSubmitted { .. } => ComplianceState::PolicyUpdateSubmitted,
            Self::ConsensusFailed { .. } => ComplianceState::ConsensusFailed,
            Self::Aborted { .. } => ComplianceState::Aborted,
        }
    }
}

pub struct ComplianceSyncWorkflow {
    config: Arc<WorkflowConfig>,
    runtime: Arc<dyn ConsensusRuntime>,
    mirror: MirrorNodeClient,
    resolver: AddressResolver,
    signer: Arc<dyn ReportSigner>,
    delivery: Arc<dyn DeliveryClient>,
}

impl ComplianceSyncWorkflow {
    pub fn new(
        config: Arc<WorkflowConfig>,
        runtime: Arc<dyn ConsensusRuntime>,
        signer: Arc<dyn ReportSigner>,
        delivery: Arc<dyn DeliveryClient>,
    ) -> OracleResult<Self> {
        let mirror = MirrorNodeClient::new(config.compliance.mirror_url.clone());
        let resolver = AddressResolver::new(&config.compliance.address_book, mirror.clone())?;
        Ok(Self {
            config,
            runtime,
            mirror,
            resolver,
            signer,
            delivery,
        })
    }

    /// Run one sync to a terminal state.
    pub async fn run(&self) -> ComplianceSyncOutcome {
        tracing::info!(
            token_id = %self.config.compliance.token_id,
            destination = %self.config.compliance.destination_chain,
            "Compliance sync triggered"
        );

        let mut machine = StateMachine::<ComplianceState>::new();
        let outcome = match self.drive(&mut machine).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Compliance sync aborted");
                ComplianceSyncOutcome::Aborted {
                    reason: e.to_string(),
                }
            }
        };
        tracing::info!(
            state = ?machine.state(),
            status = %outcome.status_line(),
            "Compliance sync finished"
        );
        outcome
    }

    async fn drive(
        &self,
        machine: &mut StateMachine<ComplianceState>,
    ) -> OracleResult<ComplianceSyncOutcome> {
        let (timestamp, accounts) = match self.fetch_frozen_accounts().await {
            Ok(Ok(fetched)) => fetched,
            Ok(Err(reason)) => return finish(machine, ComplianceSyncOutcome::Aborted { reason }),
            Err(e) => return finish(machine, consensus_failed(FETCH_STEP, e)),
        };
        machine.transition(ComplianceState::EventsFetched)?;
        tracing::info!(count = accounts.len(), timestamp = %timestamp, "Frozen accounts agreed");

        if accounts.is_empty() {
            return finish(machine, ComplianceSyncOutcome::NoUpdateNeeded);
        }

        let addresses = match self.map_addresses(&accounts).await {
            Ok(Ok(addresses)) => addresses,
            Ok(Err(reason)) => return finish(machine, ComplianceSyncOutcome::Aborted { reason }),
            Err(e) => return finish(machine, consensus_failed(ADDRESS_MAP_STEP, e)),
        };
        let events: Vec<ComplianceEvent> = accounts
            .iter()
            .zip(&addresses)
            .map(|(account, address)| {
                ComplianceEvent::frozen(account.as_str(), timestamp.as_str()).with_evm_address(*address)
            })
            .collect();

        let payload = abi::bytes_array(addresses.iter().map(|a| abi::reject_address(*a)).collect());
        let report = match self.signer.sign(ReportRequest::evm(payload)) {
            Ok(report) => report,
            Err(e) => {
                let e = OracleError::from(e);
                return finish(
                    machine,
                    ComplianceSyncOutcome::Aborted {
                        reason: e.to_string(),
                    },
                );
            }
        };
        tracing::info!(
            digest = %report.digest,
            signatures = report.signatures.len(),
            "Blacklist update signed"
        );

        let compliance = &self.config.compliance;
        let delivery = self
            .delivery
            .deliver(
                report,
                &compliance.reject_policy_address,
                GasConfig {
                    gas_limit: compliance.gas_limit,
                },
            )
            .await;
        if let Some(error) = &delivery.error_message {
            let failure = OracleError::DeliveryFailure(error.clone());
            tracing::warn!(kind = failure.kind(), error = %failure, "Blacklist update not delivered");
        }

        finish(
            machine,
            ComplianceSyncOutcome::PolicyUpdateSubmitted { events, delivery },
        )
    }

    /// Agreed `(timestamp, accounts)`, or the agreed failure reason.
    async fn fetch_frozen_accounts(
        &self,
    ) -> Result<Result<(String, Vec<String>), String>, ConsensusError> {
        let mirror = self.mirror.clone();
        let token_id = Arc::new(self.config.compliance.token_id.clone());
        let limit = self.config.compliance.page_limit;
        let task = move |ctx: NodeContext| {
            let mirror = mirror.clone();
            let token_id = Arc::clone(&token_id);
            async move {
                let http = ctx.http();
                match mirror.zero_balance_accounts(http.as_ref(), &token_id, limit).await {
                    Ok(snapshot) => ConsensusValue::Fields(vec![
                        ConsensusValue::Text(snapshot.timestamp),
                        ConsensusValue::Fields(
                            snapshot.accounts.into_iter().map(ConsensusValue::Text).collect(),
                        ),
                    ]),
                    Err(e) => ConsensusValue::error(e.to_string()),
                }
            }
        };

        let policy = ReductionPolicy::PerField(vec![ReductionPolicy::Median, ReductionPolicy::Majority]);
        let agreed = self.runtime.run_in_node_mode(FETCH_STEP, &task, &policy).await?;

        if let Some(reason) = agreed.error_reason() {
            return Ok(Err(format!("mirror node unavailable: {reason}")));
        }
        let timestamp = agreed
            .field(0)
            .and_then(ConsensusValue::as_text)
            .unwrap_or_default()
            .to_string();
        let Some(listed) = agreed.field(1).and_then(ConsensusValue::as_fields) else {
            return Ok(Err(format!("unexpected fetch result: {agreed}")));
        };
        let accounts = listed
            .iter()
            .filter_map(ConsensusValue::as_text)
            .map(str::to_string)
            .collect();
        Ok(Ok((timestamp, accounts)))
    }

    /// Agreed destination address per account, in input order.
    async fn map_addresses(
        &self,
        accounts: &[String],
    ) -> Result<Result<Vec<Address>, String>, ConsensusError> {
        let resolver = self.resolver.clone();
        let shared: Arc<[String]> = accounts.into();
        let task = move |ctx: NodeContext| {
            let resolver = resolver.clone();
            let accounts = Arc::clone(&shared);
            async move {
                let http = ctx.http();
                let mut fields = Vec::with_capacity(accounts.len());
                for account in accounts.iter() {
                    fields.push(match resolver.resolve(http.as_ref(), account).await {
                        Ok(address) => ConsensusValue::Text(address.to_string()),
                        Err(e) => ConsensusValue::error(e.to_string()),
                    });
                }
                ConsensusValue::Fields(fields)
            }
        };

        let policy = ReductionPolicy::PerField(vec![ReductionPolicy::Majority; accounts.len()]);
        let agreed = self
            .runtime
            .run_in_node_mode(ADDRESS_MAP_STEP, &task, &policy)
            .await?;

        let mut addresses = Vec::with_capacity(accounts.len());
        for (index, account) in accounts.iter().enumerate() {
            let mapped = match agreed.field(index) {
                Some(ConsensusValue::Text(raw)) => parse_address(raw).map_err(|e| e.to_string()),
                Some(other) => Err(other.error_reason().unwrap_or("unexpected value").to_string()),
                None => Err(agreed.error_reason().unwrap_or("missing field").to_string()),
            };
            match mapped {
                Ok(address) => addresses.push(address),
                Err(reason) => {
                    return Ok(Err(format!("address mapping failed for {account}: {reason}")))
                }
            }
        }
        Ok(Ok(addresses))
    }
}

fn finish(
    machine: &mut StateMachine<ComplianceState>,
    outcome: ComplianceSyncOutcome,
) -> OracleResult<ComplianceSyncOutcome> {
    machine.transition(outcome.state())?;
    Ok(outcome)
}

fn consensus_failed(step: &str, error: ConsensusError) -> ComplianceSyncOutcome {
    let reason = error.to_string();
    let error = error.at_step(step);
    tracing::warn!(step, kind = error.kind(), error = %error, "Step failed to reach consensus");
    ComplianceSyncOutcome::ConsensusFailed {
        step: step.to_string(),
        reason,
    }
}
