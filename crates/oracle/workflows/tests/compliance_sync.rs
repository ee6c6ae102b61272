mod support;

use oracle_codec::{abi, base64_to_bytes, parse_address};
use oracle_connectors::long_zero_alias;
use oracle_report::{InMemoryDeliveryClient, QuorumReportSigner, ReportSigner};
use oracle_types::{DeliveryOutcome, TxStatus};
use oracle_workflows::{ComplianceSyncOutcome, ComplianceSyncWorkflow};
use std::sync::Arc;
use support::{Ledger, ScriptedTransport, MAPPED, POLICY};

struct Harness {
    workflow: ComplianceSyncWorkflow,
    signer: Arc<QuorumReportSigner>,
    delivery: Arc<InMemoryDeliveryClient>,
}

fn harness(transports: &[Arc<ScriptedTransport>], outcome: DeliveryOutcome) -> Harness {
    let config = Arc::new(support::config());
    let seeds: Vec<String> = (1..=4).map(support::hex_seed).collect();
    let signer = Arc::new(QuorumReportSigner::from_hex_seeds(&seeds, 3).unwrap());
    let delivery = Arc::new(InMemoryDeliveryClient::new(outcome));
    let workflow = ComplianceSyncWorkflow::new(
        config,
        support::don(transports),
        signer.clone(),
        delivery.clone(),
    )
    .unwrap();
    Harness {
        workflow,
        signer,
        delivery,
    }
}

#[tokio::test]
async fn no_frozen_accounts_means_no_update() {
    let transports = support::healthy_network(Ledger::default());
    let harness = harness(&transports, DeliveryOutcome::success("0xfeed"));

    let outcome = harness.workflow.run().await;
    assert_eq!(outcome, ComplianceSyncOutcome::NoUpdateNeeded);
    assert_eq!(outcome.status_line(), "No updates needed");
    assert_eq!(harness.delivery.delivery_count(), 0);
}

#[tokio::test]
async fn frozen_accounts_produce_one_signed_delivery() {
    let ledger = Ledger {
        zero_accounts: vec!["0.0.9001", "0.0.42", "0.0.9001"],
        known_evm: vec![("0.0.42", MAPPED)],
        ..Ledger::default()
    };
    let transports = support::healthy_network(ledger);
    let harness = harness(&transports, DeliveryOutcome::success("0xfeed"));

    let outcome = harness.workflow.run().await;
    assert_eq!(outcome.status_line(), "Compliance sync complete. Tx: 0xfeed");

    let ComplianceSyncOutcome::PolicyUpdateSubmitted { events, delivery } = outcome else {
        panic!("expected a submitted update");
    };
    assert_eq!(delivery.status, TxStatus::Success);
    let accounts: Vec<&str> = events.iter().map(|e| e.account.as_str()).collect();
    assert_eq!(accounts, vec!["0.0.42", "0.0.9001"]);
    assert!(events.iter().all(|e| e.frozen));

    let mapped = parse_address(MAPPED).unwrap();
    let alias = long_zero_alias("0.0.9001").unwrap();
    assert_eq!(events[0].evm_address, Some(mapped));
    assert_eq!(events[1].evm_address, Some(alias));

    let mut deliveries = harness.delivery.take_deliveries();
    assert_eq!(deliveries.len(), 1);
    let recorded = deliveries.remove(0);
    assert_eq!(recorded.receiver, POLICY);
    assert_eq!(recorded.gas.gas_limit, 200_000);

    harness.signer.verify(&recorded.report).unwrap();
    let expected = abi::bytes_array(vec![abi::reject_address(mapped), abi::reject_address(alias)]);
    assert_eq!(base64_to_bytes(&recorded.report.encoded_payload).unwrap(), expected);
}

#[tokio::test]
async fn failed_delivery_is_still_terminal() {
    let ledger = Ledger {
        zero_accounts: vec!["0.0.7"],
        ..Ledger::default()
    };
    let transports = support::healthy_network(ledger);
    let harness = harness(&transports, DeliveryOutcome::failure("nonce too low"));

    let outcome = harness.workflow.run().await;
    assert_eq!(outcome.status_line(), "Failed: nonce too low");
    assert_eq!(harness.delivery.delivery_count(), 1);
}

#[tokio::test]
async fn one_offline_node_is_tolerated() {
    let ledger = Ledger {
        zero_accounts: vec!["0.0.7"],
        ..Ledger::default()
    };
    let mut transports = support::healthy_network(ledger);
    transports[1] = ScriptedTransport::offline();
    let harness = harness(&transports, DeliveryOutcome::pending(None));

    let outcome = harness.workflow.run().await;
    assert_eq!(outcome.status_line(), "Compliance sync pending. Tx: pending");
    assert_eq!(harness.delivery.delivery_count(), 1);
}

#[tokio::test]
async fn unreachable_mirror_aborts_without_delivery() {
    let transports: Vec<_> = (0..4).map(|_| ScriptedTransport::offline()).collect();
    let harness = harness(&transports, DeliveryOutcome::success("0xfeed"));

    let outcome = harness.workflow.run().await;
    assert!(matches!(outcome, ComplianceSyncOutcome::Aborted { .. }), "{outcome:?}");
    assert_eq!(harness.delivery.delivery_count(), 0);
}

#[tokio::test]
async fn split_network_is_a_consensus_failure() {
    let ledger = Ledger {
        zero_accounts: vec!["0.0.7"],
        ..Ledger::default()
    };
    let mut transports = support::healthy_network(ledger);
    transports[0] = ScriptedTransport::offline();
    transports[2] = ScriptedTransport::offline();
    let harness = harness(&transports, DeliveryOutcome::success("0xfeed"));

    let outcome = harness.workflow.run().await;
    let ComplianceSyncOutcome::ConsensusFailed { step, .. } = outcome else {
        panic!("expected consensus failure, got {outcome:?}");
    };
    assert_eq!(step, "compliance_fetch");
    assert_eq!(harness.delivery.delivery_count(), 0);
}
