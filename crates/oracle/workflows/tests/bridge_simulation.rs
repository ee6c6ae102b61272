mod support;

use oracle_connectors::GeminiClient;
use oracle_types::BridgeRequest;
use oracle_workflows::{BridgeSimulationResponse, BridgeSimulationWorkflow};
use std::sync::Arc;
use support::{Ledger, ScriptedTransport, ANALYSIS_TEXT, RECEIVER, SENDER};

fn request(source: &str, dest: &str, amount: &str) -> BridgeRequest {
    BridgeRequest {
        source_chain: source.to_string(),
        dest_chain: dest.to_string(),
        amount: amount.to_string(),
        sender_address: SENDER.to_string(),
        receiver_address: RECEIVER.to_string(),
    }
}

fn workflow(transports: &[Arc<ScriptedTransport>]) -> BridgeSimulationWorkflow {
    let config = Arc::new(support::config());
    let generator = Arc::new(GeminiClient::from_config(&config.analysis));
    BridgeSimulationWorkflow::new(config, support::don(transports), generator)
}

async fn simulate(
    ledger: Ledger,
    request: BridgeRequest,
) -> (BridgeSimulationResponse, Vec<Arc<ScriptedTransport>>) {
    let transports = support::healthy_network(ledger);
    let response = workflow(&transports).run(request).await;
    (response, transports)
}

#[tokio::test]
async fn sufficient_balance_is_simulated_and_analyzed() {
    let (response, _) = simulate(Ledger::default(), request("sepolia", "hedera", "100")).await;

    let BridgeSimulationResponse::Simulated(report) = response else {
        panic!("expected simulation, got {response:?}");
    };
    assert_eq!(report.direction, "sepolia → hedera");
    assert_eq!(report.preflight.balance, "500");
    assert!(report.preflight.has_sufficient_balance);
    assert!(!report.preflight.sender_blacklisted);
    assert!(report.preflight.degraded_checks.is_empty());
    assert!(report.simulation.success);
    assert_eq!(report.simulation.gas_used, Some(500_000));
    assert_eq!(report.ai_analysis, ANALYSIS_TEXT);
    assert!(!report.analysis_degraded);
}

#[tokio::test]
async fn insufficient_balance_still_simulates_with_analysis() {
    let ledger = Ledger {
        balance: 50_000_000,
        bridge_revert: Some("ERC20: transfer amount exceeds balance"),
        ..Ledger::default()
    };
    let (response, _) = simulate(ledger, request("sepolia", "hedera", "100")).await;

    let BridgeSimulationResponse::Simulated(report) = response else {
        panic!("expected simulation, got {response:?}");
    };
    assert_eq!(report.preflight.balance, "50");
    assert!(!report.preflight.has_sufficient_balance);
    assert!(!report.simulation.success);
    assert_eq!(report.simulation.gas_used, None);
    assert!(report
        .simulation
        .error_message
        .as_deref()
        .is_some_and(|m| m.contains("exceeds balance")));
    assert!(!report.ai_analysis.is_empty());
}

#[tokio::test]
async fn hedera_source_is_unsupported_without_network_calls() {
    let (response, transports) = simulate(Ledger::default(), request("Hedera", "sepolia", "100")).await;

    let json = response.to_json();
    assert_eq!(json["status"], "unsupported");
    assert_eq!(json["recommendation"], "proceed_with_actual_bridge");
    assert!(json["message"]
        .as_str()
        .is_some_and(|m| m.starts_with("Simulation for hedera → EVM bridges is not available yet")));
    assert_eq!(support::total_calls(&transports), 0);
}

#[tokio::test]
async fn unknown_destination_lists_supported_chains() {
    let (response, transports) = simulate(Ledger::default(), request("sepolia", "solana", "1")).await;

    assert_eq!(
        response,
        BridgeSimulationResponse::Error {
            direction: Some("sepolia → solana".to_string()),
            message: "Unknown destination chain: solana. Supported: hedera, sepolia".to_string(),
        }
    );
    assert_eq!(support::total_calls(&transports), 0);
}

#[tokio::test]
async fn malformed_amount_is_rejected_before_any_call() {
    for amount in ["", "-5", "1.0000001", "abc"] {
        let (response, transports) =
            simulate(Ledger::default(), request("sepolia", "hedera", amount)).await;
        assert_eq!(response.status(), "error", "accepted amount {amount:?}");
        assert_eq!(support::total_calls(&transports), 0);
    }
}

#[tokio::test]
async fn blacklisted_sender_is_reported() {
    let ledger = Ledger {
        sender_blacklisted: true,
        bridge_revert: Some("address rejected"),
        ..Ledger::default()
    };
    let (response, _) = simulate(ledger, request("sepolia", "hedera", "1")).await;

    let BridgeSimulationResponse::Simulated(report) = response else {
        panic!("expected simulation, got {response:?}");
    };
    assert!(report.preflight.sender_blacklisted);
    assert!(!report.preflight.receiver_blacklisted);
}

#[tokio::test]
async fn one_offline_node_is_tolerated() {
    let mut transports = support::healthy_network(Ledger::default());
    transports[2] = ScriptedTransport::offline();

    let response = workflow(&transports).run(request("sepolia", "hedera", "100")).await;
    assert_eq!(response.status(), "simulated");
}

#[tokio::test]
async fn two_offline_nodes_fail_preflight_consensus() {
    let mut transports = support::healthy_network(Ledger::default());
    transports[0] = ScriptedTransport::offline();
    transports[3] = ScriptedTransport::offline();

    let response = workflow(&transports).run(request("sepolia", "hedera", "100")).await;
    let BridgeSimulationResponse::ConsensusFailure { step, .. } = response else {
        panic!("expected consensus failure, got {response:?}");
    };
    assert_eq!(step, "preflight");
}

#[tokio::test]
async fn analysis_outage_degrades_to_fallback() {
    let ledger = Ledger {
        gemini_status: 503,
        ..Ledger::default()
    };
    let (response, _) = simulate(ledger, request("sepolia", "hedera", "100")).await;

    let BridgeSimulationResponse::Simulated(report) = response else {
        panic!("expected simulation, got {response:?}");
    };
    assert!(report.analysis_degraded);
    assert!(report.ai_analysis.starts_with("AI analysis unavailable"));
    assert!(report.simulation.success);
}
