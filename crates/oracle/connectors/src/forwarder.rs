//! Report forwarder delivery

use async_trait::async_trait;
use oracle_codec::text::truncate;
use oracle_consensus::{HttpClient, HttpRequest};
use oracle_report::DeliveryClient;
use oracle_types::{ChainSelector, DeliveryOutcome, GasConfig, SignedReport, TxStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ForwardRequest<'a> {
    receiver: &'a str,
    chain_selector: String,
    gas_limit: String,
    report: &'a SignedReport,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForwardResponse {
    #[serde(default)]
    tx_hash: Option<String>,
    status: TxStatus,
    #[serde(default)]
    error_message: Option<String>,
}

/// Submits reports to the forwarder that writes them on the destination
/// chain.
pub struct ForwarderDeliveryClient {
    http: Arc<dyn HttpClient>,
    url: String,
    chain_selector: ChainSelector,
}

impl ForwarderDeliveryClient {
    pub fn new(http: Arc<dyn HttpClient>, url: impl Into<String>, chain_selector: ChainSelector) -> Self {
        Self {
            http,
            url: url.into(),
            chain_selector,
        }
    }
}

#[async_trait]
impl DeliveryClient for ForwarderDeliveryClient {
    async fn deliver(
        &self,
        report: SignedReport,
        receiver: &str,
        gas: GasConfig,
    ) -> DeliveryOutcome {
        let request = ForwardRequest {
            receiver,
            chain_selector: self.chain_selector.to_string(),
            gas_limit: gas.gas_limit.to_string(),
            report: &report,
        };
        let body = match serde_json::to_vec(&request) {
            Ok(body) => body,
            Err(e) => return DeliveryOutcome::failure(format!("failed to encode report: {e}")),
        };

        let response = match self.http.send(HttpRequest::post_json(&self.url, body)).await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                // Sent but unconfirmed: the forwarder may already hold it.
                tracing::warn!(receiver, error = %e, "Report delivery unconfirmed");
                return DeliveryOutcome {
                    error_message: Some(e.to_string()),
                    ..DeliveryOutcome::pending(None)
                };
            }
            Err(e) => {
                tracing::warn!(receiver, error = %e, "Report delivery failed");
                return DeliveryOutcome::failure(e.to_string());
            }
        };
        if !response.is_success() {
            return DeliveryOutcome::failure(format!(
                "forwarder returned {}: {}",
                response.status,
                truncate(&response.text(), 320)
            ));
        }

        match serde_json::from_slice::<ForwardResponse>(&response.body) {
            Ok(reply) => {
                tracing::info!(
                    receiver,
                    status = ?reply.status,
                    tx_hash = reply.tx_hash.as_deref().unwrap_or("pending"),
                    "Report delivered"
                );
                DeliveryOutcome {
                    tx_hash: reply.tx_hash,
                    status: reply.status,
                    error_message: reply.error_message,
                }
            }
            Err(e) => DeliveryOutcome::failure(format!("invalid forwarder response: {e}")),
        }
    }
}
