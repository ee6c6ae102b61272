//! Report delivery seam

use async_trait::async_trait;
use oracle_types::{DeliveryOutcome, GasConfig, SignedReport};
use std::sync::Mutex;

/// Submits a signed report to a destination contract.
///
/// Takes the report by value: it is consumed by the single submission.
/// Implementations never retry and report transport failures as
/// [`DeliveryOutcome::failure`] rather than an error.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn deliver(
        &self,
        report: SignedReport,
        receiver: &str,
        gas: GasConfig,
    ) -> DeliveryOutcome;
}

/// A delivery captured by [`InMemoryDeliveryClient`].
#[derive(Debug)]
pub struct RecordedDelivery {
    pub report: SignedReport,
    pub receiver: String,
    pub gas: GasConfig,
}

/// Records deliveries and answers with a fixed outcome. Used for dry runs
/// and tests.
pub struct InMemoryDeliveryClient {
    outcome: DeliveryOutcome,
    deliveries: Mutex<Vec<RecordedDelivery>>,
}

impl InMemoryDeliveryClient {
    pub fn new(outcome: DeliveryOutcome) -> Self {
        Self {
            outcome,
            deliveries: Mutex::new(Vec::new()),
        }
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Drain everything delivered so far.
    pub fn take_deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }
}

#[async_trait]
impl DeliveryClient for InMemoryDeliveryClient {
    async fn deliver(
        &self,
        report: SignedReport,
        receiver: &str,
        gas: GasConfig,
    ) -> DeliveryOutcome {
        tracing::info!(receiver, gas_limit = gas.gas_limit, "Recording in-memory delivery");
        match self.deliveries.lock() {
            Ok(mut deliveries) => {
                deliveries.push(RecordedDelivery {
                    report,
                    receiver: receiver.to_string(),
                    gas,
                });
                self.outcome.clone()
            }
            Err(_) => DeliveryOutcome::failure("delivery log poisoned"),
        }
    }
}
