//! Consensus runtimes

use crate::{
    ConsensusError, ConsensusValue, HttpClient, NodeContext, NodeId, NodeTask, Reducer,
};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Runs node tasks across the network and reduces their observations.
#[async_trait]
pub trait ConsensusRuntime: Send + Sync {
    fn node_count(&self) -> usize;

    /// Agreeing observations needed for a reduction to succeed.
    fn quorum(&self) -> usize;

    async fn run_in_node_mode(
        &self,
        step: &str,
        task: &dyn NodeTask,
        reducer: &dyn Reducer,
    ) -> Result<ConsensusValue, ConsensusError>;
}

/// In-process network: every node is a concurrently polled future with its
/// own transport.
pub struct LocalDon {
    nodes: Vec<NodeContext>,
    fault_tolerance: usize,
    task_timeout: Option<Duration>,
}

impl LocalDon {
    /// Requires `n >= 3f + 1`.
    pub fn new(nodes: Vec<NodeContext>, fault_tolerance: usize) -> Result<Self, ConsensusError> {
        if nodes.is_empty() {
            return Err(ConsensusError::InvalidTopology(
                "at least one node is required".to_string(),
            ));
        }
        let minimum = 3 * fault_tolerance + 1;
        if nodes.len() < minimum {
            return Err(ConsensusError::InvalidTopology(format!(
                "{} nodes cannot tolerate {fault_tolerance} faults (need {minimum})",
                nodes.len()
            )));
        }
        Ok(Self {
            nodes,
            fault_tolerance,
            task_timeout: None,
        })
    }

    /// One node per transport, named `node-0..n`.
    pub fn from_transports(
        transports: Vec<Arc<dyn HttpClient>>,
        fault_tolerance: usize,
    ) -> Result<Self, ConsensusError> {
        let nodes = transports
            .into_iter()
            .enumerate()
            .map(|(index, http)| NodeContext::new(NodeId::indexed(index), http))
            .collect();
        Self::new(nodes, fault_tolerance)
    }

    /// Bound each node task; a node that overruns reports an error.
    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = Some(timeout);
        self
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(NodeContext::id)
    }

    async fn run_one(&self, ctx: NodeContext, task: &dyn NodeTask) -> ConsensusValue {
        match self.task_timeout {
            Some(limit) => match tokio::time::timeout(limit, task.run(ctx)).await {
                Ok(value) => value,
                Err(_) => ConsensusValue::error(format!(
                    "node task timed out after {}ms",
                    limit.as_millis()
                )),
            },
            None => task.run(ctx).await,
        }
    }
}

#[async_trait]
impl ConsensusRuntime for LocalDon {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn quorum(&self) -> usize {
        2 * self.fault_tolerance + 1
    }

    async fn run_in_node_mode(
        &self,
        step: &str,
        task: &dyn NodeTask,
        reducer: &dyn Reducer,
    ) -> Result<ConsensusValue, ConsensusError> {
        let executions = self.nodes.iter().map(|ctx| {
            let span = tracing::info_span!("node_task", step, node = %ctx.id());
            self.run_one(ctx.clone(), task).instrument(span)
        });
        let observations = join_all(executions).await;

        for (ctx, observation) in self.nodes.iter().zip(&observations) {
            if let Some(reason) = observation.error_reason() {
                tracing::warn!(step, node = %ctx.id(), reason, "Node reported an error");
            } else {
                tracing::debug!(step, node = %ctx.id(), observation = %observation, "Node observation");
            }
        }

        let quorum = self.quorum();
        match reducer.reduce(&observations, quorum) {
            Ok(value) => {
                tracing::info!(step, quorum, agreed = %value, "Consensus reached");
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(step, quorum, error = %e, "Consensus failed");
                Err(e)
            }
        }
    }
}
