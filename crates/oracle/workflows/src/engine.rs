//! Workflow state machines

use oracle_types::{OracleError, OracleResult};
use serde::Serialize;
use std::fmt::Debug;

/// A workflow's state space and its legal transitions.
pub trait WorkflowState: Copy + Eq + Debug + Send + Sync {
    const WORKFLOW: &'static str;

    fn initial() -> Self;

    fn allows(self, next: Self) -> bool;

    fn is_terminal(self) -> bool;
}

/// Per-invocation state holder. Rejects transitions its state space does
/// not allow and remembers the path taken.
#[derive(Debug)]
pub struct StateMachine<S: WorkflowState> {
    state: S,
    history: Vec<S>,
}

impl<S: WorkflowState> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: WorkflowState> StateMachine<S> {
    pub fn new() -> Self {
        Self {
            state: S::initial(),
            history: vec![S::initial()],
        }
    }

    pub fn state(&self) -> S {
        self.state
    }

    pub fn history(&self) -> &[S] {
        &self.history
    }

    pub fn transition(&mut self, next: S) -> OracleResult<()> {
        if !self.state.allows(next) {
            return Err(OracleError::Engine(format!(
                "{} state transition not allowed: {:?} -> {:?}",
                S::WORKFLOW,
                self.state,
                next
            )));
        }

        tracing::debug!(workflow = S::WORKFLOW, from = ?self.state, to = ?next, "State transition");
        self.state = next;
        self.history.push(next);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeState {
    Start,
    DirectionValidated,
    PreflightChecked,
    Simulated,
    Analyzed,
    Responded,
    UnsupportedDirection,
    UnknownChain,
    Rejected,
    ConsensusFailed,
}

impl WorkflowState for BridgeState {
    const WORKFLOW: &'static str = "bridge_simulation";

    fn initial() -> Self {
        Self::Start
    }

    fn allows(self, next: Self) -> bool {
        use BridgeState::*;
        matches!(
            (self, next),
            (Start, DirectionValidated)
                | (Start, UnsupportedDirection)
                | (Start, UnknownChain)
                | (Start, Rejected)
                | (DirectionValidated, PreflightChecked)
                | (DirectionValidated, ConsensusFailed)
                | (PreflightChecked, Simulated)
                | (PreflightChecked, ConsensusFailed)
                | (Simulated, Analyzed)
                | (Analyzed, Responded)
        )
    }

    fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Responded
                | Self::UnsupportedDirection
                | Self::UnknownChain
                | Self::Rejected
                | Self::ConsensusFailed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceState {
    Start,
    EventsFetched,
    NoUpdateNeeded,
    PolicyUpdateSubmitted,
    ConsensusFailed,
    /// Fetch agreed on a failure, or the report could not be built.
    Aborted,
}

impl WorkflowState for ComplianceState {
    const WORKFLOW: &'static str = "compliance_sync";

    fn initial() -> Self {
        Self::Start
    }

    fn allows(self, next: Self) -> bool {
        use ComplianceState::*;
        matches!(
            (self, next),
            (Start, EventsFetched)
                | (Start, ConsensusFailed)
                | (Start, Aborted)
                | (EventsFetched, NoUpdateNeeded)
                | (EventsFetched, PolicyUpdateSubmitted)
                | (EventsFetched, ConsensusFailed)
                | (EventsFetched, Aborted)
        )
    }

    fn is_terminal(self) -> bool {
        !matches!(self, Self::Start | Self::EventsFetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_happy_path_is_allowed() {
        let mut machine = StateMachine::<BridgeState>::new();
        for next in [
            BridgeState::DirectionValidated,
            BridgeState::PreflightChecked,
            BridgeState::Simulated,
            BridgeState::Analyzed,
            BridgeState::Responded,
        ] {
            machine.transition(next).unwrap();
        }
        assert!(machine.state().is_terminal());
        assert_eq!(machine.history().len(), 6);
    }

    #[test]
    fn skipping_steps_is_an_engine_error() {
        let mut machine = StateMachine::<BridgeState>::new();
        let err = machine.transition(BridgeState::Simulated).unwrap_err();
        assert_eq!(err.kind(), "engine_error");
        assert_eq!(machine.state(), BridgeState::Start);
    }

    #[test]
    fn terminal_states_do_not_advance() {
        let mut machine = StateMachine::<BridgeState>::new();
        machine.transition(BridgeState::UnsupportedDirection).unwrap();
        assert!(machine.transition(BridgeState::DirectionValidated).is_err());

        let mut machine = StateMachine::<ComplianceState>::new();
        machine.transition(ComplianceState::EventsFetched).unwrap();
        machine.transition(ComplianceState::NoUpdateNeeded).unwrap();
        assert!(machine.transition(ComplianceState::PolicyUpdateSubmitted).is_err());
    }

    #[test]
    fn analysis_cannot_fail_the_bridge_workflow() {
        assert!(!BridgeState::Simulated.allows(BridgeState::ConsensusFailed));
    }
}
