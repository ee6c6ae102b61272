//! Reduction of node observations to one agreed value.
//!
//! Error observations are abstentions. A reduction runs over the usable
//! observations when at least `quorum` of them exist; otherwise, if at
//! least `quorum` nodes failed, the failure itself is the agreed value
//! (e.g. every node saw the same revert). Anything less is a consensus
//! failure.

use crate::{ConsensusError, ConsensusValue};
use std::collections::BTreeMap;

/// Strategy collapsing N observations into one value.
pub trait Reducer: Send + Sync {
    fn reduce(
        &self,
        observations: &[ConsensusValue],
        quorum: usize,
    ) -> Result<ConsensusValue, ConsensusError>;
}

/// Built-in reduction policies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReductionPolicy {
    /// Lower-middle element of the sorted observations. `Fields` values
    /// are reduced field by field.
    Median,
    /// Most frequent value; it must itself reach quorum.
    Majority,
    /// One policy per position of a `Fields` value. Observations with the
    /// wrong arity abstain for every field.
    PerField(Vec<ReductionPolicy>),
}

impl Reducer for ReductionPolicy {
    fn reduce(
        &self,
        observations: &[ConsensusValue],
        quorum: usize,
    ) -> Result<ConsensusValue, ConsensusError> {
        let (failed, usable): (Vec<&ConsensusValue>, Vec<&ConsensusValue>) =
            observations.iter().partition(|v| v.is_error());

        if usable.len() >= quorum {
            return self.apply(&usable, quorum);
        }
        if failed.len() >= quorum {
            return Ok(agreed_error(&failed));
        }
        Err(ConsensusError::InsufficientObservations {
            observed: usable.len(),
            errors: failed.len(),
            required: quorum,
        })
    }
}

impl ReductionPolicy {
    fn apply(
        &self,
        values: &[&ConsensusValue],
        quorum: usize,
    ) -> Result<ConsensusValue, ConsensusError> {
        match self {
            Self::Median => median(values, quorum),
            Self::Majority => majority(values, quorum),
            Self::PerField(policies) => per_field(policies, values, quorum),
        }
    }
}

fn median(values: &[&ConsensusValue], quorum: usize) -> Result<ConsensusValue, ConsensusError> {
    if let Some(arity) = uniform_arity(values) {
        return per_field(&vec![ReductionPolicy::Median; arity], values, quorum);
    }

    let mut sorted: Vec<&ConsensusValue> = values.to_vec();
    sorted.sort();
    match sorted.get((sorted.len().saturating_sub(1)) / 2) {
        Some(value) => Ok((*value).clone()),
        None => Err(ConsensusError::InsufficientObservations {
            observed: 0,
            errors: 0,
            required: quorum,
        }),
    }
}

fn majority(values: &[&ConsensusValue], quorum: usize) -> Result<ConsensusValue, ConsensusError> {
    let mut tally: BTreeMap<&ConsensusValue, usize> = BTreeMap::new();
    for value in values {
        *tally.entry(*value).or_default() += 1;
    }

    // BTreeMap iteration is ordered, so ties resolve to the smallest value.
    let mut best: Option<(&ConsensusValue, usize)> = None;
    for (value, count) in tally {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }

    match best {
        Some((value, count)) if count >= quorum => Ok(value.clone()),
        Some((_, count)) => Err(ConsensusError::NoMajority {
            best: count,
            required: quorum,
        }),
        None => Err(ConsensusError::NoMajority {
            best: 0,
            required: quorum,
        }),
    }
}

fn per_field(
    policies: &[ReductionPolicy],
    values: &[&ConsensusValue],
    quorum: usize,
) -> Result<ConsensusValue, ConsensusError> {
    let arity = policies.len();
    let shaped: Vec<&[ConsensusValue]> = values
        .iter()
        .filter_map(|v| v.as_fields())
        .filter(|fields| fields.len() == arity)
        .collect();

    let mut reduced = Vec::with_capacity(arity);
    for (index, policy) in policies.iter().enumerate() {
        let column: Vec<ConsensusValue> = shaped.iter().map(|f| f[index].clone()).collect();
        let value = policy
            .reduce(&column, quorum)
            .map_err(|source| ConsensusError::Field {
                index,
                source: Box::new(source),
            })?;
        reduced.push(value);
    }
    Ok(ConsensusValue::Fields(reduced))
}

/// Arity shared by every value, when all of them are `Fields`.
fn uniform_arity(values: &[&ConsensusValue]) -> Option<usize> {
    let first = values.first()?.as_fields()?.len();
    values
        .iter()
        .all(|v| v.as_fields().map(<[ConsensusValue]>::len) == Some(first))
        .then_some(first)
}

/// Most common failure reason; ties resolve to the smallest reason.
fn agreed_error(failed: &[&ConsensusValue]) -> ConsensusValue {
    let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
    for value in failed {
        if let Some(reason) = value.error_reason() {
            *tally.entry(reason).or_default() += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (reason, count) in tally {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((reason, count));
        }
    }
    ConsensusValue::error(best.map(|(reason, _)| reason).unwrap_or("error"))
}
