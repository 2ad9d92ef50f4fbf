//! Quorum reduction.
//!
//! ## Rules
//!
//! - Accepted iff `successes >= quorum`.
//! - `quorum == 0` is always accepted, including with no nodes.
//! - `quorum > outcomes.len()` is always rejected.
//! - The decision depends only on the multiset of outcomes, never on the
//!   order in which nodes completed.

use super::error::{NodeFailure, QuorumError};
use super::outcome::{count_successes, NodeOutcome};

/// Placeholder host for outcomes without a matching entry in `hosts`.
pub const UNKNOWN_HOST: &str = "<unknown>";

/// Quorum meaning "every node".
pub fn unanimous(node_count: usize) -> usize {
    node_count
}

/// Smallest quorum strictly greater than two thirds of the nodes.
///
/// Matches the committee threshold used by the nodes themselves, for callers
/// that want "what the chain would accept" rather than unanimity.
pub fn byzantine_majority(node_count: usize) -> usize {
    if node_count == 0 {
        return 0;
    }
    node_count - (node_count - 1) / 3
}

/// Reduce per-node outcomes into a quorum decision.
///
/// `hosts[i]` names the node behind `outcomes[i]`; it is only used to make
/// the error message useful.
pub fn check_quorum<T>(
    outcomes: &[NodeOutcome<T>],
    quorum: usize,
    hosts: &[String],
) -> Result<(), QuorumError> {
    let succeeded = count_successes(outcomes);
    if succeeded >= quorum {
        return Ok(());
    }

    let failures = outcomes
        .iter()
        .enumerate()
        .filter_map(|(index, outcome)| {
            outcome.failure().map(|cause| NodeFailure {
                index,
                host: hosts
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_HOST.to_string()),
                cause,
            })
        })
        .collect();

    Err(QuorumError {
        required: quorum,
        succeeded,
        total: outcomes.len(),
        failures,
    })
}
