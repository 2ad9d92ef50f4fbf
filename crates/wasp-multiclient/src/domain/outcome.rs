//! Per-node outcome of a fan-out call.

use std::time::Duration;

use super::error::{FailureCause, NodeError};

/// What happened on one node during one fan-out call.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutcome<T> {
    /// The callback returned a value.
    Succeeded(T),
    /// The callback returned an error (or its task died).
    Failed(NodeError),
    /// The callback did not finish before the deadline and was aborted.
    TimedOut(Duration),
}

impl<T> NodeOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, NodeOutcome::Succeeded(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, NodeOutcome::TimedOut(_))
    }

    /// Borrow the success value.
    pub fn value(&self) -> Option<&T> {
        match self {
            NodeOutcome::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// Failure cause, `None` on success.
    pub fn failure(&self) -> Option<FailureCause> {
        match self {
            NodeOutcome::Succeeded(_) => None,
            NodeOutcome::Failed(err) => Some(FailureCause::Node(err.clone())),
            NodeOutcome::TimedOut(after) => Some(FailureCause::Timeout(*after)),
        }
    }

    /// Drop the failure detail, keeping only the value.
    pub fn ok(self) -> Option<T> {
        match self {
            NodeOutcome::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<T, FailureCause> {
        match self {
            NodeOutcome::Succeeded(value) => Ok(value),
            NodeOutcome::Failed(err) => Err(FailureCause::Node(err)),
            NodeOutcome::TimedOut(after) => Err(FailureCause::Timeout(after)),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> NodeOutcome<U> {
        match self {
            NodeOutcome::Succeeded(value) => NodeOutcome::Succeeded(f(value)),
            NodeOutcome::Failed(err) => NodeOutcome::Failed(err),
            NodeOutcome::TimedOut(after) => NodeOutcome::TimedOut(after),
        }
    }
}

impl<T> From<Result<T, NodeError>> for NodeOutcome<T> {
    fn from(result: Result<T, NodeError>) -> Self {
        match result {
            Ok(value) => NodeOutcome::Succeeded(value),
            Err(err) => NodeOutcome::Failed(err),
        }
    }
}

/// Count successful outcomes.
pub fn count_successes<T>(outcomes: &[NodeOutcome<T>]) -> usize {
    outcomes.iter().filter(|o| o.is_success()).count()
}
