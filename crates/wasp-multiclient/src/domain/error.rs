//! Error types for the multi-client.
//!
//! Three layers, kept apart so callers never need string inspection:
//!
//! - `NodeError`: one node said no (or could not be reached)
//! - `FailureCause`: a `NodeError` or a deadline miss, per node
//! - `MultiClientError`: what a top-level operation returns

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use wasp_types::RequestId;

/// Failure reported by a single node call.
///
/// Produced by `NodeClient` implementations and by callbacks; the
/// multi-client passes it through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// Transport-level failure: connection refused, DNS, TLS, reset.
    #[error("cannot reach {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },

    /// The node answered with a non-success HTTP status.
    #[error("node returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The node answered but the body could not be decoded.
    #[error("failed to decode node response: {0}")]
    Decode(String),

    /// The request was processed but the VM reported an error.
    #[error("request {request_id} failed: {reason}")]
    RequestFailed { request_id: String, reason: String },

    /// The task running the callback panicked or was cancelled.
    #[error("node task aborted: {0}")]
    TaskAborted(String),

    #[error("{0}")]
    Other(String),
}

/// Why one node did not count towards the quorum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The node call returned an error.
    Node(NodeError),
    /// The node call missed the deadline.
    Timeout(Duration),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Node(err) => write!(f, "{}", err),
            FailureCause::Timeout(after) => write!(f, "timed out after {:?}", after),
        }
    }
}

/// One failed node inside a rejected quorum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    /// Position of the node in the multi-client's node list.
    pub index: usize,
    /// Endpoint of the node.
    pub host: String,
    pub cause: FailureCause,
}

impl fmt::Display for NodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{} ({}): {}", self.index, self.host, self.cause)
    }
}

/// Quorum was not reached.
///
/// Carries every failing node so the message identifies who failed and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuorumError {
    /// Quorum the call asked for.
    pub required: usize,
    /// Nodes that succeeded.
    pub succeeded: usize,
    /// Nodes the call was sent to.
    pub total: usize,
    /// Failing nodes in index order.
    pub failures: Vec<NodeFailure>,
}

impl QuorumError {
    /// Failures caused by the deadline.
    pub fn timed_out(&self) -> impl Iterator<Item = &NodeFailure> {
        self.failures
            .iter()
            .filter(|f| matches!(f.cause, FailureCause::Timeout(_)))
    }

    /// Failures reported by the nodes themselves.
    pub fn node_errors(&self) -> impl Iterator<Item = &NodeFailure> {
        self.failures
            .iter()
            .filter(|f| matches!(f.cause, FailureCause::Node(_)))
    }

    /// Whether the quorum could not have been met even with every node
    /// succeeding.
    pub fn is_unsatisfiable(&self) -> bool {
        self.required > self.total
    }

    /// Distinct failure messages, in first-seen order.
    pub fn distinct_causes(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for failure in &self.failures {
            let cause = failure.cause.to_string();
            if !seen.contains(&cause) {
                seen.push(cause);
            }
        }
        seen
    }
}

impl fmt::Display for QuorumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "quorum not met: {}/{} nodes succeeded, {} required",
            self.succeeded, self.total, self.required
        )?;
        for failure in &self.failures {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for QuorumError {}

/// Error returned by `MultiClient` operations.
#[derive(Debug, Clone, Error)]
pub enum MultiClientError {
    #[error(transparent)]
    Quorum(#[from] QuorumError),

    /// Waiting for one of several requests failed.
    #[error("waiting for request {request_id}: {source}")]
    RequestWait {
        request_id: RequestId,
        #[source]
        source: QuorumError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MultiClientError {
    /// The underlying quorum failure, if any.
    pub fn quorum(&self) -> Option<&QuorumError> {
        match self {
            MultiClientError::Quorum(err) => Some(err),
            MultiClientError::RequestWait { source, .. } => Some(source),
            MultiClientError::Config(_) => None,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No node endpoints configured.
    #[error("no hosts configured")]
    NoHosts,
    /// The same endpoint appears twice.
    #[error("duplicate host: {0}")]
    DuplicateHost(String),
    /// An endpoint is blank.
    #[error("empty host at position {0}")]
    EmptyHost(usize),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Quorum larger than the number of hosts.
    #[error("quorum {quorum} exceeds host count {hosts}")]
    QuorumTooLarge { quorum: usize, hosts: usize },
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
