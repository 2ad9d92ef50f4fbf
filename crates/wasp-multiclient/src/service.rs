//! # Multi-Client Service
//!
//! Composition root: owns the ordered node list and the default deadline,
//! and layers the quorum reducer on top of the fan-out executor.
//!
//! ## Entry Points
//!
//! | method | quorum | returns |
//! |--------|--------|---------|
//! | `execute` | none | raw `Vec<NodeOutcome<T>>` |
//! | `run` | all nodes | `()` |
//! | `run_with_quorum` | caller | `()` |
//! | `gather` | all nodes | `Vec<T>`, index-aligned |
//! | `gather_with_quorum` | caller | `Vec<Option<T>>`, index-aligned |
//!
//! The `*_with` variants take an explicit deadline; the others use the
//! client's default. The default is fixed at construction (`with_timeout`
//! consumes the client), so a shared `MultiClient` has no mutable state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{
    check_quorum, count_successes, ConfigError, MultiClientConfig, MultiClientError, NodeError,
    NodeOutcome, DEFAULT_TIMEOUT,
};
use crate::executor::fan_out;
use crate::ports::outbound::NodeClient;

/// Fan-out client over a fixed, ordered set of nodes.
///
/// `nodes[i]` was resolved from `hosts[i]`; both keep their order for the
/// lifetime of the client.
pub struct MultiClient<C: NodeClient> {
    hosts: Vec<String>,
    nodes: Vec<Arc<C>>,
    timeout: Duration,
}

impl<C: NodeClient> Clone for MultiClient<C> {
    fn clone(&self) -> Self {
        Self {
            hosts: self.hosts.clone(),
            nodes: self.nodes.clone(),
            timeout: self.timeout,
        }
    }
}

impl<C: NodeClient> std::fmt::Debug for MultiClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiClient")
            .field("hosts", &self.hosts)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<C: NodeClient> MultiClient<C> {
    /// Resolve one client per host, in order.
    pub fn new<R, I, S>(resolver: R, hosts: I) -> Self
    where
        R: Fn(&str) -> C,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let hosts: Vec<String> = hosts.into_iter().map(Into::into).collect();
        let nodes = hosts.iter().map(|host| Arc::new(resolver(host))).collect();

        Self {
            hosts,
            nodes,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Validate `config` and build a client from it.
    pub fn from_config<R>(config: &MultiClientConfig, resolver: R) -> Result<Self, ConfigError>
    where
        R: Fn(&str) -> C,
    {
        config.validate()?;
        Ok(Self::new(resolver, config.hosts.iter().map(String::as_str)).with_timeout(config.timeout))
    }

    /// Replace the default deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Invoke `f` once per node and collect every outcome.
    ///
    /// `f` receives the node index and its own `Arc` of the client; the
    /// future it returns must own both.
    pub async fn execute<T, F, Fut>(&self, timeout: Duration, f: F) -> Vec<NodeOutcome<T>>
    where
        T: Send + 'static,
        F: Fn(usize, Arc<C>) -> Fut,
        Fut: Future<Output = Result<T, NodeError>> + Send + 'static,
    {
        let units: Vec<Fut> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                debug!(index, host = %self.hosts[index], "dispatching to node");
                f(index, Arc::clone(node))
            })
            .collect();

        let outcomes = fan_out(units, timeout).await;

        for (index, outcome) in outcomes.iter().enumerate() {
            if let Some(cause) = outcome.failure() {
                warn!(index, host = %self.hosts[index], %cause, "node call failed");
            }
        }

        outcomes
    }

    /// Every node must succeed.
    pub async fn run<F, Fut>(&self, f: F) -> Result<(), MultiClientError>
    where
        F: Fn(usize, Arc<C>) -> Fut,
        Fut: Future<Output = Result<(), NodeError>> + Send + 'static,
    {
        self.run_with(self.len(), self.timeout, f).await
    }

    /// At least `quorum` nodes must succeed.
    pub async fn run_with_quorum<F, Fut>(&self, quorum: usize, f: F) -> Result<(), MultiClientError>
    where
        F: Fn(usize, Arc<C>) -> Fut,
        Fut: Future<Output = Result<(), NodeError>> + Send + 'static,
    {
        self.run_with(quorum, self.timeout, f).await
    }

    /// At least `quorum` nodes must succeed within `timeout`.
    pub async fn run_with<F, Fut>(
        &self,
        quorum: usize,
        timeout: Duration,
        f: F,
    ) -> Result<(), MultiClientError>
    where
        F: Fn(usize, Arc<C>) -> Fut,
        Fut: Future<Output = Result<(), NodeError>> + Send + 'static,
    {
        self.gather_with(quorum, timeout, f).await.map(|_| ())
    }

    /// Every node must succeed; returns one value per node, in node order.
    pub async fn gather<T, F, Fut>(&self, f: F) -> Result<Vec<T>, MultiClientError>
    where
        T: Send + 'static,
        F: Fn(usize, Arc<C>) -> Fut,
        Fut: Future<Output = Result<T, NodeError>> + Send + 'static,
    {
        self.gather_all_with(self.timeout, f).await
    }

    /// `gather` with an explicit deadline.
    pub async fn gather_all_with<T, F, Fut>(
        &self,
        timeout: Duration,
        f: F,
    ) -> Result<Vec<T>, MultiClientError>
    where
        T: Send + 'static,
        F: Fn(usize, Arc<C>) -> Fut,
        Fut: Future<Output = Result<T, NodeError>> + Send + 'static,
    {
        let partial = self.gather_with(self.len(), timeout, f).await?;
        // Unanimous acceptance means every slot is filled.
        Ok(partial.into_iter().flatten().collect())
    }

    /// At least `quorum` nodes must succeed; keeps the partial results.
    ///
    /// `result[i]` is `Some` iff node `i` succeeded.
    pub async fn gather_with_quorum<T, F, Fut>(
        &self,
        quorum: usize,
        f: F,
    ) -> Result<Vec<Option<T>>, MultiClientError>
    where
        T: Send + 'static,
        F: Fn(usize, Arc<C>) -> Fut,
        Fut: Future<Output = Result<T, NodeError>> + Send + 'static,
    {
        self.gather_with(quorum, self.timeout, f).await
    }

    /// `gather_with_quorum` with an explicit deadline.
    pub async fn gather_with<T, F, Fut>(
        &self,
        quorum: usize,
        timeout: Duration,
        f: F,
    ) -> Result<Vec<Option<T>>, MultiClientError>
    where
        T: Send + 'static,
        F: Fn(usize, Arc<C>) -> Fut,
        Fut: Future<Output = Result<T, NodeError>> + Send + 'static,
    {
        let outcomes = self.execute(timeout, f).await;

        if let Err(err) = check_quorum(&outcomes, quorum, &self.hosts) {
            warn!(
                succeeded = err.succeeded,
                required = quorum,
                total = err.total,
                "quorum not met"
            );
            return Err(err.into());
        }

        debug!(
            succeeded = count_successes(&outcomes),
            required = quorum,
            total = outcomes.len(),
            "quorum met"
        );
        Ok(outcomes.into_iter().map(NodeOutcome::ok).collect())
    }
}
