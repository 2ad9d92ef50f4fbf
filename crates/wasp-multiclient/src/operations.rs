//! # Domain Operations
//!
//! Thin callbacks over `MultiClient`: each one names the remote call and the
//! quorum policy, nothing more.
//!
//! | operation | quorum | result shape |
//! |-----------|--------|--------------|
//! | `activate_chain` / `deactivate_chain` / `put_chain_record` | all | `()` |
//! | `dk_shares_get` / `node_versions` | all | `Vec<T>` in node order |
//! | `node_infos` | none | one `NodeOutcome` per node |
//! | `chain_info` | caller | `Vec<Option<T>>` |
//! | `wait_until_*` | all | receipts in node order |

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use wasp_types::{
    ChainId, ChainInfoResponse, ChainRecord, DkSharesInfo, InfoResponse, ReceiptResponse,
    RequestId, VersionResponse,
};

use crate::domain::{MultiClientError, NodeError, NodeOutcome};
use crate::ports::outbound::NodeClient;
use crate::service::MultiClient;

/// Node-side wait cap enforced by the node API.
pub const MAX_NODE_WAIT: Duration = Duration::from_secs(60);

/// Extra fan-out time on top of a node-side wait, so the node gives up first
/// and reports its own error instead of being cut off.
pub const WAIT_GRACE: Duration = Duration::from_secs(5);

/// Turn a receipt carrying a VM error into a node failure.
fn require_success(request_id: &RequestId, receipt: ReceiptResponse) -> Result<ReceiptResponse, NodeError> {
    if receipt.is_success() {
        return Ok(receipt);
    }
    Err(NodeError::RequestFailed {
        request_id: request_id.to_string(),
        reason: receipt.failure_reason().unwrap_or_default(),
    })
}

impl<C: NodeClient> MultiClient<C> {
    /// Activate `chain_id` on every node.
    pub async fn activate_chain(&self, chain_id: &ChainId) -> Result<(), MultiClientError> {
        self.run(|_, node: Arc<C>| {
            let chain_id = chain_id.clone();
            async move { node.activate_chain(&chain_id).await }
        })
        .await?;
        info!(chain_id = %chain_id, nodes = self.len(), "chain activated");
        Ok(())
    }

    /// Deactivate the running chain on every node.
    pub async fn deactivate_chain(&self) -> Result<(), MultiClientError> {
        self.run(|_, node: Arc<C>| async move { node.deactivate_chain().await })
            .await?;
        info!(nodes = self.len(), "chain deactivated");
        Ok(())
    }

    /// Store the same chain record on every node.
    pub async fn put_chain_record(
        &self,
        chain_id: &ChainId,
        record: &ChainRecord,
    ) -> Result<(), MultiClientError> {
        self.run(|_, node: Arc<C>| {
            let chain_id = chain_id.clone();
            let record = record.clone();
            async move { node.set_chain_record(&chain_id, &record).await }
        })
        .await
    }

    /// Key shares for `shared_address` from every node, in node order.
    pub async fn dk_shares_get(
        &self,
        shared_address: &str,
    ) -> Result<Vec<DkSharesInfo>, MultiClientError> {
        self.gather(|_, node: Arc<C>| {
            let shared_address = shared_address.to_string();
            async move { node.dk_shares_info(&shared_address).await }
        })
        .await
    }

    /// Software version of every node, in node order.
    pub async fn node_versions(&self) -> Result<Vec<VersionResponse>, MultiClientError> {
        self.gather(|_, node: Arc<C>| async move { node.version().await })
            .await
    }

    /// Node info from every node, one outcome each, whatever fails.
    pub async fn node_infos(&self) -> Vec<NodeOutcome<InfoResponse>> {
        self.execute(self.timeout(), |_, node: Arc<C>| async move { node.info().await })
            .await
    }

    /// Chain info from at least `quorum` nodes; `None` where a node failed.
    pub async fn chain_info(
        &self,
        quorum: usize,
    ) -> Result<Vec<Option<ChainInfoResponse>>, MultiClientError> {
        self.gather_with_quorum(quorum, |_, node: Arc<C>| async move { node.chain_info().await })
            .await
    }

    /// Poll chain info until every node answers.
    ///
    /// Sleeps `interval` before each attempt and gives up after `retries`
    /// failed attempts beyond the first, returning the last error. Each
    /// attempt is a single fan-out; the fan-out itself never retries.
    pub async fn wait_until_chain_ready(
        &self,
        retries: usize,
        interval: Duration,
    ) -> Result<(), MultiClientError> {
        let mut remaining = retries;
        loop {
            tokio::time::sleep(interval).await;
            match self
                .run(|_, node: Arc<C>| async move { node.chain_info().await.map(|_| ()) })
                .await
            {
                Ok(()) => return Ok(()),
                Err(err) if remaining > 0 => {
                    remaining -= 1;
                    warn!(remaining, error = %err, "chain not ready on all nodes yet");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Wait until every node has processed `request_id`.
    ///
    /// `timeout` is the node-side wait (capped at 60s by the node); the
    /// fan-out deadline adds a small grace on top.
    pub async fn wait_until_request_processed(
        &self,
        chain_id: &ChainId,
        request_id: &RequestId,
        wait_for_l1_confirmation: bool,
        timeout: Duration,
    ) -> Result<Vec<ReceiptResponse>, MultiClientError> {
        let node_wait = timeout.min(MAX_NODE_WAIT);
        let receipts = self
            .gather_all_with(node_wait + WAIT_GRACE, |_, node: Arc<C>| {
                let request_id = request_id.clone();
                async move {
                    node.wait_for_request(&request_id, node_wait, wait_for_l1_confirmation)
                        .await
                }
            })
            .await?;
        info!(chain_id = %chain_id, request_id = %request_id, "request processed on all nodes");
        Ok(receipts)
    }

    /// As `wait_until_request_processed`, but a receipt with a VM error
    /// counts as a failure of that node.
    pub async fn wait_until_request_processed_successfully(
        &self,
        chain_id: &ChainId,
        request_id: &RequestId,
        wait_for_l1_confirmation: bool,
        timeout: Duration,
    ) -> Result<Vec<ReceiptResponse>, MultiClientError> {
        let node_wait = timeout.min(MAX_NODE_WAIT);
        let receipts = self
            .gather_all_with(node_wait + WAIT_GRACE, |_, node: Arc<C>| {
                let request_id = request_id.clone();
                async move {
                    let receipt = node
                        .wait_for_request(&request_id, node_wait, wait_for_l1_confirmation)
                        .await?;
                    require_success(&request_id, receipt)
                }
            })
            .await?;
        info!(chain_id = %chain_id, request_id = %request_id, "request succeeded on all nodes");
        Ok(receipts)
    }

    /// Wait for each request in turn; receipts are request-major.
    pub async fn wait_until_all_requests_processed(
        &self,
        chain_id: &ChainId,
        request_ids: &[RequestId],
        wait_for_l1_confirmation: bool,
        timeout: Duration,
    ) -> Result<Vec<Vec<ReceiptResponse>>, MultiClientError> {
        let mut all = Vec::with_capacity(request_ids.len());
        for request_id in request_ids {
            let receipts = self
                .wait_until_request_processed(chain_id, request_id, wait_for_l1_confirmation, timeout)
                .await
                .map_err(|err| with_request(request_id, err))?;
            all.push(receipts);
        }
        Ok(all)
    }

    /// As `wait_until_all_requests_processed`, with the receipt check.
    pub async fn wait_until_all_requests_processed_successfully(
        &self,
        chain_id: &ChainId,
        request_ids: &[RequestId],
        wait_for_l1_confirmation: bool,
        timeout: Duration,
    ) -> Result<Vec<Vec<ReceiptResponse>>, MultiClientError> {
        let mut all = Vec::with_capacity(request_ids.len());
        for request_id in request_ids {
            let receipts = self
                .wait_until_request_processed_successfully(
                    chain_id,
                    request_id,
                    wait_for_l1_confirmation,
                    timeout,
                )
                .await
                .map_err(|err| with_request(request_id, err))?;
            all.push(receipts);
        }
        Ok(all)
    }
}

/// Attach the request id to a quorum failure.
fn with_request(request_id: &RequestId, err: MultiClientError) -> MultiClientError {
    match err {
        MultiClientError::Quorum(source) => MultiClientError::RequestWait {
            request_id: request_id.clone(),
            source,
        },
        other => other,
    }
}
