//! Outbound ports (SPI) for the multi-client.

use std::time::Duration;

use async_trait::async_trait;
use wasp_types::{
    ChainId, ChainInfoResponse, ChainRecord, DkSharesInfo, InfoResponse, ReceiptResponse,
    RequestId, VersionResponse,
};

use crate::domain::NodeError;

/// Capability bound to exactly one node endpoint.
///
/// One method per remote call the multi-client issues. The transport,
/// marshaling and authentication are the implementor's business; the
/// multi-client only relies on the `Result` contract.
#[async_trait]
pub trait NodeClient: Send + Sync + 'static {
    /// Endpoint this client talks to.
    fn endpoint(&self) -> &str;

    /// Start running `chain_id` on the node.
    async fn activate_chain(&self, chain_id: &ChainId) -> Result<(), NodeError>;

    /// Stop running the active chain on the node.
    async fn deactivate_chain(&self) -> Result<(), NodeError>;

    /// Store the registry record for `chain_id` on the node.
    async fn set_chain_record(
        &self,
        chain_id: &ChainId,
        record: &ChainRecord,
    ) -> Result<(), NodeError>;

    /// Key shares the node holds for `shared_address`.
    async fn dk_shares_info(&self, shared_address: &str) -> Result<DkSharesInfo, NodeError>;

    async fn version(&self) -> Result<VersionResponse, NodeError>;

    async fn info(&self) -> Result<InfoResponse, NodeError>;

    async fn chain_info(&self) -> Result<ChainInfoResponse, NodeError>;

    /// Block on the node until `request_id` is processed or `timeout`
    /// elapses node-side.
    ///
    /// With `wait_for_l1_confirmation` the node also waits for the block to
    /// be confirmed on L1.
    async fn wait_for_request(
        &self,
        request_id: &RequestId,
        timeout: Duration,
        wait_for_l1_confirmation: bool,
    ) -> Result<ReceiptResponse, NodeError>;
}
