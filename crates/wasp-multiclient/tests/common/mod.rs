//! In-memory `NodeClient` used by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wasp_multiclient::{NodeClient, NodeError};
use wasp_types::{
    ChainId, ChainInfoResponse, ChainRecord, DkSharesInfo, InfoResponse, ReceiptResponse,
    RequestId, VersionResponse,
};

pub const CHAIN: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
pub const REQUEST_A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const REQUEST_B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

pub fn chain_id() -> ChainId {
    ChainId::parse(CHAIN).unwrap()
}

pub fn request_id(raw: &str) -> RequestId {
    RequestId::parse(raw).unwrap()
}

pub fn hosts(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("http://node{}:9090", i)).collect()
}

/// How a mock node answers every call.
#[derive(Debug, Clone)]
pub enum Behavior {
    Healthy,
    Failing(NodeError),
    Slow(Duration),
    /// Answers wait calls with a receipt carrying this VM error.
    RejectsRequest(String),
}

/// Calls observed by one mock node.
#[derive(Debug, Default)]
pub struct CallLog {
    pub count: AtomicUsize,
    pub activated: Mutex<Vec<String>>,
    pub records: Mutex<Vec<ChainRecord>>,
    pub waits: Mutex<Vec<(String, Duration, bool)>>,
}

impl CallLog {
    pub fn calls(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

pub struct MockNode {
    host: String,
    behavior: Behavior,
    log: Arc<CallLog>,
}

impl MockNode {
    async fn respond<T>(&self, value: T) -> Result<T, NodeError> {
        self.log.count.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Healthy | Behavior::RejectsRequest(_) => Ok(value),
            Behavior::Failing(err) => Err(err.clone()),
            Behavior::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(value)
            }
        }
    }
}

/// Builds mock nodes and keeps their call logs for assertions.
#[derive(Default)]
pub struct MockCluster {
    plan: HashMap<String, Behavior>,
    logs: Mutex<HashMap<String, Arc<CallLog>>>,
}

impl MockCluster {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_plan(plan: impl IntoIterator<Item = (String, Behavior)>) -> Arc<Self> {
        Arc::new(Self {
            plan: plan.into_iter().collect(),
            logs: Mutex::new(HashMap::new()),
        })
    }

    pub fn resolve(&self, host: &str) -> MockNode {
        let log = Arc::new(CallLog::default());
        self.logs
            .lock()
            .unwrap()
            .insert(host.to_string(), Arc::clone(&log));
        MockNode {
            host: host.to_string(),
            behavior: self.plan.get(host).cloned().unwrap_or(Behavior::Healthy),
            log,
        }
    }

    pub fn log(&self, host: &str) -> Arc<CallLog> {
        Arc::clone(self.logs.lock().unwrap().get(host).expect("host was resolved"))
    }

    pub fn total_calls(&self) -> usize {
        self.logs.lock().unwrap().values().map(|l| l.calls()).sum()
    }
}

#[async_trait]
impl NodeClient for MockNode {
    fn endpoint(&self) -> &str {
        &self.host
    }

    async fn activate_chain(&self, chain_id: &ChainId) -> Result<(), NodeError> {
        self.respond(()).await?;
        self.log.activated.lock().unwrap().push(chain_id.to_string());
        Ok(())
    }

    async fn deactivate_chain(&self) -> Result<(), NodeError> {
        self.respond(()).await
    }

    async fn set_chain_record(
        &self,
        _chain_id: &ChainId,
        record: &ChainRecord,
    ) -> Result<(), NodeError> {
        self.respond(()).await?;
        self.log.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn dk_shares_info(&self, shared_address: &str) -> Result<DkSharesInfo, NodeError> {
        self.respond(DkSharesInfo {
            address: shared_address.to_string(),
            peer_identities: Vec::new(),
            peer_index: None,
            public_key: format!("pk-{}", self.host),
            threshold: 3,
        })
        .await
    }

    async fn version(&self) -> Result<VersionResponse, NodeError> {
        self.respond(VersionResponse {
            version: format!("v1.0.0+{}", self.host),
        })
        .await
    }

    async fn info(&self) -> Result<InfoResponse, NodeError> {
        self.respond(InfoResponse {
            version: "v1.0.0".to_string(),
            public_key: format!("pk-{}", self.host),
            peering_url: self.host.clone(),
            l1_params: None,
        })
        .await
    }

    async fn chain_info(&self) -> Result<ChainInfoResponse, NodeError> {
        self.respond(ChainInfoResponse {
            chain_id: chain_id(),
            chain_owner_id: "owner".to_string(),
            is_active: true,
            public_url: self.host.clone(),
            metadata: None,
            gas_fee_policy: None,
        })
        .await
    }

    async fn wait_for_request(
        &self,
        request_id: &RequestId,
        timeout: Duration,
        wait_for_l1_confirmation: bool,
    ) -> Result<ReceiptResponse, NodeError> {
        self.log.waits.lock().unwrap().push((
            request_id.to_string(),
            timeout,
            wait_for_l1_confirmation,
        ));
        let error_message = match &self.behavior {
            Behavior::RejectsRequest(reason) => Some(reason.clone()),
            _ => None,
        };
        self.respond(ReceiptResponse {
            block_index: 1,
            request_index: 0,
            gas_budget: "1000".to_string(),
            gas_burned: "100".to_string(),
            gas_fee_charged: "10".to_string(),
            error_message,
            raw_error: None,
            request: None,
        })
        .await
    }
}
