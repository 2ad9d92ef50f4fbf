//! # Node API Payloads
//!
//! Response and request bodies of the node REST API, as far as the
//! multi-node client needs them. Fields the client never reads are kept as
//! raw `serde_json::Value` so nothing is lost when a payload is echoed back
//! to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::ChainId;

// =============================================================================
// CHAIN REGISTRY
// =============================================================================

/// Registry entry for a chain on one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChainRecord {
    /// Whether the node runs the chain.
    pub is_active: bool,
    /// Public keys (hex) of the access nodes serving the chain.
    #[serde(default)]
    pub access_nodes: Vec<String>,
}

/// Summary of a chain as seen by one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfoResponse {
    #[serde(rename = "chainID")]
    pub chain_id: ChainId,
    #[serde(default)]
    pub chain_owner_id: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, rename = "publicURL")]
    pub public_url: String,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub gas_fee_policy: Option<Value>,
}

// =============================================================================
// NODE
// =============================================================================

/// Software version of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

/// Node identity and L1 connection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub version: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default, rename = "peeringURL")]
    pub peering_url: String,
    #[serde(default)]
    pub l1_params: Option<Value>,
}

/// Distributed key shares held by one node for a shared address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DkSharesInfo {
    /// Shared (committee) address.
    pub address: String,
    /// Peering identities of the committee members, in share order.
    #[serde(default)]
    pub peer_identities: Vec<String>,
    /// Index of this node within the committee, if it is a member.
    #[serde(default)]
    pub peer_index: Option<u16>,
    /// Shared public key.
    #[serde(default)]
    pub public_key: String,
    /// Signing threshold.
    pub threshold: u16,
}

// =============================================================================
// RECEIPTS
// =============================================================================

/// Receipt of a processed request.
///
/// Gas values are decimal strings on the wire (they may exceed `u64` range
/// in JSON number precision).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub block_index: u32,
    pub request_index: u16,
    #[serde(default)]
    pub gas_budget: String,
    #[serde(default)]
    pub gas_burned: String,
    #[serde(default)]
    pub gas_fee_charged: String,
    /// Human readable VM error, present only when the request failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Undecoded VM error, present only when the request failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_error: Option<Value>,
    #[serde(default)]
    pub request: Option<Value>,
}

impl ReceiptResponse {
    /// Whether the request executed without a VM error.
    pub fn is_success(&self) -> bool {
        self.error_message.is_none() && self.raw_error.is_none()
    }

    /// Description of the VM error, if any.
    pub fn failure_reason(&self) -> Option<String> {
        match (&self.error_message, &self.raw_error) {
            (Some(message), _) => Some(message.clone()),
            (None, Some(raw)) => Some(raw.to_string()),
            (None, None) => None,
        }
    }
}
