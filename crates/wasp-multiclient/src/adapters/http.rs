//! `NodeClient` over the node REST API (reqwest).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{trace, warn};
use wasp_types::{
    ChainId, ChainInfoResponse, ChainRecord, DkSharesInfo, InfoResponse, ReceiptResponse,
    RequestId, VersionResponse,
};

use crate::domain::NodeError;
use crate::operations::MAX_NODE_WAIT;
use crate::ports::outbound::NodeClient;

/// HTTP transport settings shared by every node client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout for ordinary calls.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Sent as `Authorization: Bearer <token>` when set.
    pub auth_token: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(2),
            auth_token: None,
        }
    }
}

/// Error body shape returned by the node API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(alias = "Message")]
    message: Option<String>,
    #[serde(alias = "Error")]
    error: Option<String>,
}

/// Client for one node.
pub struct HttpNodeClient {
    client: Client,
    base_url: String,
    config: HttpClientConfig,
}

impl HttpNodeClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:9090`).
    pub fn new(base_url: impl Into<String>, config: HttpClientConfig) -> Self {
        // Use default client if builder fails - reqwest::Client::new() is infallible
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default HTTP client");
                Client::new()
            });

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config,
        }
    }

    /// Resolver for `MultiClient::new`, sharing one config.
    pub fn resolver(config: HttpClientConfig) -> impl Fn(&str) -> HttpNodeClient {
        move |host: &str| HttpNodeClient::new(host, config.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, NodeError> {
        let response = self
            .authorize(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        trace!(endpoint = %self.base_url, status = status.as_u16(), "node responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(NodeError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, NodeError> {
        let response = self.send(self.client.get(self.url(path))).await?;
        decode(response).await
    }

    async fn post_empty(&self, path: &str) -> Result<(), NodeError> {
        self.send(self.client.post(self.url(path))).await.map(|_| ())
    }

    fn transport_error(&self, err: reqwest::Error) -> NodeError {
        if err.is_decode() {
            NodeError::Decode(err.to_string())
        } else {
            NodeError::Unreachable {
                endpoint: self.base_url.clone(),
                reason: err.to_string(),
            }
        }
    }
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, NodeError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| NodeError::Decode(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| NodeError::Decode(e.to_string()))
}

/// Pull a readable message out of an error body.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.error) {
            return message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn activate_chain(&self, chain_id: &ChainId) -> Result<(), NodeError> {
        self.post_empty(&format!("/v1/chain/activate/{}", chain_id))
            .await
    }

    async fn deactivate_chain(&self) -> Result<(), NodeError> {
        self.post_empty("/v1/chain/deactivate").await
    }

    async fn set_chain_record(
        &self,
        chain_id: &ChainId,
        record: &ChainRecord,
    ) -> Result<(), NodeError> {
        let request = self
            .client
            .post(self.url(&format!("/v1/chain/chainrecord/{}", chain_id)))
            .json(record);
        self.send(request).await.map(|_| ())
    }

    async fn dk_shares_info(&self, shared_address: &str) -> Result<DkSharesInfo, NodeError> {
        self.get_json(&format!("/v1/node/dks/{}", shared_address))
            .await
    }

    async fn version(&self) -> Result<VersionResponse, NodeError> {
        self.get_json("/v1/node/version").await
    }

    async fn info(&self) -> Result<InfoResponse, NodeError> {
        self.get_json("/v1/node/info").await
    }

    async fn chain_info(&self) -> Result<ChainInfoResponse, NodeError> {
        self.get_json("/v1/chain").await
    }

    async fn wait_for_request(
        &self,
        request_id: &RequestId,
        timeout: Duration,
        wait_for_l1_confirmation: bool,
    ) -> Result<ReceiptResponse, NodeError> {
        let timeout = timeout.min(MAX_NODE_WAIT);
        // Round up so sub-second waits are not sent as 0.
        let timeout_seconds = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        let request = self
            .client
            .get(self.url(&format!("/v1/chain/requests/{}/wait", request_id)))
            .query(&[
                ("timeoutSeconds", timeout_seconds.to_string()),
                ("waitForL1Confirmation", wait_for_l1_confirmation.to_string()),
            ])
            // The node holds the connection for up to `timeout`.
            .timeout(timeout.saturating_add(self.config.request_timeout));
        let response = self.send(request).await?;
        decode(response).await
    }
}
