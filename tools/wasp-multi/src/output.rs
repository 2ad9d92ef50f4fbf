//! One line per node: `#<index> <host>: <body>`.

use std::fmt::Display;

use wasp_multiclient::NodeOutcome;
use wasp_types::{ChainInfoResponse, DkSharesInfo, InfoResponse, ReceiptResponse};

pub fn node_line(index: usize, host: &str, body: impl Display) -> String {
    format!("#{} {}: {}", index, host, body)
}

/// Lines for values that every node returned.
pub fn value_lines<T>(hosts: &[String], values: &[T], render: impl Fn(&T) -> String) -> Vec<String> {
    hosts
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (host, value))| node_line(i, host, render(value)))
        .collect()
}

/// Lines for quorum results where some nodes may be missing.
pub fn partial_lines<T>(
    hosts: &[String],
    values: &[Option<T>],
    render: impl Fn(&T) -> String,
) -> Vec<String> {
    hosts
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (host, value))| match value {
            Some(value) => node_line(i, host, render(value)),
            None => node_line(i, host, "no answer"),
        })
        .collect()
}

/// Lines for raw outcomes, failures included.
pub fn outcome_lines<T>(
    hosts: &[String],
    outcomes: &[NodeOutcome<T>],
    render: impl Fn(&T) -> String,
) -> Vec<String> {
    hosts
        .iter()
        .zip(outcomes)
        .enumerate()
        .map(|(i, (host, outcome))| match (outcome.value(), outcome.failure()) {
            (Some(value), _) => node_line(i, host, render(value)),
            (None, Some(cause)) => node_line(i, host, format!("FAILED {}", cause)),
            (None, None) => node_line(i, host, "no answer"),
        })
        .collect()
}

pub fn render_info(info: &InfoResponse) -> String {
    format!(
        "version {} pubkey {} peering {}",
        info.version, info.public_key, info.peering_url
    )
}

pub fn render_chain_info(info: &ChainInfoResponse) -> String {
    format!(
        "chain {} active={} owner {}",
        info.chain_id, info.is_active, info.chain_owner_id
    )
}

pub fn render_dk_shares(shares: &DkSharesInfo) -> String {
    let index = shares
        .peer_index
        .map(|i| i.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "pubkey {} threshold {}/{} index {}",
        shares.public_key,
        shares.threshold,
        shares.peer_identities.len(),
        index
    )
}

pub fn render_receipt(receipt: &ReceiptResponse) -> String {
    let status = match receipt.failure_reason() {
        Some(reason) => format!("error {}", reason),
        None => "ok".to_string(),
    };
    format!(
        "block {} req {} gas burned {} fee {} {}",
        receipt.block_index, receipt.request_index, receipt.gas_burned, receipt.gas_fee_charged, status
    )
}
