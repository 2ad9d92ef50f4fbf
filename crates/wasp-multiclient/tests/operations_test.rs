//! # Operation Tests
//!
//! Each domain operation against in-memory nodes: argument plumbing, quorum
//! policy and result shape.

mod common;

use std::time::Duration;

use wasp_multiclient::{
    ConfigError, MultiClient, MultiClientConfig, MultiClientError, NodeError, NodeOutcome,
};
use wasp_types::ChainRecord;

use common::{chain_id, hosts, request_id, Behavior, MockCluster, CHAIN, REQUEST_A, REQUEST_B};

#[tokio::test]
async fn test_activate_chain_reaches_every_node() {
    let cluster = MockCluster::new();
    let client = MultiClient::new(|h| cluster.resolve(h), hosts(3));

    client.activate_chain(&chain_id()).await.unwrap();

    for host in client.hosts() {
        assert_eq!(*cluster.log(host).activated.lock().unwrap(), vec![CHAIN.to_string()]);
    }
}

#[tokio::test]
async fn test_deactivate_chain_fails_when_any_node_fails() {
    let all = hosts(3);
    let cluster = MockCluster::with_plan([(
        all[0].clone(),
        Behavior::Failing(NodeError::Status {
            status: 401,
            message: "unauthorized".into(),
        }),
    )]);
    let client = MultiClient::new(|h| cluster.resolve(h), all);

    let err = client.deactivate_chain().await.unwrap_err();
    assert!(matches!(err, MultiClientError::Quorum(_)));
    assert!(err.to_string().contains("unauthorized"));
}

#[tokio::test]
async fn test_put_chain_record_sends_the_same_record_everywhere() {
    let cluster = MockCluster::new();
    let client = MultiClient::new(|h| cluster.resolve(h), hosts(2));
    let record = ChainRecord {
        is_active: true,
        access_nodes: vec!["0xabc".into(), "0xdef".into()],
    };

    client.put_chain_record(&chain_id(), &record).await.unwrap();

    for host in client.hosts() {
        assert_eq!(*cluster.log(host).records.lock().unwrap(), vec![record.clone()]);
    }
}

#[tokio::test]
async fn test_dk_shares_and_versions_come_back_in_node_order() {
    let cluster = MockCluster::new();
    let client = MultiClient::new(|h| cluster.resolve(h), hosts(4));

    let shares = client.dk_shares_get("0xshared").await.unwrap();
    assert_eq!(shares.len(), 4);
    for (share, host) in shares.iter().zip(client.hosts()) {
        assert_eq!(share.address, "0xshared");
        assert_eq!(share.public_key, format!("pk-{}", host));
    }

    let versions = client.node_versions().await.unwrap();
    let expected: Vec<String> = client.hosts().iter().map(|h| format!("v1.0.0+{}", h)).collect();
    let actual: Vec<String> = versions.into_iter().map(|v| v.version).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_node_infos_keeps_failures_alongside_successes() {
    let all = hosts(3);
    let cluster = MockCluster::with_plan([(
        all[2].clone(),
        Behavior::Failing(NodeError::Other("boom".into())),
    )]);
    let client = MultiClient::new(|h| cluster.resolve(h), all.clone());

    let infos = client.node_infos().await;
    assert_eq!(infos.len(), 3);
    assert_eq!(infos[0].value().map(|i| i.peering_url.as_str()), Some(all[0].as_str()));
    assert!(infos[1].is_success());
    assert_eq!(infos[2], NodeOutcome::Failed(NodeError::Other("boom".into())));
}

#[tokio::test]
async fn test_chain_info_returns_partial_results_when_quorum_met() {
    let all = hosts(4);
    let cluster = MockCluster::with_plan([(
        all[1].clone(),
        Behavior::Failing(NodeError::Other("not synced".into())),
    )]);
    let client = MultiClient::new(|h| cluster.resolve(h), all);

    let infos = client.chain_info(3).await.unwrap();
    assert_eq!(infos.len(), 4);
    assert!(infos[1].is_none());
    assert_eq!(infos[0].as_ref().map(|i| i.chain_id.clone()), Some(chain_id()));

    let err = client.chain_info(4).await.unwrap_err();
    assert_eq!(err.quorum().map(|q| q.succeeded), Some(3));
}

#[tokio::test]
async fn test_wait_caps_node_wait_and_passes_l1_flag() {
    let cluster = MockCluster::new();
    let client = MultiClient::new(|h| cluster.resolve(h), hosts(2));
    let request = request_id(REQUEST_A);

    let receipts = client
        .wait_until_request_processed(&chain_id(), &request, true, Duration::from_secs(600))
        .await
        .unwrap();
    assert_eq!(receipts.len(), 2);

    for host in client.hosts() {
        let waits = cluster.log(host).waits.lock().unwrap().clone();
        assert_eq!(waits, vec![(REQUEST_A.to_string(), Duration::from_secs(60), true)]);
    }
}

#[tokio::test]
async fn test_wait_keeps_short_timeouts() {
    let cluster = MockCluster::new();
    let client = MultiClient::new(|h| cluster.resolve(h), hosts(1));

    client
        .wait_until_request_processed(
            &chain_id(),
            &request_id(REQUEST_A),
            false,
            Duration::from_secs(3),
        )
        .await
        .unwrap();

    let waits = cluster.log(&client.hosts()[0]).waits.lock().unwrap().clone();
    assert_eq!(waits[0].1, Duration::from_secs(3));
    assert!(!waits[0].2);
}

#[tokio::test]
async fn test_plain_wait_accepts_failed_receipts() {
    let all = hosts(2);
    let cluster = MockCluster::with_plan([(
        all[0].clone(),
        Behavior::RejectsRequest("out of gas".into()),
    )]);
    let client = MultiClient::new(|h| cluster.resolve(h), all);

    let receipts = client
        .wait_until_request_processed(
            &chain_id(),
            &request_id(REQUEST_A),
            false,
            Duration::from_secs(5),
        )
        .await
        .unwrap();
    assert!(!receipts[0].is_success());
    assert!(receipts[1].is_success());
}

#[tokio::test]
async fn test_successful_wait_rejects_failed_receipts() {
    let all = hosts(2);
    let cluster = MockCluster::with_plan([(
        all[0].clone(),
        Behavior::RejectsRequest("out of gas".into()),
    )]);
    let client = MultiClient::new(|h| cluster.resolve(h), all);

    let err = client
        .wait_until_request_processed_successfully(
            &chain_id(),
            &request_id(REQUEST_A),
            false,
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

    let quorum = err.quorum().expect("quorum failure");
    assert_eq!(quorum.failures.len(), 1);
    assert_eq!(quorum.failures[0].index, 0);
    let message = quorum.failures[0].cause.to_string();
    assert!(message.contains("out of gas"));
    assert!(message.contains(REQUEST_A));
}

#[tokio::test]
async fn test_wait_for_all_requests_is_request_major() {
    let cluster = MockCluster::new();
    let client = MultiClient::new(|h| cluster.resolve(h), hosts(3));
    let requests = vec![request_id(REQUEST_A), request_id(REQUEST_B)];

    let receipts = client
        .wait_until_all_requests_processed_successfully(
            &chain_id(),
            &requests,
            false,
            Duration::from_secs(5),
        )
        .await
        .unwrap();
    assert_eq!(receipts.len(), 2);
    assert!(receipts.iter().all(|per_node| per_node.len() == 3));

    let waited: Vec<String> = cluster
        .log(&client.hosts()[0])
        .waits
        .lock()
        .unwrap()
        .iter()
        .map(|(id, _, _)| id.clone())
        .collect();
    assert_eq!(waited, vec![REQUEST_A.to_string(), REQUEST_B.to_string()]);
}

#[tokio::test]
async fn test_wait_for_all_requests_names_the_failing_request() {
    let all = hosts(2);
    let cluster = MockCluster::with_plan([(
        all[1].clone(),
        Behavior::RejectsRequest("reverted".into()),
    )]);
    let client = MultiClient::new(|h| cluster.resolve(h), all);
    let requests = vec![request_id(REQUEST_B), request_id(REQUEST_A)];

    let err = client
        .wait_until_all_requests_processed_successfully(
            &chain_id(),
            &requests,
            true,
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

    match &err {
        MultiClientError::RequestWait { request_id, source } => {
            assert_eq!(request_id.as_str(), REQUEST_B);
            assert_eq!(source.failures[0].index, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    // Stops at the first failing request.
    assert_eq!(cluster.log(&client.hosts()[0]).waits.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_wait_until_chain_ready_retries_then_gives_up() {
    let all = hosts(2);
    let cluster = MockCluster::with_plan([(
        all[1].clone(),
        Behavior::Failing(NodeError::Status {
            status: 404,
            message: "chain not found".into(),
        }),
    )]);
    let client = MultiClient::new(|h| cluster.resolve(h), all.clone());

    let err = client
        .wait_until_chain_ready(2, Duration::from_millis(5))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("chain not found"));
    assert_eq!(cluster.log(&all[1]).calls(), 3);
}

#[tokio::test]
async fn test_wait_until_chain_ready_returns_once_all_answer() {
    let cluster = MockCluster::new();
    let client = MultiClient::new(|h| cluster.resolve(h), hosts(3));

    client
        .wait_until_chain_ready(5, Duration::from_millis(1))
        .await
        .unwrap();
    assert_eq!(cluster.total_calls(), 3);
}

#[tokio::test]
async fn test_shared_client_serves_concurrent_operations() {
    let cluster = MockCluster::new();
    let client = MultiClient::new(|h| cluster.resolve(h), hosts(3));
    let fast = client.clone().with_timeout(Duration::from_secs(1));

    let (versions, infos) = futures::future::join(client.node_versions(), fast.node_infos()).await;

    assert_eq!(versions.unwrap().len(), 3);
    assert!(infos.iter().all(NodeOutcome::is_success));
    assert_eq!(client.timeout(), Duration::from_secs(30));
    assert_eq!(fast.timeout(), Duration::from_secs(1));
}

#[test]
fn test_from_config_validates_before_resolving() {
    let cluster = MockCluster::new();

    let empty = MultiClientConfig::default();
    let err = MultiClient::from_config(&empty, |h| cluster.resolve(h)).unwrap_err();
    assert_eq!(err, ConfigError::NoHosts);
    assert_eq!(cluster.total_calls(), 0);

    let mut config = MultiClientConfig::with_hosts(hosts(2));
    config.quorum = Some(3);
    assert_eq!(
        MultiClient::from_config(&config, |h| cluster.resolve(h)).unwrap_err(),
        ConfigError::QuorumTooLarge { quorum: 3, hosts: 2 }
    );

    config.quorum = Some(2);
    config.timeout = Duration::from_secs(7);
    let client = MultiClient::from_config(&config, |h| cluster.resolve(h)).unwrap();
    assert_eq!(client.hosts(), hosts(2).as_slice());
    assert_eq!(client.timeout(), Duration::from_secs(7));
}
