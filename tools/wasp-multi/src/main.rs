//! wasp-multi: run one node API call against every node of a Wasp committee.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use wasp_multi::cli::{Cli, Command};
use wasp_multi::{logging, output};
use wasp_multiclient::{HttpNodeClient, MultiClient};
use wasp_types::ChainRecord;

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.json_logs)?;

    let config = cli.config().context("invalid multi-client configuration")?;
    debug!(hosts = ?config.hosts, timeout = ?config.timeout, quorum = ?config.quorum, "configuration loaded");

    let client = MultiClient::from_config(&config, HttpNodeClient::resolver(cli.http_config()))?;
    let hosts = client.hosts().to_vec();

    match cli.command {
        Command::Activate { chain_id } => {
            client
                .activate_chain(&chain_id)
                .await
                .with_context(|| format!("activating chain {}", chain_id))?;
            println!("chain {} activated on {} nodes", chain_id, client.len());
        }
        Command::Deactivate => {
            client
                .deactivate_chain()
                .await
                .context("deactivating chain")?;
            println!("chain deactivated on {} nodes", client.len());
        }
        Command::ChainRecord {
            chain_id,
            access_nodes,
            inactive,
        } => {
            let record = ChainRecord {
                is_active: !inactive,
                access_nodes,
            };
            client
                .put_chain_record(&chain_id, &record)
                .await
                .with_context(|| format!("storing chain record for {}", chain_id))?;
            println!("chain record for {} stored on {} nodes", chain_id, client.len());
        }
        Command::Versions => {
            let versions = client.node_versions().await.context("querying node versions")?;
            print_lines(output::value_lines(&hosts, &versions, |v| v.version.clone()));
        }
        Command::Info => {
            let infos = client.node_infos().await;
            print_lines(output::outcome_lines(&hosts, &infos, output::render_info));
        }
        Command::ChainInfo => {
            let infos = client
                .chain_info(config.effective_quorum())
                .await
                .context("querying chain info")?;
            print_lines(output::partial_lines(&hosts, &infos, output::render_chain_info));
        }
        Command::Dks { shared_address } => {
            let shares = client
                .dk_shares_get(&shared_address)
                .await
                .with_context(|| format!("querying key shares for {}", shared_address))?;
            print_lines(output::value_lines(&hosts, &shares, output::render_dk_shares));
        }
        Command::Wait {
            chain_id,
            request_ids,
            l1,
            wait_timeout,
            check_success,
        } => {
            let receipts = if check_success {
                client
                    .wait_until_all_requests_processed_successfully(
                        &chain_id,
                        &request_ids,
                        l1,
                        wait_timeout,
                    )
                    .await
            } else {
                client
                    .wait_until_all_requests_processed(&chain_id, &request_ids, l1, wait_timeout)
                    .await
            }
            .context("waiting for requests")?;

            for (request_id, per_node) in request_ids.iter().zip(&receipts) {
                println!("request {}", request_id);
                print_lines(output::value_lines(&hosts, per_node, output::render_receipt));
            }
        }
        Command::AwaitChain { retries, interval } => {
            client
                .wait_until_chain_ready(retries, interval)
                .await
                .context("waiting for chain")?;
            println!("chain ready on {} nodes", client.len());
        }
    }

    Ok(())
}
