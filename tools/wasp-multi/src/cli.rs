//! Command-line arguments and their merge with the environment config.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use wasp_multiclient::humantime_serde::parse_duration;
use wasp_multiclient::{
    byzantine_majority, split_hosts, unanimous, ConfigError, HttpClientConfig, MultiClientConfig,
};
use wasp_types::{ChainId, RequestId};

/// Run one node API call against every node of a Wasp committee
#[derive(Parser, Debug)]
#[command(name = "wasp-multi", version)]
#[command(about = "Fan a node API call out to every committee node and check the quorum")]
pub struct Cli {
    /// Node API endpoint; repeat per node. Overrides WASP_MULTICLIENT_HOSTS
    #[arg(short = 'n', long = "node", global = true)]
    pub nodes: Vec<String>,

    /// Deadline for each fan-out, e.g. 500ms, 30s, 2m
    #[arg(short, long, global = true, value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// Nodes that must succeed: a number, "all" or "bft"
    #[arg(short, long, global = true)]
    pub quorum: Option<QuorumArg>,

    /// Bearer token for the node API
    #[arg(long, env = "WASP_AUTH_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Activate a chain on every node
    Activate { chain_id: ChainId },

    /// Deactivate the running chain on every node
    Deactivate,

    /// Store a chain record on every node
    ChainRecord {
        chain_id: ChainId,
        /// Public key of an access node; repeatable
        #[arg(long = "access-node")]
        access_nodes: Vec<String>,
        /// Store the record with the chain disabled
        #[arg(long)]
        inactive: bool,
    },

    /// Print the software version of every node
    Versions,

    /// Print identity and peering info of every node
    Info,

    /// Print chain info, requiring --quorum nodes to answer
    ChainInfo,

    /// Print the key shares of a committee address on every node
    Dks { shared_address: String },

    /// Wait until every node has processed the given requests
    Wait {
        chain_id: ChainId,
        #[arg(required = true)]
        request_ids: Vec<RequestId>,
        /// Also wait for L1 confirmation
        #[arg(long)]
        l1: bool,
        /// Node-side wait per request (the node caps it at 60s)
        #[arg(long, value_parser = parse_duration_arg, default_value = "30s")]
        wait_timeout: Duration,
        /// Treat receipts carrying a VM error as failures
        #[arg(long)]
        check_success: bool,
    },

    /// Poll chain info until every node answers
    AwaitChain {
        #[arg(long, default_value_t = 10)]
        retries: usize,
        #[arg(long, value_parser = parse_duration_arg, default_value = "1s")]
        interval: Duration,
    },
}

/// `--quorum` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuorumArg {
    All,
    /// Smallest count above two thirds of the nodes.
    Bft,
    Exact(usize),
}

impl QuorumArg {
    /// Concrete quorum for `node_count` nodes.
    pub fn resolve(self, node_count: usize) -> usize {
        match self {
            QuorumArg::All => unanimous(node_count),
            QuorumArg::Bft => byzantine_majority(node_count),
            QuorumArg::Exact(n) => n,
        }
    }
}

impl FromStr for QuorumArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(QuorumArg::All),
            "bft" => Ok(QuorumArg::Bft),
            other => other
                .parse()
                .map(QuorumArg::Exact)
                .map_err(|_| format!("expected a number, \"all\" or \"bft\", got {:?}", s)),
        }
    }
}

impl fmt::Display for QuorumArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuorumArg::All => write!(f, "all"),
            QuorumArg::Bft => write!(f, "bft"),
            QuorumArg::Exact(n) => write!(f, "{}", n),
        }
    }
}

fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| format!("{}: {:?}", e, s))
}

impl Cli {
    /// Environment config overridden by flags, validated.
    pub fn config(&self) -> Result<MultiClientConfig, ConfigError> {
        self.merge(MultiClientConfig::from_env())
    }

    /// Apply flags on top of `config` and validate the result.
    pub fn merge(&self, mut config: MultiClientConfig) -> Result<MultiClientConfig, ConfigError> {
        if !self.nodes.is_empty() {
            config.hosts = self.nodes.iter().flat_map(|n| split_hosts(n)).collect();
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(quorum) = self.quorum {
            config.quorum = Some(quorum.resolve(config.hosts.len()));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            auth_token: self.token.clone(),
            ..HttpClientConfig::default()
        }
    }
}
