//! Multi-client configuration with validation.
//!
//! Loaded from a serde source or from the environment:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WASP_MULTICLIENT_HOSTS` | (none) | Comma-separated node API endpoints |
//! | `WASP_MULTICLIENT_TIMEOUT` | `30s` | Per-call deadline (`30s`, `500ms`, `2m`, or plain seconds) |
//! | `WASP_MULTICLIENT_QUORUM` | all hosts | Nodes that must succeed |

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::time::Duration;

use super::error::ConfigError;

/// Deadline applied to a fan-out when the caller does not pass one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Main multi-client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiClientConfig {
    /// Node API endpoints, in the order outcomes are reported.
    pub hosts: Vec<String>,
    /// Default per-call deadline.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Nodes that must succeed; `None` means all of them.
    pub quorum: Option<usize>,
}

impl Default for MultiClientConfig {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            quorum: None,
        }
    }
}

impl MultiClientConfig {
    /// Config for the given hosts with defaults elsewhere.
    pub fn with_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults; `validate` is not
    /// called here.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(hosts) = env::var("WASP_MULTICLIENT_HOSTS") {
            config.hosts = split_hosts(&hosts);
        }

        if let Some(timeout) = env::var("WASP_MULTICLIENT_TIMEOUT")
            .ok()
            .and_then(|v| humantime_serde::parse_duration(&v).ok())
        {
            config.timeout = timeout;
        }

        config.quorum = env::var("WASP_MULTICLIENT_QUORUM")
            .ok()
            .and_then(|v| v.trim().parse().ok());

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::NoHosts);
        }

        let mut seen = HashSet::new();
        for (index, host) in self.hosts.iter().enumerate() {
            if host.trim().is_empty() {
                return Err(ConfigError::EmptyHost(index));
            }
            if !seen.insert(host.trim()) {
                return Err(ConfigError::DuplicateHost(host.clone()));
            }
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("timeout cannot be 0".into()));
        }

        if let Some(quorum) = self.quorum {
            if quorum > self.hosts.len() {
                return Err(ConfigError::QuorumTooLarge {
                    quorum,
                    hosts: self.hosts.len(),
                });
            }
        }

        Ok(())
    }

    /// Effective quorum: the configured one, or every host.
    pub fn effective_quorum(&self) -> usize {
        self.quorum.unwrap_or(self.hosts.len())
    }
}

/// Split a comma/whitespace separated host list, dropping blanks.
pub fn split_hosts(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

/// Humantime serde module for Duration serialization
pub mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() != 0 {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        } else {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" before "s" and "m"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map_err(|_| "invalid minutes")?
                .checked_mul(60)
                .map(Duration::from_secs)
                .ok_or("minutes out of range")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
