//! # Wasp Multi-Client
//!
//! Sends the same logical operation to every node of a Wasp committee in
//! parallel and reduces the per-node outcomes into one quorum decision.
//!
//! ## Architecture Role
//!
//! ```text
//! [Caller / CLI] ──operation──→ [MultiClient]
//!                                    │
//!                                    ↓ fan_out (one task per node, shared deadline)
//!                        ┌───────────┼───────────┐
//!                        ↓           ↓           ↓
//!                    [Node 0]    [Node 1]    [Node 2] ...
//!                        │           │           │
//!                        └───────────┼───────────┘
//!                                    ↓ Vec<NodeOutcome<T>> (index-aligned)
//!                             [check_quorum]
//!                                    ↓
//!                        Result<_, MultiClientError>
//! ```
//!
//! ## Guarantees
//!
//! - `outcomes[i]` always belongs to `nodes[i]`, whatever the completion order.
//! - A node that misses the deadline yields `NodeOutcome::TimedOut` and its
//!   task is aborted; other nodes are unaffected.
//! - The deadline is a per-call argument, so one `MultiClient` can be shared
//!   by concurrent callers.
//! - The callback runs exactly once per node per call; failures are tolerated
//!   through the quorum, never retried.

pub mod adapters;
pub mod domain;
pub mod executor;
pub mod operations;
pub mod ports;
pub mod service;

pub use domain::*;
pub use executor::fan_out;
pub use ports::outbound::NodeClient;
pub use service::MultiClient;

#[cfg(feature = "http")]
pub use adapters::http::{HttpClientConfig, HttpNodeClient};
