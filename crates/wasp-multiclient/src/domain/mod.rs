//! # Domain Layer for the Multi-Client
//!
//! Pure decision logic with no I/O. The executor produces outcomes, this
//! layer judges them.
//!
//! ## Contents
//!
//! - **outcome**: `NodeOutcome`, the tagged per-node result
//! - **quorum**: `check_quorum`, the reducer
//! - **error**: `NodeError`, `QuorumError`, `MultiClientError`
//! - **config**: `MultiClientConfig` and its validation

mod config;
mod error;
mod outcome;
mod quorum;

pub use config::*;
pub use error::*;
pub use outcome::*;
pub use quorum::*;
