//! wasp-multi: run one node API call against every node of a committee.
//!
//! The binary is a thin shell over `wasp_multiclient::MultiClient`; argument
//! parsing, config merging and output formatting live here so they can be
//! tested without a network.

pub mod cli;
pub mod logging;
pub mod output;
