//! Ports for the multi-client.
//!
//! Only outbound: the multi-client is itself the inbound API.

pub mod outbound;
