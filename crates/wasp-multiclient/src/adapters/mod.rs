//! Adapters implementing the outbound ports.

#[cfg(feature = "http")]
pub mod http;
