//! # Wasp Types
//!
//! Identifiers and response payloads returned by the Wasp node REST API.
//!
//! ## Design Principles
//!
//! - **Opaque payloads**: The multi-node client never inspects these beyond
//!   the receipt error check; they are passed back to the caller as-is.
//! - **Validated identifiers**: `ChainId` and `RequestId` can only be built
//!   from well-formed hex strings.

pub mod entities;
pub mod errors;
pub mod ids;

pub use entities::*;
pub use errors::*;
pub use ids::*;
