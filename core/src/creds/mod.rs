//! Credential retrieval module
//!
//! Single-hop credential exchange against the service and the sequential
//! role-assumption chain built on top of it.

pub mod chain;
pub mod exchange;
mod types;

pub use chain::get_credentials_chained;
pub use exchange::request_credentials;
pub use types::{Credential, InstanceInfo};
