//! rolevend-core: Platform-agnostic credential broker logic
//!
//! This crate contains the credential exchange with the vending service, the
//! sequential role-assumption chain, response/error decoding against the
//! service's error taxonomy, and role/account discovery. It depends only on
//! abstract platform traits (Transport, RoleAssumer, SessionStore,
//! InstanceMetadata, Environment) and never performs I/O itself.

pub mod arn;
pub mod client;
pub mod config;
pub mod creds;
pub mod discovery;
pub mod envelope;
pub mod error;
pub mod platform;

#[cfg(any(test, feature = "test-util"))]
pub mod test_support;

pub use client::{Client, CredentialClient};
pub use config::Config;
pub use creds::{get_credentials_chained, Credential, InstanceInfo};
pub use error::{ApiError, Result};
