//! Host instance metadata

use chrono::{DateTime, Utc};
use std::env;
use std::fs;

use rolevend_core::creds::InstanceInfo;
use rolevend_core::platform::InstanceMetadata;

const UNKNOWN: &str = "unknown";

/// Describes the local host; `created_at` is fixed when the provider is built
#[derive(Debug, Clone)]
pub struct HostMetadata {
    started_at: DateTime<Utc>,
}

impl HostMetadata {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }
}

impl Default for HostMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceMetadata for HostMetadata {
    fn instance_info(&self) -> InstanceInfo {
        InstanceInfo {
            hostname: hostname(),
            username: first_var(&["USER", "USERNAME"]).unwrap_or_else(|| UNKNOWN.to_string()),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: self.started_at,
        }
    }
}

fn hostname() -> String {
    first_var(&["HOSTNAME", "COMPUTERNAME"])
        .or_else(|| {
            fs::read_to_string("/etc/hostname")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}
