//! Process environment

use rolevend_core::error::{ApiError, Result};
use rolevend_core::platform::Environment;

/// Reads configuration from the process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn get_var(&self, name: &str) -> Result<String> {
        std::env::var(name)
            .map_err(|e| ApiError::config(format!("variable '{}': {}", name, e)))
    }
}
