//! Client configuration

use crate::error::{ApiError, Result};
use crate::platform::Environment;

/// Default transport dial timeout
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default region for STS role-assumption hops
pub const DEFAULT_REGION: &str = "us-east-1";

/// Client configuration loaded from environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the credential service (e.g., "https://creds.example.com")
    pub service_url: String,
    /// Base URL prepended to console resource paths
    pub web_url: String,
    /// Attach an instance-identity snapshot to credential requests
    pub metadata_enabled: bool,
    /// Transport dial timeout in seconds
    pub http_timeout_secs: u64,
    /// Region used by the role assumer
    pub region: String,
}

impl Config {
    /// Configuration with defaults for everything but the service URL
    pub fn new(service_url: impl Into<String>) -> Result<Self> {
        let service_url = service_url.into();
        if service_url.trim().is_empty() {
            return Err(ApiError::config("hostname cannot be empty string"));
        }

        Ok(Self {
            web_url: service_url.clone(),
            service_url,
            metadata_enabled: false,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            region: DEFAULT_REGION.to_string(),
        })
    }

    /// Load configuration from platform environment
    pub fn from_env(env: &dyn Environment) -> Result<Self> {
        let service_url = env
            .get_var("ROLEVEND_URL")
            .map_err(|_| ApiError::config("ROLEVEND_URL not configured"))?;
        let mut config = Self::new(service_url)?;

        if let Some(web_url) = optional(env, "ROLEVEND_WEB_URL") {
            config.web_url = web_url;
        }

        if let Some(flag) = optional(env, "ROLEVEND_METADATA") {
            config.metadata_enabled = parse_flag("ROLEVEND_METADATA", &flag)?;
        }

        if let Some(timeout) = optional(env, "ROLEVEND_HTTP_TIMEOUT") {
            config.http_timeout_secs = timeout.trim().parse().map_err(|_| {
                ApiError::config(format!(
                    "ROLEVEND_HTTP_TIMEOUT must be a number of seconds, got '{}'",
                    timeout
                ))
            })?;
        }

        if let Some(region) = optional(env, "ROLEVEND_REGION") {
            config.region = region;
        }

        Ok(config)
    }
}

fn optional(env: &dyn Environment, name: &str) -> Option<String> {
    env.get_var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ApiError::config(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapEnv(HashMap<&'static str, &'static str>);

    impl Environment for MapEnv {
        fn get_var(&self, name: &str) -> Result<String> {
            self.0
                .get(name)
                .map(|v| v.to_string())
                .ok_or_else(|| ApiError::config(format!("variable '{}' not found", name)))
        }
    }

    #[test]
    fn test_from_env_defaults() {
        let env = MapEnv([("ROLEVEND_URL", "https://creds.example.com")].into());
        let config = Config::from_env(&env).unwrap();
        assert_eq!(config.service_url, "https://creds.example.com");
        assert_eq!(config.web_url, "https://creds.example.com");
        assert!(!config.metadata_enabled);
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(config.region, DEFAULT_REGION);
    }

    #[test]
    fn test_from_env_overrides() {
        let env = MapEnv(
            [
                ("ROLEVEND_URL", "https://creds.example.com"),
                ("ROLEVEND_WEB_URL", "https://console.example.com"),
                ("ROLEVEND_METADATA", "true"),
                ("ROLEVEND_HTTP_TIMEOUT", "30"),
                ("ROLEVEND_REGION", "eu-west-1"),
            ]
            .into(),
        );
        let config = Config::from_env(&env).unwrap();
        assert_eq!(config.web_url, "https://console.example.com");
        assert!(config.metadata_enabled);
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.region, "eu-west-1");
    }

    #[test]
    fn test_from_env_missing_url() {
        let env = MapEnv(HashMap::new());
        let err = Config::from_env(&env).unwrap_err();
        assert!(err.to_string().contains("ROLEVEND_URL"));
    }

    #[test]
    fn test_empty_hostname_rejected() {
        let err = Config::new("  ").unwrap_err();
        assert!(err.to_string().contains("hostname cannot be empty"));
    }

    #[test]
    fn test_invalid_flag_and_timeout() {
        let env = MapEnv(
            [
                ("ROLEVEND_URL", "https://creds.example.com"),
                ("ROLEVEND_METADATA", "maybe"),
            ]
            .into(),
        );
        assert!(Config::from_env(&env).is_err());

        let env = MapEnv(
            [
                ("ROLEVEND_URL", "https://creds.example.com"),
                ("ROLEVEND_HTTP_TIMEOUT", "ten"),
            ]
            .into(),
        );
        assert!(Config::from_env(&env).is_err());
    }
}
