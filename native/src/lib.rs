//! rolevend-native: Host adapters for the rolevend credential broker
//!
//! Implements the rolevend-core platform traits for an ordinary host process:
//! a pooled blocking HTTP transport, an AWS STS role assumer, the on-disk
//! session cache and host metadata. [`connect`] wires them into a
//! [`Client`]; [`get_credentials`] is the one-call path from environment to
//! credential.

pub mod env;
pub mod metadata;
pub mod session;
pub mod sts;
pub mod transport;

use std::sync::Arc;
use tracing::debug;

use rolevend_core::platform::{Environment, PreflightHook};
use rolevend_core::{Client, Config, Credential, Result};

pub use env::SystemEnv;
pub use metadata::HostMetadata;
pub use session::CachedSessionFile;
pub use sts::StsRoleAssumer;
pub use transport::{ReqwestTransport, StaticHeader, TransportOptions};

/// Build a client with the default host adapters
pub fn connect(config: Config) -> Result<Client> {
    connect_with_hooks(config, Vec::new())
}

/// Build a client whose transport runs `hooks` before every request
pub fn connect_with_hooks(config: Config, hooks: Vec<Box<dyn PreflightHook>>) -> Result<Client> {
    let transport = hooks.into_iter().fold(
        ReqwestTransport::new(TransportOptions::from_config(&config))?,
        ReqwestTransport::with_hook,
    );
    let session = CachedSessionFile::default_location()?;
    debug!(service_url = %config.service_url, session = %session.path().display(), "connecting");

    Ok(Client::new(config, Arc::new(transport), Arc::new(session))?
        .with_instance_metadata(Arc::new(HostMetadata::new())))
}

/// Load configuration from the process environment, retrieve credentials for
/// `role` and assume each role in `assume_chain`
pub fn get_credentials<S: AsRef<str>>(
    role: &str,
    no_ip_restrict: bool,
    assume_chain: &[S],
) -> Result<Credential> {
    get_credentials_with_env(&SystemEnv, role, no_ip_restrict, assume_chain)
}

pub fn get_credentials_with_env<S: AsRef<str>>(
    env: &dyn Environment,
    role: &str,
    no_ip_restrict: bool,
    assume_chain: &[S],
) -> Result<Credential> {
    let config = Config::from_env(env)?;
    let assumer = StsRoleAssumer::from_config(&config)?;
    let client = connect(config)?;
    client.get_credentials(&assumer, role, no_ip_restrict, assume_chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolevend_core::ApiError;
    use std::collections::HashMap;

    struct MapEnv(HashMap<&'static str, String>);

    impl Environment for MapEnv {
        fn get_var(&self, name: &str) -> Result<String> {
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| ApiError::config(format!("variable '{}' not found", name)))
        }
    }

    #[test]
    fn test_get_credentials_requires_service_url() {
        let env = MapEnv(HashMap::new());
        let err = get_credentials_with_env(&env, "prod_admin", false, &[] as &[&str]).unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: ROLEVEND_URL not configured");
    }

    #[test]
    fn test_connect_rejects_empty_hostname() {
        let config = Config {
            service_url: "  ".to_string(),
            ..Config::new("https://creds.example.com").unwrap()
        };
        assert!(matches!(connect(config), Err(ApiError::Config { .. })));
    }
}
