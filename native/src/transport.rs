//! reqwest-based authenticated transport
//!
//! Blocking client over a shared connection pool. Pool settings are fixed at
//! construction. Closing idle connections swaps in a fresh pool; requests
//! already in flight keep the previous pool alive until they finish.

use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, warn};

use rolevend_core::config::{Config, DEFAULT_HTTP_TIMEOUT_SECS};
use rolevend_core::error::{ApiError, Result};
use rolevend_core::platform::{HttpRequest, HttpResponse, Method, PreflightHook, Transport};

/// Connection pool settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Dial timeout
    pub connect_timeout: Duration,
    /// How long an idle pooled connection is kept
    pub pool_idle_timeout: Duration,
    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,
    pub tcp_keepalive: Duration,
}

impl TransportOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            connect_timeout: Duration::from_secs(config.http_timeout_secs),
            ..Self::default()
        }
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            connect_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: parallelism + 1,
            tcp_keepalive: Duration::from_secs(30),
        }
    }
}

/// Pooled blocking HTTP transport with pre-flight hooks
///
/// Must not be constructed or used from inside an async runtime.
pub struct ReqwestTransport {
    options: TransportOptions,
    client: RwLock<reqwest::blocking::Client>,
    hooks: Vec<Box<dyn PreflightHook>>,
}

impl ReqwestTransport {
    pub fn new(options: TransportOptions) -> Result<Self> {
        let client = build_client(&options)?;
        Ok(Self {
            options,
            client: RwLock::new(client),
            hooks: Vec::new(),
        })
    }

    /// Append a hook to the pre-flight chain
    pub fn with_hook(mut self, hook: Box<dyn PreflightHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    fn current(&self) -> reqwest::blocking::Client {
        match self.client.read() {
            Ok(client) => client.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

fn build_client(options: &TransportOptions) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .connect_timeout(options.connect_timeout)
        .pool_idle_timeout(options.pool_idle_timeout)
        .pool_max_idle_per_host(options.pool_max_idle_per_host)
        .tcp_keepalive(options.tcp_keepalive)
        .timeout(None)
        .build()
        .map_err(|e| ApiError::internal(format!("failed to build HTTP client: {}", e)))
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.current().request(method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| ApiError::read_body(e.to_string()))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }

    fn close_idle_connections(&self) {
        let fresh = match build_client(&self.options) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "keeping existing connection pool");
                return;
            }
        };

        match self.client.write() {
            Ok(mut client) => *client = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
        debug!("idle connections released");
    }

    fn preflight(&self, request: &mut HttpRequest) -> Result<()> {
        self.hooks.iter().try_for_each(|hook| hook.run(request))
    }
}

/// Pre-flight hook that sets a fixed header, e.g. a session cookie or bearer token
pub struct StaticHeader {
    name: String,
    value: String,
}

impl StaticHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl PreflightHook for StaticHeader {
    fn run(&self, request: &mut HttpRequest) -> Result<()> {
        request.set_header(&self.name, self.value.clone());
        Ok(())
    }
}
