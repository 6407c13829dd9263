//! Credential service client
//!
//! `CredentialClient` is the capability set shared by the real client and the
//! test double: build a request, execute it, release idle connections, and
//! retrieve role credentials on top of those.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::creds::{self, Credential, InstanceInfo};
use crate::discovery::{self, AccountDetails, RoleDetails, RoleReference};
use crate::error::{ApiError, Result};
use crate::platform::{
    HttpRequest, HttpResponse, InstanceMetadata, Method, RoleAssumer, SessionStore, Transport,
};

/// Client identification header value
pub const USER_AGENT: &str = concat!("rolevend/", env!("CARGO_PKG_VERSION"));

/// API prefix of the credential exchange and typeahead endpoints
pub const API_V1: &str = "/api/v1";

/// API prefix of the role listing and resource URL endpoints
pub const API_V2: &str = "/api/v2";

/// Operations every credential service client provides
pub trait CredentialClient: Send + Sync {
    /// Build a request for `<api_prefix><resource>` with the standard headers
    /// and pre-flight hooks applied
    fn build_request(
        &self,
        method: Method,
        resource: &str,
        body: Option<Vec<u8>>,
        api_prefix: &str,
    ) -> Result<HttpRequest>;

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    fn close_idle_connections(&self);

    /// Cached session to drop when the service reports an invalid session
    fn session_store(&self) -> &dyn SessionStore;

    /// Instance-identity snapshot to send with credential requests, if enabled
    fn instance_info(&self) -> Option<InstanceInfo> {
        None
    }

    fn get_role_credentials(&self, role: &str, no_ip_restrict: bool) -> Result<Credential> {
        creds::request_credentials(self, role, no_ip_restrict)
    }
}

/// Build a request against `base_url` with the standard headers set
pub fn standard_request(
    base_url: &str,
    method: Method,
    resource: &str,
    body: Option<Vec<u8>>,
    api_prefix: &str,
) -> Result<HttpRequest> {
    let raw = format!("{}{}{}", base_url.trim_end_matches('/'), api_prefix, resource);
    let url = Url::parse(&raw)
        .map_err(|e| ApiError::build_request(format!("invalid URL '{}': {}", raw, e)))?;

    let mut request = HttpRequest::new(method, url);
    request.set_header("User-Agent", USER_AGENT);
    request.set_header("Content-Type", "application/json");
    request.body = body;
    Ok(request)
}

/// Client for a credential service over an authenticated transport
pub struct Client {
    config: Config,
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    metadata: Option<Arc<dyn InstanceMetadata>>,
}

impl Client {
    pub fn new(
        config: Config,
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        if config.service_url.trim().is_empty() {
            return Err(ApiError::config("hostname cannot be empty string"));
        }

        Ok(Self {
            config,
            transport,
            session,
            metadata: None,
        })
    }

    /// Provider consulted when `metadata_enabled` is set
    pub fn with_instance_metadata(mut self, provider: Arc<dyn InstanceMetadata>) -> Self {
        self.metadata = Some(provider);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Retrieve credentials for `role` and then assume each role in `assume_chain`, in order
    pub fn get_credentials<S: AsRef<str>>(
        &self,
        assumer: &dyn RoleAssumer,
        role: &str,
        no_ip_restrict: bool,
        assume_chain: &[S],
    ) -> Result<Credential> {
        creds::get_credentials_chained(self, assumer, role, no_ip_restrict, assume_chain)
    }

    pub fn roles(&self) -> Result<Vec<RoleReference>> {
        discovery::roles(self)
    }

    pub fn roles_extended(&self) -> Result<Vec<RoleDetails>> {
        discovery::roles_extended(self)
    }

    pub fn get_resource_url(&self, arn: &str) -> Result<String> {
        discovery::get_resource_url(self, &self.config.web_url, arn)
    }

    pub fn get_accounts(&self, query: &str) -> Result<Vec<AccountDetails>> {
        discovery::get_accounts(self, query)
    }

    pub fn get_roles_in_account(
        &self,
        query: &str,
        account_number: &str,
    ) -> Result<Vec<RoleDetails>> {
        discovery::get_roles_in_account(self, query, account_number)
    }

    pub fn generic_get(
        &self,
        resource: &str,
        api_prefix: &str,
    ) -> Result<HashMap<String, serde_json::Value>> {
        discovery::generic_get(self, resource, api_prefix)
    }

    pub fn generic_post(
        &self,
        resource: &str,
        api_prefix: &str,
        body: Vec<u8>,
    ) -> Result<HashMap<String, serde_json::Value>> {
        discovery::generic_post(self, resource, api_prefix, body)
    }
}

impl CredentialClient for Client {
    fn build_request(
        &self,
        method: Method,
        resource: &str,
        body: Option<Vec<u8>>,
        api_prefix: &str,
    ) -> Result<HttpRequest> {
        let mut request =
            standard_request(&self.config.service_url, method, resource, body, api_prefix)?;
        self.transport
            .preflight(&mut request)
            .map_err(|e| ApiError::build_request(e.to_string()))?;
        Ok(request)
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        self.transport.execute(request)
    }

    fn close_idle_connections(&self) {
        self.transport.close_idle_connections();
    }

    fn session_store(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    fn instance_info(&self) -> Option<InstanceInfo> {
        if !self.config.metadata_enabled {
            return None;
        }
        self.metadata.as_ref().map(|provider| provider.instance_info())
    }
}
