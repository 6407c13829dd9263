//! Mock implementations of the client capability set and platform traits for testing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::client::{standard_request, CredentialClient};
use crate::creds::{Credential, InstanceInfo};
use crate::error::{ApiError, Result};
use crate::platform::{
    HttpRequest, HttpResponse, Method, PreflightHook, RoleAssumer, SessionStore, Transport,
};

/// Base URL requests from the mock client are built against
pub const MOCK_BASE_URL: &str = "https://rolevend.test";

/// Canned responses matched by URL substring, first match wins
struct CannedResponses(Vec<(String, HttpResponse)>);

impl CannedResponses {
    fn lookup(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.0
            .iter()
            .find(|(pattern, _)| request.url.as_str().contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| {
                ApiError::upstream_error(format!(
                    "no mock response for {} {}",
                    request.method.as_str(),
                    request.url
                ))
            })
    }
}

fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string().into_bytes(),
    }
}

/// Network-free client with pre-configured responses
pub struct MockClient {
    responses: CannedResponses,
    requests: Mutex<Vec<HttpRequest>>,
    session: MockSessionStore,
    instance_info: Option<InstanceInfo>,
}

impl MockClient {
    /// Responses keyed by a URL substring
    pub fn new(responses: Vec<(String, u16, serde_json::Value)>) -> Self {
        let responses = responses
            .into_iter()
            .map(|(pattern, status, body)| (pattern, json_response(status, body)))
            .collect();
        Self::from_responses(responses)
    }

    /// Answer every request with the same JSON body
    pub fn with_response(status: u16, body: serde_json::Value) -> Self {
        Self::from_responses(vec![(String::new(), json_response(status, body))])
    }

    /// Answer every request with the same raw body
    pub fn with_raw_response(status: u16, body: Vec<u8>) -> Self {
        Self::from_responses(vec![(String::new(), HttpResponse { status, body })])
    }

    fn from_responses(responses: Vec<(String, HttpResponse)>) -> Self {
        Self {
            responses: CannedResponses(responses),
            requests: Mutex::new(Vec::new()),
            session: MockSessionStore::new(),
            instance_info: None,
        }
    }

    pub fn with_instance_info(mut self, info: InstanceInfo) -> Self {
        self.instance_info = Some(info);
        self
    }

    /// Requests executed so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn session(&self) -> &MockSessionStore {
        &self.session
    }
}

impl CredentialClient for MockClient {
    fn build_request(
        &self,
        method: Method,
        resource: &str,
        body: Option<Vec<u8>>,
        api_prefix: &str,
    ) -> Result<HttpRequest> {
        standard_request(MOCK_BASE_URL, method, resource, body, api_prefix)
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self.responses.lookup(&request);
        self.requests.lock().unwrap().push(request);
        response
    }

    fn close_idle_connections(&self) {}

    fn session_store(&self) -> &dyn SessionStore {
        &self.session
    }

    fn instance_info(&self) -> Option<InstanceInfo> {
        self.instance_info.clone()
    }
}

/// Mock transport with pre-configured responses and call counters
pub struct MockTransport {
    responses: CannedResponses,
    hooks: Vec<Box<dyn PreflightHook>>,
    preflight_runs: AtomicUsize,
    executed: AtomicUsize,
    idle_closes: AtomicUsize,
}

impl MockTransport {
    pub fn new(responses: Vec<(String, u16, serde_json::Value)>) -> Self {
        Self {
            responses: CannedResponses(
                responses
                    .into_iter()
                    .map(|(pattern, status, body)| (pattern, json_response(status, body)))
                    .collect(),
            ),
            hooks: Vec::new(),
            preflight_runs: AtomicUsize::new(0),
            executed: AtomicUsize::new(0),
            idle_closes: AtomicUsize::new(0),
        }
    }

    /// Add a pre-flight hook that sets a header
    pub fn with_preflight_header(mut self, name: &str, value: &str) -> Self {
        self.hooks.push(Box::new(SetHeader(name.to_string(), value.to_string())));
        self
    }

    /// Add a pre-flight hook that always fails
    pub fn with_failing_preflight(mut self) -> Self {
        self.hooks.push(Box::new(FailingHook));
        self
    }

    pub fn preflight_runs(&self) -> usize {
        self.preflight_runs.load(Ordering::SeqCst)
    }

    pub fn executed(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }

    pub fn idle_closes(&self) -> usize {
        self.idle_closes.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.executed.fetch_add(1, Ordering::SeqCst);
        self.responses.lookup(&request)
    }

    fn close_idle_connections(&self) {
        self.idle_closes.fetch_add(1, Ordering::SeqCst);
    }

    fn preflight(&self, request: &mut HttpRequest) -> Result<()> {
        self.preflight_runs.fetch_add(1, Ordering::SeqCst);
        self.hooks.iter().try_for_each(|hook| hook.run(request))
    }
}

struct SetHeader(String, String);

impl PreflightHook for SetHeader {
    fn run(&self, request: &mut HttpRequest) -> Result<()> {
        request.set_header(&self.0, self.1.clone());
        Ok(())
    }
}

struct FailingHook;

impl PreflightHook for FailingHook {
    fn run(&self, _request: &mut HttpRequest) -> Result<()> {
        Err(ApiError::internal("session refresh failed"))
    }
}

/// Session store that counts deletions
pub struct MockSessionStore {
    deletions: AtomicUsize,
    fail: bool,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self {
            deletions: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// Store whose deletions always fail
    pub fn failing() -> Self {
        Self {
            deletions: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn deletions(&self) -> usize {
        self.deletions.load(Ordering::SeqCst)
    }
}

impl Default for MockSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MockSessionStore {
    fn delete_local_session(&self) -> Result<()> {
        self.deletions.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ApiError::internal("permission denied"));
        }
        Ok(())
    }
}

/// Role assumer that records each hop and derives `AK<n>`/`SK<n>`/`TOK<n>` for hop `n`
pub struct MockRoleAssumer {
    fail_on: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockRoleAssumer {
    pub fn new() -> Self {
        Self {
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail when asked to assume `arn`
    pub fn failing_on(mut self, arn: &str) -> Self {
        self.fail_on = Some(arn.to_string());
        self
    }

    /// `(calling access key, target role ARN)` per hop, in order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockRoleAssumer {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleAssumer for MockRoleAssumer {
    fn assume_role(&self, identity: &Credential, role_arn: &str) -> Result<Credential> {
        let hop = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((identity.access_key_id().to_string(), role_arn.to_string()));
            calls.len()
        };

        if self.fail_on.as_deref() == Some(role_arn) {
            return Err(ApiError::upstream_error(format!(
                "AccessDenied: not authorized to assume {}",
                role_arn
            )));
        }

        Ok(Credential::new(
            format!("AK{}", hop),
            format!("SK{}", hop),
            format!("TOK{}", hop),
        )
        .with_role_arn(role_arn))
    }
}
