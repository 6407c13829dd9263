//! Platform abstraction traits
//!
//! These traits define the boundary between the credential protocol and the
//! host that supplies the authenticated network session, the role-assumption
//! primitive, and local session state.

use serde::de::DeserializeOwned;
use url::Url;

use crate::creds::{Credential, InstanceInfo};
use crate::error::Result;

/// HTTP methods used against the credential service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Outbound request assembled by the request builder
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing value with the same name
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }

    /// Replace the query string with the given form-encoded pairs
    pub fn set_query(&mut self, pairs: &[(&str, &str)]) {
        self.url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    /// Query parameter value by name
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// HTTP response from an outbound request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Parse body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Hook run against every request before the builder hands it back
///
/// Used by authenticated transports to refresh or attach session material.
pub trait PreflightHook: Send + Sync {
    fn run(&self, request: &mut HttpRequest) -> Result<()>;
}

/// Authenticated request executor over a pooled connection
///
/// Implementations must be safe for concurrent use.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Release idle pooled connections without disturbing in-flight requests
    fn close_idle_connections(&self);

    /// Run the transport's pre-flight hooks, in order, stopping at the first failure
    fn preflight(&self, _request: &mut HttpRequest) -> Result<()> {
        Ok(())
    }
}

/// Assume `role_arn` using `identity` as the calling credential
pub trait RoleAssumer: Send + Sync {
    fn assume_role(&self, identity: &Credential, role_arn: &str) -> Result<Credential>;
}

/// Locally cached authentication session
pub trait SessionStore: Send + Sync {
    fn delete_local_session(&self) -> Result<()>;
}

/// Source of the instance-identity snapshot attached to credential requests
pub trait InstanceMetadata: Send + Sync {
    fn instance_info(&self) -> InstanceInfo;
}

/// Environment variable access
pub trait Environment {
    fn get_var(&self, name: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest::new(
            Method::Get,
            Url::parse("https://creds.example.com/api/v1/policies/typeahead").unwrap(),
        )
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut req = request();
        req.set_header("Content-Type", "text/plain");
        req.set_header("content-type", "application/json");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_set_query_encodes_pairs() {
        let mut req = request();
        req.set_query(&[("search", "arn:aws:iam::1:role/a b"), ("limit", "5")]);
        assert_eq!(
            req.query_param("search").as_deref(),
            Some("arn:aws:iam::1:role/a b")
        );
        assert_eq!(req.query_param("limit").as_deref(), Some("5"));
        assert!(req.url.as_str().contains("a+b"));
    }
}
