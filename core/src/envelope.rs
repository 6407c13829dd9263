//! Response envelope decoding
//!
//! Non-credential endpoints wrap their payload in `{data, status, errors}`.
//! Callers pull named sub-documents out of `data` and decode them a second
//! time into the endpoint-specific shape.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{error, warn};

use crate::error::{ApiError, Result, ServiceCode};
use crate::platform::{HttpResponse, SessionStore};

/// Generic service response envelope
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    data: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Envelope {
    /// Decode a response body into an envelope
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| ApiError::decode(e.to_string()))
    }

    /// All named sub-documents
    pub fn into_data(self) -> HashMap<String, serde_json::Value> {
        self.data.unwrap_or_default()
    }

    /// Decode the sub-document `name` into `T`
    ///
    /// A missing or differently shaped sub-document is an unexpected response
    /// type, never a default value.
    pub fn sub_document<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .data
            .as_ref()
            .and_then(|data| data.get(name))
            .ok_or_else(|| {
                ApiError::unexpected_response_type(format!("response has no data.{}", name))
            })?;

        T::deserialize(value).map_err(|e| {
            warn!(document = name, error = %e, "unexpected response shape");
            ApiError::unexpected_response_type(format!("data.{}: {}", name, e))
        })
    }
}

/// Error body of a non-200 response: a structured `code`, error strings, or both
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

impl ErrorBody {
    fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    fn service_code(&self) -> Option<ServiceCode> {
        match self.code.as_ref()? {
            serde_json::Value::String(s) => ServiceCode::lookup(s),
            serde_json::Value::Number(n) => ServiceCode::lookup(&n.to_string()),
            _ => None,
        }
    }
}

/// Map a non-200 response from an envelope endpoint to a descriptive error
///
/// A known structured code wins, then the server's error strings joined one
/// per line. Anything else keeps the raw status and body.
pub fn parse_web_error(response: &HttpResponse, session: &dyn SessionStore) -> ApiError {
    let body = ErrorBody::parse(&response.body);

    if let Some(kind) = body.service_code() {
        return service_error(kind, session);
    }

    match body.errors {
        Some(errors) if !errors.is_empty() => {
            ApiError::service(response.status, errors.join("\n"))
        }
        _ => ApiError::unexpected_status(response.status, &response.body),
    }
}

/// Map a non-200 response with a structured `{code}` body to the error taxonomy
///
/// An `invalid_jwt` code deletes the locally cached session before returning.
pub fn parse_credential_error(response: &HttpResponse, session: &dyn SessionStore) -> ApiError {
    match ErrorBody::parse(&response.body).service_code() {
        Some(kind) => service_error(kind, session),
        None => ApiError::unexpected_status(response.status, &response.body),
    }
}

fn service_error(kind: ServiceCode, session: &dyn SessionStore) -> ApiError {
    if kind == ServiceCode::InvalidJwt {
        error!("authentication is invalid or has expired, removing cached session");
        if let Err(e) = session.delete_local_session() {
            error!(error = %e, "failed to delete cached session");
        }
    }

    kind.into()
}
