//! Credential exchange
//!
//! Exchanges a role identifier for a temporary credential via
//! `POST /api/v1/get_credentials`.

use tracing::{debug, warn};

use super::types::{CredentialRequest, CredentialResponse};
use super::Credential;
use crate::client::{CredentialClient, API_V1};
use crate::envelope::parse_credential_error;
use crate::error::{ApiError, Result};
use crate::platform::Method;

/// Request credentials for `role`
///
/// A 200 response without credentials is a credential retrieval error. No
/// retries are attempted here.
pub fn request_credentials<C>(client: &C, role: &str, no_ip_restrict: bool) -> Result<Credential>
where
    C: CredentialClient + ?Sized,
{
    let body = CredentialRequest {
        requested_role: role,
        no_ip_restriction: no_ip_restrict,
        metadata: client.instance_info(),
    };
    let body = serde_json::to_vec(&body).map_err(|e| ApiError::request_body(e.to_string()))?;

    let request = client.build_request(Method::Post, "/get_credentials", Some(body), API_V1)?;

    debug!(role, no_ip_restrict, "requesting role credentials");
    let response = client.execute(request)?;

    if response.status != 200 {
        return Err(parse_credential_error(&response, client.session_store()));
    }

    let parsed: CredentialResponse = response
        .json()
        .map_err(|e| ApiError::decode(e.to_string()))?;

    match parsed.credentials {
        Some(credential) => Ok(credential),
        None => {
            warn!(role, "service returned success without credentials");
            Err(ApiError::CredentialRetrieval)
        }
    }
}
