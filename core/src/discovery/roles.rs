//! Eligible role listing

use serde::Deserialize;

use super::{get_with_query, RoleDetails, RoleReference};
use crate::client::{CredentialClient, API_V2};
use crate::envelope::{parse_credential_error, Envelope};
use crate::error::{ApiError, Result};

#[derive(Deserialize)]
struct RolesResponse {
    #[serde(default)]
    data: RolesData,
}

#[derive(Default, Deserialize)]
struct RolesData {
    #[serde(default)]
    roles: Vec<RoleReference>,
}

/// All roles the caller is eligible for
pub fn roles<C>(client: &C) -> Result<Vec<RoleReference>>
where
    C: CredentialClient + ?Sized,
{
    let response = get_with_query(client, "/get_roles", API_V2, &[("all", "true")])?;
    if response.status != 200 {
        return Err(parse_credential_error(&response, client.session_store()));
    }

    let parsed: RolesResponse = response
        .json()
        .map_err(|e| ApiError::decode(e.to_string()))?;
    Ok(parsed.data.roles)
}

/// All eligible roles with account and application details
pub fn roles_extended<C>(client: &C) -> Result<Vec<RoleDetails>>
where
    C: CredentialClient + ?Sized,
{
    let response = get_with_query(client, "/get_roles", API_V2, &[("all", "true")])?;
    if response.status != 200 {
        return Err(parse_credential_error(&response, client.session_store()));
    }

    Envelope::from_slice(&response.body)?.sub_document("roles")
}
