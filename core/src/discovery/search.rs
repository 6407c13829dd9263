//! Typeahead search and the account/role lookups built on it

use tracing::debug;

use super::{get_with_query, AccountDetails, RoleDetails, SearchResult};
use crate::arn::Arn;
use crate::client::{CredentialClient, API_V1};
use crate::envelope::parse_web_error;
use crate::error::{ApiError, Result};

const ACCOUNT_SEARCH_LIMIT: usize = 1000;
const ROLE_SEARCH_LIMIT: usize = 5000;

/// Typeahead search for `query` against resources of `resource_type`
pub(crate) fn search_resources<C>(
    client: &C,
    resource_type: &str,
    query: &str,
    limit: usize,
) -> Result<Vec<SearchResult>>
where
    C: CredentialClient + ?Sized,
{
    let limit = limit.to_string();
    let response = get_with_query(
        client,
        "/policies/typeahead",
        API_V1,
        &[("search", query), ("resource", resource_type), ("limit", limit.as_str())],
    )?;
    if response.status != 200 {
        return Err(parse_web_error(&response, client.session_store()));
    }

    let results: Vec<SearchResult> = response
        .json()
        .map_err(|e| ApiError::decode(e.to_string()))?;
    debug!(resource_type, query, matches = results.len(), "typeahead search");
    Ok(results)
}

/// Accounts matching `query`
///
/// Fails on the first result whose title is not `"name (number)"`.
pub fn get_accounts<C>(client: &C, query: &str) -> Result<Vec<AccountDetails>>
where
    C: CredentialClient + ?Sized,
{
    search_resources(client, "account", query, ACCOUNT_SEARCH_LIMIT)?
        .iter()
        .map(|result| result.title.parse::<AccountDetails>())
        .collect()
}

/// Roles in `account_number` whose name starts with `query`
pub fn get_roles_in_account<C>(
    client: &C,
    query: &str,
    account_number: &str,
) -> Result<Vec<RoleDetails>>
where
    C: CredentialClient + ?Sized,
{
    let query = Arn::iam(account_number, "role", query);
    search_resources(client, "iam_arn", &query, ROLE_SEARCH_LIMIT)?
        .into_iter()
        .map(|result| -> Result<RoleDetails> {
            let arn: Arn = result.title.parse()?;
            Ok(RoleDetails {
                role_name: arn.resource_name().to_string(),
                account_id: arn.account_id,
                arn: result.title,
                ..Default::default()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockClient;
    use serde_json::json;

    #[test]
    fn test_search_resources_assembles_query() {
        let client = MockClient::with_response(200, json!([{"title": "a"}, {"title": "b"}]));
        let results = search_resources(&client, "account", "prod", 25).unwrap();
        assert_eq!(results.len(), 2);

        let request = &client.requests()[0];
        assert_eq!(request.url.path(), "/api/v1/policies/typeahead");
        assert_eq!(request.query_param("search").as_deref(), Some("prod"));
        assert_eq!(request.query_param("resource").as_deref(), Some("account"));
        assert_eq!(request.query_param("limit").as_deref(), Some("25"));
    }

    #[test]
    fn test_search_resources_web_error() {
        let client = MockClient::with_response(
            400,
            json!({"status": "error", "errors": ["resource type not supported", "try again"]}),
        );
        let err = search_resources(&client, "bogus", "x", 10).unwrap_err();
        assert_eq!(err.to_string(), "resource type not supported\ntry again");
    }

    #[test]
    fn test_search_resources_structured_codes() {
        let cases = [
            (401, json!({"code": "invalid_jwt"}), "invalid_jwt", 1),
            (403, json!({"code": "900"}), "no_matching_roles", 0),
            (400, json!({"code": 904, "errors": ["bad search"]}), "malformed_request", 0),
            (418, json!({"code": "teapot"}), "unexpected_status", 0),
        ];

        for (status, body, key, deletions) in cases {
            let client = MockClient::with_response(status, body);
            let err = get_accounts(&client, "prod").unwrap_err();
            assert_eq!(err.error_key(), key, "status {}", status);
            assert_eq!(client.session().deletions(), deletions, "status {}", status);
        }
    }

    #[test]
    fn test_search_resources_html_error_keeps_body() {
        let client = MockClient::with_raw_response(502, b"<html>Bad Gateway</html>".to_vec());
        match search_resources(&client, "account", "prod", 10).unwrap_err() {
            ApiError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "<html>Bad Gateway</html>");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_get_accounts() {
        let client = MockClient::with_response(
            200,
            json!([{"title": "Prod Account (123456789012)"}, {"title": "Dev (210987654321)"}]),
        );
        let accounts = get_accounts(&client, "").unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].account_name, "Prod Account");
        assert_eq!(accounts[0].account_number, "123456789012");
        assert_eq!(accounts[1].account_name, "Dev");

        let request = &client.requests()[0];
        assert_eq!(request.query_param("limit").as_deref(), Some("1000"));
    }

    #[test]
    fn test_get_accounts_malformed_title() {
        let client = MockClient::with_response(
            200,
            json!([{"title": "Prod Account (123456789012)"}, {"title": "Orphaned"}]),
        );
        let err = get_accounts(&client, "").unwrap_err();
        assert!(matches!(err, ApiError::MalformedAccountTitle { ref title } if title == "Orphaned"));
    }

    #[test]
    fn test_get_accounts_is_idempotent() {
        let client = MockClient::with_response(200, json!([{"title": "Prod (1)"}]));
        assert_eq!(get_accounts(&client, "p").unwrap(), get_accounts(&client, "p").unwrap());
    }

    #[test]
    fn test_get_roles_in_account() {
        let client = MockClient::with_response(
            200,
            json!([
                {"title": "arn:aws:iam::123456789012:role/prod_admin"},
                {"title": "arn:aws:iam::123456789012:role/service-role/prod_deployer"}
            ]),
        );
        let roles = get_roles_in_account(&client, "prod", "123456789012").unwrap();
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].role_name, "prod_admin");
        assert_eq!(roles[0].account_id, "123456789012");
        assert_eq!(roles[1].role_name, "prod_deployer");
        assert_eq!(
            roles[1].arn,
            "arn:aws:iam::123456789012:role/service-role/prod_deployer"
        );

        let request = &client.requests()[0];
        assert_eq!(
            request.query_param("search").as_deref(),
            Some("arn:aws:iam::123456789012:role/prod")
        );
        assert_eq!(request.query_param("resource").as_deref(), Some("iam_arn"));
        assert_eq!(request.query_param("limit").as_deref(), Some("5000"));
    }

    #[test]
    fn test_get_roles_in_account_bad_arn() {
        let client = MockClient::with_response(200, json!([{"title": "not-an-arn"}]));
        let err = get_roles_in_account(&client, "", "123456789012").unwrap_err();
        assert!(matches!(err, ApiError::MalformedArn { .. }));
    }
}
