//! Console URL resolution and generic envelope requests

use std::collections::HashMap;

use super::get_with_query;
use crate::client::{CredentialClient, API_V2};
use crate::envelope::{parse_web_error, Envelope};
use crate::error::Result;
use crate::platform::{HttpResponse, Method};

/// Console URL for `arn`, prefixed with `web_url`
pub fn get_resource_url<C>(client: &C, web_url: &str, arn: &str) -> Result<String>
where
    C: CredentialClient + ?Sized,
{
    let response = get_with_query(client, "/get_resource_url", API_V2, &[("arn", arn)])?;
    let envelope = decode_envelope(client, &response)?;
    let path: String = envelope.sub_document("url")?;
    Ok(format!("{}{}", web_url.trim_end_matches('/'), path))
}

/// GET `<api_prefix><resource>` and return the envelope's `data` map
pub fn generic_get<C>(
    client: &C,
    resource: &str,
    api_prefix: &str,
) -> Result<HashMap<String, serde_json::Value>>
where
    C: CredentialClient + ?Sized,
{
    let request = client.build_request(Method::Get, resource, None, api_prefix)?;
    let response = client.execute(request)?;
    Ok(decode_envelope(client, &response)?.into_data())
}

/// POST `body` to `<api_prefix><resource>` and return the envelope's `data` map
pub fn generic_post<C>(
    client: &C,
    resource: &str,
    api_prefix: &str,
    body: Vec<u8>,
) -> Result<HashMap<String, serde_json::Value>>
where
    C: CredentialClient + ?Sized,
{
    let request = client.build_request(Method::Post, resource, Some(body), api_prefix)?;
    let response = client.execute(request)?;
    Ok(decode_envelope(client, &response)?.into_data())
}

fn decode_envelope<C>(client: &C, response: &HttpResponse) -> Result<Envelope>
where
    C: CredentialClient + ?Sized,
{
    if response.status != 200 {
        return Err(parse_web_error(response, client.session_store()));
    }
    Envelope::from_slice(&response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::test_support::MockClient;
    use serde_json::json;

    const ARN: &str = "arn:aws:iam::123456789012:role/prod_admin";

    #[test]
    fn test_get_resource_url() {
        let client = MockClient::with_response(
            200,
            json!({"status": "success", "data": {"url": "/policies/edit/123456789012/iamrole/prod_admin"}}),
        );
        let url = get_resource_url(&client, "https://console.example.com/", ARN).unwrap();
        assert_eq!(
            url,
            "https://console.example.com/policies/edit/123456789012/iamrole/prod_admin"
        );

        let request = &client.requests()[0];
        assert_eq!(request.url.path(), "/api/v2/get_resource_url");
        assert_eq!(request.query_param("arn").as_deref(), Some(ARN));
    }

    #[test]
    fn test_get_resource_url_wrong_type() {
        let client = MockClient::with_response(200, json!({"data": {"url": 42}}));
        let err = get_resource_url(&client, "https://console.example.com", ARN).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedResponseType { .. }));
    }

    #[test]
    fn test_get_resource_url_error_lines() {
        let client = MockClient::with_response(
            404,
            json!({"status": "error", "errors": ["Unable to find resource"]}),
        );
        let err = get_resource_url(&client, "https://console.example.com", ARN).unwrap_err();
        assert_eq!(err.to_string(), "Unable to find resource");
    }

    #[test]
    fn test_get_resource_url_structured_codes() {
        let cases = [
            (401, json!({"code": "invalid_jwt"}), "invalid_jwt", 1),
            (403, json!({"code": "900"}), "no_matching_roles", 0),
            (400, json!({"code": "899"}), "invalid_arn", 0),
            (500, json!({"status": "error"}), "unexpected_status", 0),
        ];

        for (status, body, key, deletions) in cases {
            let client = MockClient::with_response(status, body);
            let err = get_resource_url(&client, "https://console.example.com", ARN).unwrap_err();
            assert_eq!(err.error_key(), key, "status {}", status);
            assert_eq!(client.session().deletions(), deletions, "status {}", status);
        }
    }

    #[test]
    fn test_generic_get_structured_codes() {
        let cases = [
            (401, json!({"code": "invalid_jwt"}), "invalid_jwt", 1),
            (409, json!({"code": "901"}), "multiple_matching_roles", 0),
            (400, json!({"errors": ["unknown resource"]}), "service_error", 0),
        ];

        for (status, body, key, deletions) in cases {
            let client = MockClient::with_response(status, body);
            let err = generic_get(&client, "/user_profile", API_V2).unwrap_err();
            assert_eq!(err.error_key(), key, "status {}", status);
            assert_eq!(client.session().deletions(), deletions, "status {}", status);
        }
    }

    #[test]
    fn test_generic_post_html_error_keeps_status() {
        let client = MockClient::with_raw_response(502, b"<html>Bad Gateway</html>".to_vec());
        let err = generic_post(&client, "/request", API_V2, b"{}".to_vec()).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatus { status: 502, .. }));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_generic_get_returns_data() {
        let client = MockClient::new(vec![(
            "/api/v2/user_profile".to_string(),
            200,
            json!({"data": {"user": "alice", "groups": ["a", "b"]}}),
        )]);
        let data = generic_get(&client, "/user_profile", API_V2).unwrap();
        assert_eq!(data["user"], "alice");
        assert_eq!(data["groups"], json!(["a", "b"]));
    }

    #[test]
    fn test_generic_post_sends_body() {
        let client = MockClient::with_response(200, json!({"data": {}}));
        let data = generic_post(&client, "/request", API_V2, b"{\"x\":1}".to_vec()).unwrap();
        assert!(data.is_empty());

        let request = &client.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body.as_deref(), Some(&b"{\"x\":1}"[..]));
    }
}
