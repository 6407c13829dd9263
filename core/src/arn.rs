//! Amazon Resource Name parsing

use std::str::FromStr;

use crate::error::ApiError;

/// Parsed `arn:<partition>:<service>:<region>:<account>:<resource>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    /// Leading resource segment, e.g. `role`; empty for untyped resources
    pub resource_type: String,
    /// Everything after the resource type, including any path
    pub resource: String,
}

impl Arn {
    /// IAM ARN for `resource_type/resource` in `account_id`
    pub fn iam(account_id: &str, resource_type: &str, resource: &str) -> String {
        format!("arn:aws:iam::{}:{}/{}", account_id, resource_type, resource)
    }

    /// Last path segment of the resource (the role name for IAM roles)
    pub fn resource_name(&self) -> &str {
        self.resource.rsplit('/').next().unwrap_or(&self.resource)
    }
}

impl FromStr for Arn {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(6, ':').collect();
        if parts.len() != 6 {
            return Err(ApiError::malformed_arn(s, "expected six ':'-separated sections"));
        }
        if parts[0] != "arn" {
            return Err(ApiError::malformed_arn(s, "must start with 'arn:'"));
        }
        if parts[1].is_empty() || parts[2].is_empty() {
            return Err(ApiError::malformed_arn(s, "partition and service are required"));
        }

        let (resource_type, resource) = match parts[5].split_once('/') {
            Some((kind, rest)) => (kind, rest),
            None => match parts[5].split_once(':') {
                Some((kind, rest)) => (kind, rest),
                None => ("", parts[5]),
            },
        };
        if resource.is_empty() {
            return Err(ApiError::malformed_arn(s, "resource is required"));
        }

        Ok(Self {
            partition: parts[1].to_string(),
            service: parts[2].to_string(),
            region: parts[3].to_string(),
            account_id: parts[4].to_string(),
            resource_type: resource_type.to_string(),
            resource: resource.to_string(),
        })
    }
}
