//! Discovery result types

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::ApiError;

/// Role the caller is eligible for; identity is the ARN alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleReference {
    pub arn: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub account_friendly_name: String,
    #[serde(default)]
    pub role_name: String,
}

impl PartialEq for RoleReference {
    fn eq(&self, other: &Self) -> bool {
        self.arn == other.arn
    }
}

impl Eq for RoleReference {}

impl Hash for RoleReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arn.hash(state);
    }
}

/// Role with account and application details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDetails {
    pub arn: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub account_friendly_name: String,
    #[serde(default)]
    pub role_name: String,
    #[serde(default)]
    pub apps: RoleApps,
}

/// Applications attached to a role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleApps {
    #[serde(default)]
    pub app_details: Vec<AppDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub owner_url: String,
    #[serde(default)]
    pub app_url: String,
}

/// Account parsed from a `"<name> (<number>)"` title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    pub account_name: String,
    pub account_number: String,
}

impl FromStr for AccountDetails {
    type Err = ApiError;

    /// Requires exactly one parenthesis pair closing the title, with a
    /// non-empty name before it and a non-empty number inside it.
    fn from_str(title: &str) -> Result<Self, Self::Err> {
        let title_trimmed = title.trim();
        let malformed = || ApiError::malformed_account_title(title);

        if title_trimmed.matches('(').count() != 1 || title_trimmed.matches(')').count() != 1 {
            return Err(malformed());
        }

        let open = title_trimmed.find('(').ok_or_else(malformed)?;
        let close = title_trimmed.find(')').ok_or_else(malformed)?;
        if close < open || close != title_trimmed.len() - 1 {
            return Err(malformed());
        }

        let account_name = title_trimmed[..open].trim();
        let account_number = title_trimmed[open + 1..close].trim();
        if account_name.is_empty() || account_number.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            account_name: account_name.to_string(),
            account_number: account_number.to_string(),
        })
    }
}

/// Single typeahead match
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    pub title: String,
}
