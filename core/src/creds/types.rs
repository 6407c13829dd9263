//! Credential and request wire types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temporary cloud credential vended by the service or produced by a chain hop
///
/// Fields are read-only once constructed; deriving a new credential always
/// yields a new value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credential {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,

    /// Accepted as epoch seconds or RFC 3339; absent in some responses
    #[serde(
        default,
        with = "expiration",
        skip_serializing_if = "Option::is_none"
    )]
    expiration: Option<DateTime<Utc>>,

    #[serde(default)]
    role_arn: String,
}

impl Credential {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
            expiration: None,
            role_arn: String::new(),
        }
    }

    pub fn with_expiration(self, expiration: DateTime<Utc>) -> Self {
        Self {
            expiration: Some(expiration),
            ..self
        }
    }

    pub fn with_role_arn(self, role_arn: impl Into<String>) -> Self {
        Self {
            role_arn: role_arn.into(),
            ..self
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    pub fn role_arn(&self) -> &str {
        &self.role_arn
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .field("role_arn", &self.role_arn)
            .finish()
    }
}

/// Instance-identity snapshot attached to credential requests when enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceInfo {
    pub hostname: String,
    pub username: String,
    pub client_version: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/v1/get_credentials`
#[derive(Serialize)]
pub(crate) struct CredentialRequest<'a> {
    #[serde(rename = "RequestedRole")]
    pub requested_role: &'a str,

    // Field name is the service's spelling.
    #[serde(rename = "NoIpRestricton")]
    pub no_ip_restriction: bool,

    #[serde(rename = "Metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<InstanceInfo>,
}

/// Response of `POST /api/v1/get_credentials`
#[derive(Deserialize)]
pub(crate) struct CredentialResponse {
    #[serde(rename = "Credentials", default)]
    pub credentials: Option<Credential>,
}

/// Expiration as epoch seconds or RFC 3339 on input, RFC 3339 on output
mod expiration {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ExpirationVisitor;

        impl<'de> Visitor<'de> for ExpirationVisitor {
            type Value = Option<DateTime<Utc>>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("epoch seconds, an RFC 3339 timestamp, or null")
            }

            fn visit_i64<E: de::Error>(self, secs: i64) -> Result<Self::Value, E> {
                Utc.timestamp_opt(secs, 0)
                    .single()
                    .map(Some)
                    .ok_or_else(|| E::custom(format!("expiration out of range: {}", secs)))
            }

            fn visit_u64<E: de::Error>(self, secs: u64) -> Result<Self::Value, E> {
                let secs = i64::try_from(secs)
                    .map_err(|_| E::custom(format!("expiration out of range: {}", secs)))?;
                self.visit_i64(secs)
            }

            fn visit_f64<E: de::Error>(self, secs: f64) -> Result<Self::Value, E> {
                self.visit_i64(secs.trunc() as i64)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                if value.is_empty() {
                    return Ok(None);
                }
                DateTime::parse_from_rfc3339(value)
                    .map(|dt| Some(dt.with_timezone(&Utc)))
                    .map_err(|e| E::custom(format!("invalid expiration '{}': {}", value, e)))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }
        }

        deserializer.deserialize_option(ExpirationVisitor)
    }
}
