//! AWS STS role assumer
//!
//! Performs each chain hop with `sts:AssumeRole`, signed with the previous
//! hop's credential.

use aws_sdk_sts::config::{BehaviorVersion, Credentials as StsCredentials, Region};
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::primitives::DateTime as SmithyDateTime;
use chrono::{DateTime, Utc};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use rolevend_core::config::Config;
use rolevend_core::creds::Credential;
use rolevend_core::error::{ApiError, Result};
use rolevend_core::platform::RoleAssumer;

/// Session name recorded by STS for assumed roles
pub const DEFAULT_SESSION_NAME: &str = "rolevend";

/// Role assumer backed by the AWS STS API
pub struct StsRoleAssumer {
    region: String,
    session_name: String,
    runtime: Runtime,
}

impl StsRoleAssumer {
    pub fn new(region: impl Into<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::internal(format!("failed to start STS runtime: {}", e)))?;

        Ok(Self {
            region: region.into(),
            session_name: DEFAULT_SESSION_NAME.to_string(),
            runtime,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.region.clone())
    }

    pub fn with_session_name(mut self, session_name: impl Into<String>) -> Self {
        self.session_name = session_name.into();
        self
    }
}

impl RoleAssumer for StsRoleAssumer {
    fn assume_role(&self, identity: &Credential, role_arn: &str) -> Result<Credential> {
        let caller = StsCredentials::new(
            identity.access_key_id(),
            identity.secret_access_key(),
            Some(identity.session_token().to_string()),
            None,
            "rolevend",
        );
        let config = aws_sdk_sts::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(caller)
            .build();
        let client = aws_sdk_sts::Client::from_conf(config);

        debug!(role_arn, region = %self.region, "calling sts:AssumeRole");
        let output = self
            .runtime
            .block_on(
                client
                    .assume_role()
                    .role_arn(role_arn)
                    .role_session_name(&self.session_name)
                    .send(),
            )
            .map_err(|e| {
                ApiError::upstream_error(format!(
                    "sts:AssumeRole failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let sts_creds = output
            .credentials()
            .ok_or_else(|| ApiError::upstream_error("STS returned no credentials"))?;

        let mut credential = Credential::new(
            sts_creds.access_key_id(),
            sts_creds.secret_access_key(),
            sts_creds.session_token(),
        )
        .with_role_arn(role_arn);
        if let Some(expiration) = to_utc(sts_creds.expiration()) {
            credential = credential.with_expiration(expiration);
        }

        info!(role_arn, "assumed role");
        Ok(credential)
    }
}

fn to_utc(value: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}
