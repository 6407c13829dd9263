//! Error types and service error-code mapping

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Client error, one variant per failure kind callers can branch on
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("failed to create request body: {message}")]
    RequestBody { message: String },

    #[error("failed to build request: {message}")]
    BuildRequest { message: String },

    #[error("failed to action request: {message}")]
    Transport { message: String },

    #[error("failed to read response body: {message}")]
    ReadBody { message: String },

    #[error("failed to unmarshal JSON: {message}")]
    Decode { message: String },

    #[error("unexpected response type: {message}")]
    UnexpectedResponseType { message: String },

    #[error("invalid ARN")]
    InvalidArn,

    #[error("no matching roles")]
    NoMatchingRoles,

    #[error("more than one matching role for search string")]
    MultipleMatchingRoles,

    #[error("error retrieving credentials")]
    CredentialRetrieval,

    #[error("malformed request")]
    MalformedRequest,

    #[error("mutual TLS certificate needs to be refreshed")]
    MutualTlsCertNeedsRefresh,

    #[error("authentication is invalid or has expired, re-authenticate and try again")]
    InvalidJwt,

    #[error("unexpected HTTP status {status}, want 200. Response: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("role assumption failed for {arn}: {source}")]
    RoleAssumption {
        arn: String,
        #[source]
        source: Box<ApiError>,
    },

    #[error("malformed account title {title:?}: expected \"name (number)\"")]
    MalformedAccountTitle { title: String },

    #[error("malformed ARN {arn:?}: {message}")]
    MalformedArn { arn: String, message: String },

    #[error("upstream error: {message}")]
    UpstreamError { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn request_body(message: impl Into<String>) -> Self {
        Self::RequestBody {
            message: message.into(),
        }
    }

    pub fn build_request(message: impl Into<String>) -> Self {
        Self::BuildRequest {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn read_body(message: impl Into<String>) -> Self {
        Self::ReadBody {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn unexpected_response_type(message: impl Into<String>) -> Self {
        Self::UnexpectedResponseType {
            message: message.into(),
        }
    }

    pub fn unexpected_status(status: u16, body: &[u8]) -> Self {
        Self::UnexpectedStatus {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    pub fn role_assumption(arn: impl Into<String>, source: ApiError) -> Self {
        Self::RoleAssumption {
            arn: arn.into(),
            source: Box::new(source),
        }
    }

    pub fn malformed_account_title(title: impl Into<String>) -> Self {
        Self::MalformedAccountTitle {
            title: title.into(),
        }
    }

    pub fn malformed_arn(arn: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedArn {
            arn: arn.into(),
            message: message.into(),
        }
    }

    pub fn upstream_error(message: impl Into<String>) -> Self {
        Self::UpstreamError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the stable error key for this error
    pub fn error_key(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::RequestBody { .. } => "request_body",
            Self::BuildRequest { .. } => "build_request",
            Self::Transport { .. } => "transport",
            Self::ReadBody { .. } => "read_body",
            Self::Decode { .. } => "decode",
            Self::UnexpectedResponseType { .. } => "unexpected_response_type",
            Self::InvalidArn => "invalid_arn",
            Self::NoMatchingRoles => "no_matching_roles",
            Self::MultipleMatchingRoles => "multiple_matching_roles",
            Self::CredentialRetrieval => "credential_retrieval",
            Self::MalformedRequest => "malformed_request",
            Self::MutualTlsCertNeedsRefresh => "mtls_cert_needs_refresh",
            Self::InvalidJwt => "invalid_jwt",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::Service { .. } => "service_error",
            Self::RoleAssumption { .. } => "role_assumption",
            Self::MalformedAccountTitle { .. } => "malformed_account_title",
            Self::MalformedArn { .. } => "malformed_arn",
            Self::UpstreamError { .. } => "upstream_error",
            Self::Internal { .. } => "internal_error",
        }
    }
}

/// Structured error codes declared by the credential service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCode {
    InvalidArn,
    NoMatchingRoles,
    MultipleMatchingRoles,
    CredentialRetrieval,
    MalformedRequest,
    MutualTlsCertNeedsRefresh,
    InvalidJwt,
}

/// Wire code to kind. Fixed for the lifetime of the process.
static SERVICE_CODES: &[(&str, ServiceCode)] = &[
    ("899", ServiceCode::InvalidArn),
    ("900", ServiceCode::NoMatchingRoles),
    ("901", ServiceCode::MultipleMatchingRoles),
    ("902", ServiceCode::CredentialRetrieval),
    ("903", ServiceCode::NoMatchingRoles),
    ("904", ServiceCode::MalformedRequest),
    ("905", ServiceCode::MutualTlsCertNeedsRefresh),
    ("invalid_jwt", ServiceCode::InvalidJwt),
];

impl ServiceCode {
    /// Look up a wire code; `None` for anything outside the table
    pub fn lookup(code: &str) -> Option<Self> {
        SERVICE_CODES
            .iter()
            .find(|(wire, _)| *wire == code)
            .map(|(_, kind)| *kind)
    }
}

impl From<ServiceCode> for ApiError {
    fn from(code: ServiceCode) -> Self {
        match code {
            ServiceCode::InvalidArn => Self::InvalidArn,
            ServiceCode::NoMatchingRoles => Self::NoMatchingRoles,
            ServiceCode::MultipleMatchingRoles => Self::MultipleMatchingRoles,
            ServiceCode::CredentialRetrieval => Self::CredentialRetrieval,
            ServiceCode::MalformedRequest => Self::MalformedRequest,
            ServiceCode::MutualTlsCertNeedsRefresh => Self::MutualTlsCertNeedsRefresh,
            ServiceCode::InvalidJwt => Self::InvalidJwt,
        }
    }
}
