use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single outbound HTTP request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("non-2xx HTTP status: {status}")]
    Status {
        status: u16,
        www_authenticate: Option<String>,
    },
    #[error("send request")]
    Transport(#[source] BoxError),
    #[error("decode response body")]
    Decode(#[source] BoxError),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Everything that can abort an import or a trigger relay.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid parameter {field:?}: {detail}")]
    InvalidParam { field: &'static str, detail: String },
    #[error("{detail}")]
    InvalidConfig {
        detail: String,
        #[source]
        source: Option<RequestError>,
    },
    #[error("{detail}")]
    ProviderResponse {
        detail: String,
        #[source]
        source: RequestError,
    },
    #[error("{detail}")]
    FetchBuildDefinition {
        detail: String,
        #[source]
        source: RequestError,
    },
    #[error("{detail}")]
    ApiRead {
        detail: String,
        #[source]
        source: Option<RequestError>,
    },
    #[error("{detail}")]
    ApiWrite {
        detail: String,
        #[source]
        source: RequestError,
    },
    #[error("unauthorized against the Wharf API: {detail}")]
    Unauthorized {
        detail: String,
        realm: Option<String>,
    },
    #[error("{detail}")]
    Consistency { detail: String },
    #[error("expected {expected} event, got {actual:?}")]
    UnsupportedEvent {
        expected: &'static str,
        actual: String,
    },
    #[error("unsupported provider {0:?}")]
    UnsupportedProvider(String),
    #[error("{detail}")]
    TriggerDispatch {
        detail: String,
        #[source]
        source: RequestError,
    },
}

impl SyncError {
    pub fn invalid_param(field: &'static str, detail: impl Into<String>) -> Self {
        SyncError::InvalidParam {
            field,
            detail: detail.into(),
        }
    }

    pub fn provider_response(detail: impl Into<String>, source: RequestError) -> Self {
        match source {
            RequestError::InvalidUrl { .. } => SyncError::InvalidConfig {
                detail: detail.into(),
                source: Some(source),
            },
            source => SyncError::ProviderResponse {
                detail: detail.into(),
                source,
            },
        }
    }

    pub fn api_read(detail: impl Into<String>, source: RequestError) -> Self {
        Self::promote_unauthorized(detail.into(), source).unwrap_or_else(|(detail, source)| {
            SyncError::ApiRead {
                detail,
                source: Some(source),
            }
        })
    }

    pub fn api_write(detail: impl Into<String>, source: RequestError) -> Self {
        Self::promote_unauthorized(detail.into(), source)
            .unwrap_or_else(|(detail, source)| SyncError::ApiWrite { detail, source })
    }

    pub fn trigger_dispatch(detail: impl Into<String>, source: RequestError) -> Self {
        Self::promote_unauthorized(detail.into(), source)
            .unwrap_or_else(|(detail, source)| SyncError::TriggerDispatch { detail, source })
    }

    fn promote_unauthorized(
        detail: String,
        source: RequestError,
    ) -> Result<Self, (String, RequestError)> {
        match source {
            RequestError::Status {
                status: 401,
                www_authenticate,
            } => Ok(SyncError::Unauthorized {
                detail,
                realm: www_authenticate,
            }),
            other => Err((detail, other)),
        }
    }

    /// Short kebab-case name of the error class, used in problem type URIs.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::InvalidParam { .. } => "invalid-param",
            SyncError::InvalidConfig { .. } => "invalid-config",
            SyncError::ProviderResponse { .. } => "provider-response",
            SyncError::FetchBuildDefinition { .. } => "fetch-build-definition",
            SyncError::ApiRead { .. } => "api-client-read",
            SyncError::ApiWrite { .. } => "api-client-write",
            SyncError::Unauthorized { .. } => "unauthorized",
            SyncError::Consistency { .. } => "composing-provider-data",
            SyncError::UnsupportedEvent { .. } => "unsupported-event",
            SyncError::UnsupportedProvider(_) => "unsupported-provider",
            SyncError::TriggerDispatch { .. } => "send-trigger",
        }
    }
}
