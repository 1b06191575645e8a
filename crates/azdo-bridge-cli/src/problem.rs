use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::header::{CONTENT_TYPE, WWW_AUTHENTICATE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use azdo_bridge_core::error::SyncError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error as _;
use tracing::{error, warn};

pub const PROBLEM_TYPE_PREFIX: &str = "prob/provider/azuredevops/";
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC 7807 problem document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    Sync(SyncError),
    InvalidBody(String),
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        ApiError::Sync(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        let err = match self {
            ApiError::InvalidBody(_) => return StatusCode::BAD_REQUEST,
            ApiError::Sync(err) => err,
        };
        match err {
            SyncError::InvalidParam { .. }
            | SyncError::InvalidConfig { .. }
            | SyncError::UnsupportedEvent { .. } => StatusCode::BAD_REQUEST,
            SyncError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            SyncError::UnsupportedProvider(_) => StatusCode::NOT_FOUND,
            SyncError::ProviderResponse { .. }
            | SyncError::FetchBuildDefinition { .. }
            | SyncError::ApiRead { .. }
            | SyncError::ApiWrite { .. }
            | SyncError::Consistency { .. }
            | SyncError::TriggerDispatch { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn to_problem(&self) -> Problem {
        let status = self.status().as_u16();
        match self {
            ApiError::InvalidBody(detail) => Problem {
                problem_type: format!("{PROBLEM_TYPE_PREFIX}invalid-body"),
                title: "Invalid request body.".to_string(),
                status,
                detail: detail.clone(),
                errors: BTreeMap::new(),
            },
            ApiError::Sync(err) => {
                let mut errors = BTreeMap::new();
                let detail = match err {
                    SyncError::InvalidParam { field, detail } => {
                        errors.insert(field.to_string(), vec![detail.clone()]);
                        detail.clone()
                    }
                    other => error_chain(other),
                };
                Problem {
                    problem_type: format!("{PROBLEM_TYPE_PREFIX}{}", err.kind()),
                    title: title(err).to_string(),
                    status,
                    detail,
                    errors,
                }
            }
        }
    }
}

fn title(err: &SyncError) -> &'static str {
    match err {
        SyncError::InvalidParam { .. } => "Invalid parameter.",
        SyncError::InvalidConfig { .. } => "Invalid provider configuration.",
        SyncError::ProviderResponse { .. } => "Unexpected response from Azure DevOps.",
        SyncError::FetchBuildDefinition { .. } => "Unable to fetch build definition.",
        SyncError::ApiRead { .. } => "Unable to read from the Wharf API.",
        SyncError::ApiWrite { .. } => "Unable to write to the Wharf API.",
        SyncError::Unauthorized { .. } => "Unauthorized.",
        SyncError::Consistency { .. } => "Inconsistent data from Azure DevOps.",
        SyncError::UnsupportedEvent { .. } => "Unsupported event type.",
        SyncError::UnsupportedProvider(_) => "Unsupported provider.",
        SyncError::TriggerDispatch { .. } => "Unable to start build.",
    }
}

fn error_chain(err: &SyncError) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = self.to_problem();
        let status = self.status();
        if status.is_server_error() {
            error!(problem_type = %problem.problem_type, detail = %problem.detail, "request failed");
        } else {
            warn!(problem_type = %problem.problem_type, detail = %problem.detail, "request rejected");
        }

        let mut response = (
            status,
            [(CONTENT_TYPE, HeaderValue::from_static(PROBLEM_CONTENT_TYPE))],
            Json(problem),
        )
            .into_response();
        if let ApiError::Sync(SyncError::Unauthorized {
            realm: Some(realm), ..
        }) = &self
            && let Ok(value) = HeaderValue::from_str(realm)
        {
            response.headers_mut().insert(WWW_AUTHENTICATE, value);
        }
        response
    }
}
