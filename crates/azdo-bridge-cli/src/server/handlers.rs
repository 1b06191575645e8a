use super::AppState;
use crate::problem::ApiError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use azdo_bridge_core::error::SyncError;
use azdo_bridge_core::importer::Importer;
use azdo_bridge_core::model::{ImportRequest, ProviderKind};
use azdo_bridge_core::trigger::{PullRequestEvent, relay_pr_created};
use azdo_bridge_providers::AzureDevOpsConnector;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

pub(super) const SERVICE_NAME: &str = "azdo-bridge";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct TriggerQuery {
    environment: Option<String>,
}

fn check_provider(provider: &str) -> Result<ProviderKind, SyncError> {
    provider
        .parse()
        .map_err(|_| SyncError::UnsupportedProvider(provider.to_string()))
}

pub(super) async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

pub(super) async fn version(Path(provider): Path<String>) -> Result<Json<Value>, ApiError> {
    check_provider(&provider)?;
    Ok(Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

pub(super) async fn import(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Result<Json<ImportRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    check_provider(&provider)?;
    let Json(request) = body?;
    info!(request = ?request, "import requested");

    let wharf = state.wharf(&headers)?;
    let connector = AzureDevOpsConnector::new(state.client.clone());
    let summary = Importer::new(&wharf, &connector).run(&request).await?;
    info!(summary = ?summary, "import completed");
    Ok(StatusCode::CREATED)
}

pub(super) async fn pr_created(
    State(state): State<AppState>,
    Path((provider, project_id)): Path<(String, String)>,
    Query(query): Query<TriggerQuery>,
    headers: HeaderMap,
    body: Result<Json<PullRequestEvent>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    check_provider(&provider)?;
    let Json(event) = body?;
    // Unparseable IDs become 0 so the event type is still checked first.
    let project_id = project_id.parse::<u64>().unwrap_or_default();

    let wharf = state.wharf(&headers)?;
    let response =
        relay_pr_created(&wharf, project_id, query.environment.as_deref(), &event).await?;
    Ok(Json(response))
}
