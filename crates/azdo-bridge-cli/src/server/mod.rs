use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{HeaderMap, Request, header::AUTHORIZATION};
use axum::routing::{get, post};
use azdo_bridge_core::config::AppConfig;
use azdo_bridge_core::error::SyncError;
use azdo_bridge_providers::{WharfClient, build_client};
use reqwest::Client;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{Span, info, info_span};
use uuid::Uuid;

mod handlers;

#[derive(Clone)]
pub struct AppState {
    client: Client,
    wharf_api_url: Arc<str>,
}

impl AppState {
    pub fn new(client: Client, wharf_api_url: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            wharf_api_url: wharf_api_url.into(),
        }
    }

    /// Wharf API client acting with the caller's credentials.
    fn wharf(&self, headers: &HeaderMap) -> Result<WharfClient, SyncError> {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        WharfClient::new(self.client.clone(), &self.wharf_api_url, authorization).map_err(|err| {
            SyncError::InvalidConfig {
                detail: "Unable to use the configured Wharf API URL.".to_string(),
                source: Some(err),
            }
        })
    }
}

pub fn router(state: AppState, allow_cors: bool) -> Router {
    let router = Router::new()
        .route("/", get(handlers::ping))
        .route("/import/{provider}", post(handlers::import))
        .route("/import/{provider}/version", get(handlers::version))
        .route(
            "/import/{provider}/triggers/{project_id}/pr/created",
            post(handlers::pr_created),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(request_span));
    if allow_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

fn request_span(request: &Request<Body>) -> Span {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or_default();
    info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        route,
    )
}

pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let wharf_api_url = config.require_wharf_api_url()?.to_string();
    let client = build_client(config.accept_invalid_certs).context("build HTTP client")?;
    let app = router(AppState::new(client, wharf_api_url.as_str()), config.allow_cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("bind {}", config.bind_address))?;
    info!(
        bind = %config.bind_address,
        wharf_api_url = %wharf_api_url,
        allow_cors = config.allow_cors,
        "listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
