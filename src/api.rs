use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{allowed_origins, ProxyConfig};
use crate::error::FetchError;
use crate::notion::{NotionClient, TableSource};
use crate::press::{self, ClassifierRules, ContentItem, PressFilter};

pub const SERVICE_NAME: &str = "notion-press-proxy";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub client: Arc<NotionClient>,
    /// Where the press feed reads its table from; the live client unless overridden.
    pub press_source: Arc<dyn TableSource>,
    pub rules: Arc<ClassifierRules>,
}

impl AppState {
    pub fn new(config: ProxyConfig, rules: ClassifierRules) -> Result<Self, FetchError> {
        let client = Arc::new(NotionClient::from_config(&config)?);
        Ok(Self {
            config: Arc::new(config),
            press_source: client.clone(),
            client,
            rules: Arc::new(rules),
        })
    }

    pub fn with_press_source(mut self, source: Arc<dyn TableSource>) -> Self {
        self.press_source = source;
        self
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origin);
    let prefix = state.config.route_prefix.clone();

    let notion = Router::new()
        .route(
            "/blocks/{block_id}/children",
            get(proxy_block_children).options(preflight),
        )
        .route("/press", get(press_feed).options(preflight));

    Router::new()
        .route("/health", get(health))
        .nest(&prefix, notion)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let origins = allowed_origins(origin);
    if origins.is_empty() || origins.contains(&"*") {
        return layer.allow_origin(Any);
    }
    let list: Vec<HeaderValue> = origins
        .into_iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(list))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": SERVICE_NAME }))
}

/// Bare OPTIONS (no CORS headers) still succeeds with an empty body.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn proxy_block_children(
    State(state): State<AppState>,
    Path(block_id): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, FetchError> {
    let reply = state.client.forward_block_children(&block_id, &query).await?;
    tracing::debug!(block_id, status = %reply.status, bytes = reply.body.len(), "proxied block children");

    let content_type = reply
        .content_type
        .unwrap_or_else(|| "application/json".to_string());
    Ok((reply.status, [(header::CONTENT_TYPE, content_type)], reply.body).into_response())
}

#[derive(serde::Serialize)]
struct PressResp {
    count: usize,
    items: Vec<ContentItem>,
}

async fn press_feed(
    State(state): State<AppState>,
    Query(filter): Query<PressFilter>,
) -> Result<Json<PressResp>, FetchError> {
    let items = press::load_press_items(
        state.press_source.as_ref(),
        &state.config.block_id,
        Utc::now(),
        &state.rules,
    )
    .await?;
    let items = press::filter_items(items, &filter);
    Ok(Json(PressResp {
        count: items.len(),
        items,
    }))
}
