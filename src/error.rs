//! Error types shared by the config loader, the Notion client and the HTTP layer.
//!
//! Shape problems in an otherwise successful response are deliberately absent here:
//! they are logged and degrade to an empty result (see `notion::types::rows_from_body`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Startup configuration problems. Fatal to the proxy process.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },

    #[error("invalid value for {var} ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Failures talking to the Notion API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Upstream answered with a non-2xx status.
    #[error("notion responded with {status}")]
    Status { status: StatusCode, body: String },

    #[error("notion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx answer whose body is not valid JSON.
    #[error("notion returned malformed json ({status}): {source}")]
    Decode {
        status: StatusCode,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid block id {0:?}")]
    InvalidBlockId(String),
}

impl FetchError {
    /// Upstream status code, when the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } | FetchError::Decode { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status(),
            FetchError::InvalidBlockId(_) => None,
        }
    }

    /// Raw upstream body kept for diagnostics.
    pub fn body(&self) -> Option<&str> {
        match self {
            FetchError::Status { body, .. } | FetchError::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        match self {
            FetchError::Status { status, body } => {
                // Relay Notion's own error object when it is JSON, the raw text otherwise.
                let details = serde_json::from_str::<serde_json::Value>(&body)
                    .unwrap_or(serde_json::Value::String(body));
                let payload = json!({
                    "error": "notion_fetch_failed",
                    "status": status.as_u16(),
                    "details": details,
                });
                (status, Json(payload)).into_response()
            }
            FetchError::InvalidBlockId(id) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid_block_id", "block_id": id })),
            )
                .into_response(),
            other => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "notion_unreachable", "message": other.to_string() })),
            )
                .into_response(),
        }
    }
}
