// src/config/proxy.rs
//! Process-scoped proxy settings, resolved once at startup from the environment.
//!
//! The Notion credential and the press table block id are mandatory; everything else
//! has a default. Call `dotenvy::dotenv()` before `ProxyConfig::from_env()` in local runs.

use std::fmt;

use axum::http::HeaderValue;

use crate::error::ConfigError;
use crate::notion::is_valid_block_id;

pub const ENV_API_KEY: &str = "NOTION_API_KEY";
pub const ENV_BLOCK_ID: &str = "NOTION_BLOCK_ID";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ALLOWED_ORIGIN: &str = "ALLOWED_ORIGIN";
pub const ENV_API_BASE: &str = "NOTION_API_BASE";
pub const ENV_NOTION_VERSION: &str = "NOTION_VERSION";
pub const ENV_PROXY_PREFIX: &str = "PROXY_PREFIX";
pub const ENV_METRICS_ROUTES: &str = "METRICS_ROUTES";

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "*";
pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_PROXY_PREFIX: &str = "/api/notion";

/// Split a comma-separated origin list; `*` stays a single wildcard entry.
pub fn allowed_origins(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).filter(|o| !o.is_empty()).collect()
}

/// Keep the first few characters of a secret and hide the rest.
pub fn mask_secret(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    format!("{shown}… ({} chars)", secret.chars().count())
}

/// Notion integration token. Formatting never reveals more than a short prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The full token, for the Authorization header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        mask_secret(&self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.masked())
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub api_key: ApiKey,
    pub block_id: String,
    pub port: u16,
    /// Comma-separated; `*` means any origin.
    pub allowed_origin: String,
    pub api_base: String,
    pub notion_version: String,
    pub route_prefix: String,
    pub metrics_routes: bool,
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_API_KEY)
            .map(ApiKey::new)
            .ok_or(ConfigError::Missing { var: ENV_API_KEY })?;

        let block_id = get(ENV_BLOCK_ID).ok_or(ConfigError::Missing { var: ENV_BLOCK_ID })?;
        if !is_valid_block_id(&block_id) {
            return Err(ConfigError::Invalid {
                var: ENV_BLOCK_ID,
                value: block_id,
                reason: "expected a Notion id (hex digits and dashes)".into(),
            });
        }

        let port = match get(ENV_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: ENV_PORT,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let route_prefix = get(ENV_PROXY_PREFIX).unwrap_or_else(|| DEFAULT_PROXY_PREFIX.into());
        if !route_prefix.starts_with('/') || route_prefix.ends_with('/') {
            return Err(ConfigError::Invalid {
                var: ENV_PROXY_PREFIX,
                value: route_prefix,
                reason: "must start with '/' and must not end with '/'".into(),
            });
        }

        let allowed_origin =
            get(ENV_ALLOWED_ORIGIN).unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.into());
        if let Some(bad) = allowed_origins(&allowed_origin)
            .into_iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::Invalid {
                var: ENV_ALLOWED_ORIGIN,
                value: bad.to_string(),
                reason: "not a valid header value".into(),
            });
        }

        let api_base = get(ENV_API_BASE)
            .unwrap_or_else(|| DEFAULT_API_BASE.into())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            block_id,
            port,
            allowed_origin,
            api_base,
            notion_version: get(ENV_NOTION_VERSION)
                .unwrap_or_else(|| DEFAULT_NOTION_VERSION.into()),
            route_prefix,
            metrics_routes: get(ENV_METRICS_ROUTES).as_deref() == Some("1"),
        })
    }

    /// Minimal config for tests and tools: defaults everywhere except key, block and base URL.
    pub fn for_upstream(api_key: &str, block_id: &str, api_base: &str) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            block_id: block_id.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            notion_version: DEFAULT_NOTION_VERSION.into(),
            route_prefix: DEFAULT_PROXY_PREFIX.into(),
            metrics_routes: false,
        }
    }

    /// One-line, secret-safe summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!(
            api_key = %self.api_key,
            block_id = %self.block_id,
            port = self.port,
            origin = %self.allowed_origin,
            api_base = %self.api_base,
            notion_version = %self.notion_version,
            prefix = %self.route_prefix,
            "proxy config loaded"
        );
        if self.allowed_origin == "*" {
            tracing::warn!("ALLOWED_ORIGIN is '*'; any site may call this proxy");
        }
    }
}
