// src/notion/client.rs
//! Notion REST client: one GET per call, no retry, no pagination beyond the first page.

use std::time::Instant;

use axum::body::Bytes;
use axum::http::StatusCode;
use metrics::{counter, histogram};
use reqwest::{header, Client};
use serde_json::Value;

use super::{clamp_page_size, is_valid_block_id, types, TableSource};
use crate::config::{ApiKey, ProxyConfig};
use crate::error::FetchError;

/// Notion's maximum `page_size` for block children.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Untouched upstream answer, for the passthrough route.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    api_base: String,
    api_key: ApiKey,
    notion_version: String,
}

impl NotionClient {
    pub fn new(api_base: &str, api_key: ApiKey, notion_version: &str) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(concat!("notion-press-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            notion_version: notion_version.to_string(),
        })
    }

    pub fn from_config(cfg: &ProxyConfig) -> Result<Self, FetchError> {
        Self::new(&cfg.api_base, cfg.api_key.clone(), &cfg.notion_version)
    }

    fn children_url(&self, block_id: &str) -> Result<String, FetchError> {
        if !is_valid_block_id(block_id) {
            return Err(FetchError::InvalidBlockId(block_id.to_string()));
        }
        Ok(format!("{}/blocks/{}/children", self.api_base, block_id))
    }

    async fn send(
        &self,
        block_id: &str,
        query: &[(String, String)],
    ) -> Result<reqwest::Response, FetchError> {
        let url = self.children_url(block_id)?;
        let t0 = Instant::now();
        counter!("notion_upstream_requests_total").increment(1);

        let res = self
            .http
            .get(&url)
            .bearer_auth(self.api_key.expose())
            .header("Notion-Version", self.notion_version.as_str())
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await;

        histogram!("notion_upstream_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        res.map_err(|e| {
            tracing::warn!(error = %e, block_id, "notion transport error");
            counter!("notion_upstream_errors_total").increment(1);
            FetchError::from(e)
        })
    }

    /// Table Fetcher: first page of children as JSON. Non-2xx and bad JSON are errors.
    pub async fn block_children(&self, block_id: &str, page_size: u32) -> Result<Value, FetchError> {
        let page_size = clamp_page_size(page_size);
        let query = [("page_size".to_string(), page_size.to_string())];
        let resp = self.send(block_id, &query).await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, block_id, "notion returned an error status");
            counter!("notion_upstream_errors_total").increment(1);
            return Err(FetchError::Status { status, body });
        }

        let json: Value = serde_json::from_str(&body).map_err(|source| {
            counter!("notion_upstream_errors_total").increment(1);
            FetchError::Decode {
                status,
                body: body.clone(),
                source,
            }
        })?;

        let info = types::page_info(&json);
        if info.has_more {
            tracing::info!(
                block_id,
                next_cursor = info.next_cursor.as_deref().unwrap_or_default(),
                "more children available; only the first page is read"
            );
        }
        Ok(json)
    }

    /// Passthrough: forward caller query pairs (page_size clamped) and relay status + body.
    pub async fn forward_block_children(
        &self,
        block_id: &str,
        query: &[(String, String)],
    ) -> Result<UpstreamReply, FetchError> {
        let query = sanitize_query(query);
        let resp = self.send(block_id, &query).await?;

        let status = resp.status();
        if !status.is_success() {
            counter!("notion_upstream_errors_total").increment(1);
        }
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await?;

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}

/// Clamp `page_size` when it parses, drop it when it doesn't; everything else passes through.
fn sanitize_query(query: &[(String, String)]) -> Vec<(String, String)> {
    query
        .iter()
        .filter_map(|(k, v)| {
            if k != "page_size" {
                return Some((k.clone(), v.clone()));
            }
            v.trim()
                .parse::<u32>()
                .ok()
                .map(|n| (k.clone(), clamp_page_size(n).to_string()))
        })
        .collect()
}

#[async_trait::async_trait]
impl TableSource for NotionClient {
    async fn fetch_block_children(
        &self,
        block_id: &str,
        page_size: u32,
    ) -> Result<Value, FetchError> {
        self.block_children(block_id, page_size).await
    }

    fn name(&self) -> &'static str {
        "notion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(v: &[(&str, &str)]) -> Vec<(String, String)> {
        v.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn sanitize_clamps_and_keeps_other_params() {
        let out = sanitize_query(&pairs(&[("page_size", "500"), ("start_cursor", "abc")]));
        assert_eq!(out, pairs(&[("page_size", "100"), ("start_cursor", "abc")]));
    }

    #[test]
    fn sanitize_drops_unparseable_page_size() {
        let out = sanitize_query(&pairs(&[("page_size", "lots")]));
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_block_id_never_builds_a_url() {
        let c = NotionClient::new("http://localhost:1", ApiKey::new("k"), "2022-06-28").unwrap();
        assert!(matches!(
            c.children_url("../users"),
            Err(FetchError::InvalidBlockId(_))
        ));
        assert_eq!(
            c.children_url("abc-123").unwrap(),
            "http://localhost:1/blocks/abc-123/children"
        );
    }
}
