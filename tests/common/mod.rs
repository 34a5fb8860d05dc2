// tests/common/mod.rs
//
// Mock Notion upstream served by axum on an ephemeral port, plus table fixtures.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::{json, Value};

pub const BLOCK_ID: &str = "1f2e3d4c5b6a79881f2e3d4c5b6a7988";
pub const API_KEY: &str = "secret_test_token_123";

/// What the mock saw for each request.
#[derive(Debug, Clone)]
pub struct Seen {
    pub block_id: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub notion_version: Option<String>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

pub struct MockNotion {
    pub base_url: String,
    pub seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockNotion {
    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

async fn children(
    State(st): State<MockState>,
    Path(block_id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> impl IntoResponse {
    let h = |k: &str| {
        headers
            .get(k)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    st.seen.lock().unwrap().push(Seen {
        block_id,
        query,
        authorization: h("authorization"),
        notion_version: h("notion-version"),
    });
    (
        st.status,
        [("content-type", "application/json")],
        st.body.clone(),
    )
}

/// Start a mock that answers every block-children request with `status` and `body`.
pub async fn spawn_notion(status: StatusCode, body: String) -> MockNotion {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        body,
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/v1/blocks/{block_id}/children", get(children))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock notion");
    let addr = listener.local_addr().expect("mock addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock notion serve");
    });

    MockNotion {
        base_url: format!("http://{addr}/v1"),
        seen,
    }
}

fn row(cells: &[&str]) -> Value {
    json!({
        "object": "block",
        "type": "table_row",
        "table_row": {
            "cells": cells
                .iter()
                .map(|c| json!([{ "type": "text", "plain_text": c }]))
                .collect::<Vec<_>>()
        }
    })
}

/// Block-children body for a table whose first row is the header.
pub fn table_body(rows: &[&[&str]]) -> Value {
    json!({
        "object": "list",
        "results": rows.iter().map(|r| row(r)).collect::<Vec<_>>(),
        "has_more": false,
        "next_cursor": null
    })
}

pub fn press_table() -> Value {
    table_body(&[
        &["Title", "Description", "Image", "Attachments"],
        &[
            "Urban Smart Parking Launch",
            "Cuts search time by 40%",
            "placeholder.png",
            "none",
        ],
        &["Smart City Award 2024", "Recognized for innovation", "", ""],
        &["Media roundup", "Coverage in national press", "", ""],
    ])
}
