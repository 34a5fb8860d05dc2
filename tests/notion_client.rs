// tests/notion_client.rs
//
// Table Fetcher against a local mock of the block-children endpoint.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{press_table, spawn_notion, API_KEY, BLOCK_ID};
use notion_press_proxy::config::ApiKey;
use notion_press_proxy::notion::NotionClient;
use notion_press_proxy::press::{load_press_items, ClassifierRules};
use notion_press_proxy::FetchError;

fn client(base: &str) -> NotionClient {
    NotionClient::new(base, ApiKey::new(API_KEY), "2022-06-28").expect("client")
}

#[tokio::test]
async fn fetch_sends_auth_version_and_clamped_page_size() {
    let mock = spawn_notion(StatusCode::OK, press_table().to_string()).await;

    let body = client(&mock.base_url)
        .block_children(BLOCK_ID, 500)
        .await
        .expect("fetch ok");
    assert_eq!(body["results"].as_array().map(Vec::len), Some(4));

    let seen = mock.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].block_id, BLOCK_ID);
    assert_eq!(seen[0].query.as_deref(), Some("page_size=100"));
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some(format!("Bearer {API_KEY}").as_str())
    );
    assert_eq!(seen[0].notion_version.as_deref(), Some("2022-06-28"));
}

#[tokio::test]
async fn unauthorized_is_surfaced_without_retry() {
    let err_body = r#"{"object":"error","status":401,"code":"unauthorized"}"#;
    let mock = spawn_notion(StatusCode::UNAUTHORIZED, err_body.to_string()).await;

    let err = client(&mock.base_url)
        .block_children(BLOCK_ID, 100)
        .await
        .expect_err("401 must fail");

    assert!(matches!(err, FetchError::Status { .. }));
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.body(), Some(err_body));
    assert_eq!(mock.requests().len(), 1, "exactly one attempt");
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let mock = spawn_notion(StatusCode::OK, "<html>oops</html>".to_string()).await;
    let err = client(&mock.base_url)
        .block_children(BLOCK_ID, 10)
        .await
        .expect_err("bad json must fail");
    assert!(matches!(err, FetchError::Decode { .. }));
    assert_eq!(err.body(), Some("<html>oops</html>"));
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    // Reserve a free port, then release it so nothing is listening there.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr")
    };
    let err = client(&format!("http://{addr}/v1"))
        .block_children(BLOCK_ID, 10)
        .await
        .expect_err("connection must fail");
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn has_more_is_not_followed() {
    let mut body = press_table();
    body["has_more"] = serde_json::json!(true);
    body["next_cursor"] = serde_json::json!("cursor-2");
    let mock = spawn_notion(StatusCode::OK, body.to_string()).await;

    let c = client(&mock.base_url);
    let items = load_press_items(&c, BLOCK_ID, Utc::now(), &ClassifierRules::default())
        .await
        .expect("first page is mapped");
    assert_eq!(items.len(), 3);

    let seen = mock.requests();
    assert_eq!(seen.len(), 1, "no follow-up page request");
    assert_eq!(seen[0].query.as_deref(), Some("page_size=100"));
}

#[tokio::test]
async fn pipeline_maps_fetched_table() {
    let mock = spawn_notion(StatusCode::OK, press_table().to_string()).await;
    let c = client(&mock.base_url);

    let items = load_press_items(&c, BLOCK_ID, Utc::now(), &ClassifierRules::default())
        .await
        .expect("pipeline ok");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].title, "Urban Smart Parking Launch");
    assert_eq!(items[1].category.label(), "Award");
    assert_eq!(items[2].category.label(), "Media Coverage");
}

#[tokio::test]
async fn shape_error_yields_empty_feed() {
    let mock = spawn_notion(StatusCode::OK, r#"{"object":"list"}"#.to_string()).await;
    let c = client(&mock.base_url);
    let items = load_press_items(&c, BLOCK_ID, Utc::now(), &ClassifierRules::default())
        .await
        .expect("shape errors are not fatal");
    assert!(items.is_empty());
}
