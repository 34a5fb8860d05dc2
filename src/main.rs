//! Notion press proxy: hosted entrypoint.
//! Boots the Axum app on Shuttle; the local equivalent is `src/bin/local_proxy.rs`.

use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    notion_press_proxy::telemetry::init_tracing();

    let router = notion_press_proxy::app_from_env()?;
    Ok(router.into())
}
