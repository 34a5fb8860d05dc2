//! Local development server: same app as the hosted entrypoint, bound to `0.0.0.0:$PORT`.

use std::net::SocketAddr;

use anyhow::Context;
use notion_press_proxy::{app, ClassifierRules, ProxyConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    notion_press_proxy::telemetry::init_tracing();

    let config = ProxyConfig::from_env().context("proxy configuration")?;
    let rules = ClassifierRules::load_default()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let prefix = config.route_prefix.clone();

    let router = app(config, rules)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(%addr, %prefix, "notion proxy listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
