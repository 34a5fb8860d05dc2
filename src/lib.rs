// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod notion;
pub mod press;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::ProxyConfig;
pub use crate::error::{ConfigError, FetchError};
pub use crate::press::{ClassifierRules, ContentItem};

use axum::Router;

/// Assemble the full application: API routes plus `/metrics` when enabled.
pub fn app(config: ProxyConfig, rules: ClassifierRules) -> anyhow::Result<Router> {
    config.log_summary();
    let metrics_routes = config.metrics_routes;
    let state = AppState::new(config, rules)?;

    let mut router = api::router(state);
    if metrics_routes {
        router = router.merge(crate::metrics::router());
    }
    Ok(router)
}

/// Resolve config and classifier rules from the environment, then build the app.
/// A missing credential fails here, before anything is served.
pub fn app_from_env() -> anyhow::Result<Router> {
    let config = ProxyConfig::from_env()?;
    let rules = ClassifierRules::load_default()?;
    app(config, rules)
}
