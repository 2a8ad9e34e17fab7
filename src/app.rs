/*
 * Responsibility
 * - Config読み込み → 依存生成 (validator / backend / filter chain) → Router 組み立て
 * - Middleware の適用 (request id / trace / limit / timeout)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{gateway, health};
use crate::config::Config;
use crate::filter::build_filter_chain;
use crate::middleware;
use crate::services::{auth::build_token_validator, backend::HttpBackend};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,api_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: fail fast. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gateway in {:?} mode on {} -> {}",
        config.app_env,
        config.addr,
        config.backend_url
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    // Process-wide, read-only after this point.
    let validator = build_token_validator(config)?;
    let backend = Arc::new(HttpBackend::new(
        config.backend_url.clone(),
        config.backend_timeout,
    )?);
    let chain = build_filter_chain(config, validator, backend);

    Ok(AppState::new(
        Arc::new(chain),
        config.request_body_limit_bytes,
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/healthcheck", get(health::health))
        .fallback(gateway::proxy)
        .with_state(state);

    middleware::http::apply(
        router,
        config.request_timeout,
        config.request_body_limit_bytes,
    )
}
