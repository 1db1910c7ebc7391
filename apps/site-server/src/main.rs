//! # Meridian Site Server
//!
//! Actix-web server for the marketing site: public blog API, admin post
//! workflow and contact-form lead intake.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use meridian_core::ports::RateLimiter;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Meridian site server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    let lead_limiter = lead_limiter(&config);

    HttpServer::new(move || {
        let lead_limiter = lead_limiter.clone();
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| handlers::configure_routes(cfg, lead_limiter))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// Per-IP limiter for lead submissions, pruned once a minute.
#[cfg(feature = "rate-limit")]
fn lead_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    use std::time::Duration;

    use meridian_infra::{InMemoryRateLimiter, RateLimitConfig};

    let limiter = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        max_requests: config.lead_rate_limit_per_minute,
        window: Duration::from_secs(60),
    }));

    let pruned = limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            pruned.prune();
            tracing::trace!(keys = pruned.tracked_keys(), "Pruned lead rate limiter");
        }
    });

    Some(limiter)
}

#[cfg(not(feature = "rate-limit"))]
fn lead_limiter(_config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    tracing::warn!("Built without rate-limit feature - lead submissions are not throttled");
    None
}
