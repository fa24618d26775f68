use std::sync::Arc;

use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use gearrent::config::AppConfig;
use gearrent::handlers;
use gearrent::services::backend::rest::RestBackend;
use gearrent::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    config.validate()?;

    let backend = RestBackend::new(
        config.backend_url.clone(),
        config.backend_anon_key.clone(),
        config.request_timeout(),
    )?;
    tracing::info!(url = %config.backend_url, bucket = %config.product_image_bucket, "using hosted backend");

    let (events_tx, _) = broadcast::channel(256);

    let state = Arc::new(AppState {
        config: config.clone(),
        backend: Box::new(backend),
        events_tx,
    });

    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
