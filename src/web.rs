use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::api::{self, AppState};
use crate::config::ServerConfig;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/city-and-airport-search/{query}",
            get(api::city_and_airport_search),
        )
        .route("/flight-search", get(api::flight_search))
        .route("/hotel-search", get(api::hotel_search))
        .route("/cost-of-living", get(api::cost_of_living_compare))
        .route("/booking", post(api::submit_booking))
        .with_state(state)
}

pub async fn run(config: &ServerConfig, state: AppState) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state)
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_seconds,
        )));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("API server running at http://localhost:{}", config.port);
    axum::serve(listener, app)
        .await
        .context("Server terminated")?;
    Ok(())
}
