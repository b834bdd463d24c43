pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod reports;
pub mod services;

use axum::{http::HeaderValue, http::Method, routing::get, Router};
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
}

/// Builds the HTTP router. The frontend origin is the only origin allowed
/// by CORS; the API is read-only so only GET is exposed.
pub fn create_app(state: AppState, frontend_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/transactions", get(handlers::transactions::list_transactions))
        .route(
            "/transactions/statistics/:month",
            get(handlers::transactions::statistics),
        )
        .route(
            "/transactions/bar-chart/:month",
            get(handlers::transactions::bar_chart),
        )
        .route(
            "/transactions/pie-chart/:month",
            get(handlers::transactions::pie_chart),
        )
        .route(
            "/transactions/combined/:month",
            get(handlers::transactions::combined),
        )
        .layer(cors)
        .with_state(state)
}
