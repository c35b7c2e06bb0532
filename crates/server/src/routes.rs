pub mod coffees;

use std::path::Path;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)),
    tag = "health"
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn coffee_routes() -> Router<AppState> {
    Router::new()
        .route("/coffees", get(coffees::list).post(coffees::create))
        .route("/coffees/:id", put(coffees::update).delete(coffees::delete))
        .route("/coffees/:id/vote", post(coffees::vote))
}

/// Build the application router: JSON API (at the root and under `/api`),
/// the two HTML pages and `/static` assets from `static_dir`.
pub fn build_router(state: AppState, static_dir: &str) -> Router {
    let dir = Path::new(static_dir);

    let pages = Router::new()
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .route_service("/admin-secret-panel", ServeFile::new(dir.join("admin.html")))
        .nest_service("/static", ServeDir::new(dir));

    Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_json))
        .merge(coffee_routes())
        .nest("/api", coffee_routes())
        .with_state(state)
        .merge(pages)
        .layer(CorsLayer::very_permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
