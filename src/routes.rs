// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{fields, health, sanitize},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Sanitize and policy endpoints under `/api`.
/// * Field cleaning and widget rendering under `/api/fields`.
/// * Global middleware: body limit, Trace, CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(&state.config.allowed_origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let field_routes = Router::new()
        .route("/{kind}/clean", post(fields::clean_field))
        .route("/{kind}/widget", get(fields::render_widget));

    let api_routes = Router::new()
        .route("/sanitize", post(sanitize::sanitize_text))
        .route("/policies/{preset}", get(sanitize::get_policy))
        .nest("/fields", field_routes);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(state.config.max_body_bytes)),
        )
        .with_state(state)
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|origin| origin == "*") {
        return AllowOrigin::any();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    AllowOrigin::list(parsed)
}
