// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer}, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::{
    handlers::{questions, submissions, users},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the test API both at the root and under `/api`.
/// * Serves the static directory (question images) as the fallback.
/// * Applies global middleware (Trace, CORS, request timeout).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/questions", get(questions::get_questions))
        .route("/validate-test-code", get(questions::validate_test_code))
        .route("/users", post(users::register))
        .route("/submit-test", post(submissions::submit_test))
        .route("/results", get(submissions::get_result));

    let static_files = ServeDir::new(&state.config.static_dir);
    let request_timeout = state.config.request_timeout;

    Router::new()
        .merge(api_routes.clone())
        .nest("/api", api_routes)
        .fallback_service(static_files)
        // Global Middleware (applied from outside in)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
