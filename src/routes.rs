// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{attempt, docs, quiz},
    state::AppState,
    utils::jwt::{auth_middleware, instructor_middleware, student_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quiz, quiz-attempt, docs).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Store, Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let quiz_routes = Router::new()
        .route("/{course_id}", get(quiz::get_quiz_by_course))
        // Authoring is instructor only
        .merge(
            Router::new()
                .route("/save", post(quiz::save_quiz))
                .layer(middleware::from_fn(instructor_middleware)),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Auth first, then the student check
    let attempt_routes = Router::new()
        .route("/save", post(attempt::save_attempt))
        .route("/{quiz_id}", get(attempt::get_attempt))
        .layer(middleware::from_fn(student_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/v1/quiz", quiz_routes)
        .nest("/api/v1/quiz-attempt", attempt_routes)
        .route("/api/v1/openapi.json", get(docs::openapi_json))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
