// src/handlers/attempt.rs

use axum::{
    Extension, Json,
    extract::State,
    response::IntoResponse,
};

use crate::{
    config::Config,
    error::{AppError, ErrorResponse},
    models::attempt::{AttemptResponse, AttemptResult, SaveAttemptRequest},
    services::attempt as attempt_service,
    store::DynStore,
    utils::{
        extract::{AppJson, AppPath},
        jwt::Claims,
    },
};

/// Saves progress on, or submits, the caller's attempt at a quiz.
///
/// * Student only.
/// * `completed: true` grades the attempt against the quiz's answer key.
/// * Saving a completed attempt is a 409 unless resubmission is enabled.
#[utoipa::path(
    post,
    path = "/api/v1/quiz-attempt/save",
    tag = "quiz-attempt",
    request_body = SaveAttemptRequest,
    responses(
        (status = 200, description = "Attempt saved", body = AttemptResponse),
        (status = 400, description = "Malformed attempt", body = ErrorResponse),
        (status = 404, description = "Quiz not found", body = ErrorResponse),
        (status = 409, description = "Attempt already completed", body = ErrorResponse),
    )
)]
pub async fn save_attempt(
    State(store): State<DynStore>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<SaveAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let attempt = attempt_service::save_attempt(
        store.as_ref(),
        config.resubmission,
        config.attempt_save_retries,
        user_id,
        req,
    )
    .await?;

    Ok(Json(AttemptResponse {
        success: true,
        result: AttemptResult::for_attempt(&attempt),
        attempt: Some(attempt),
    }))
}

/// Returns the caller's attempt at a quiz, or `attempt: null` if none yet.
#[utoipa::path(
    get,
    path = "/api/v1/quiz-attempt/{quiz_id}",
    tag = "quiz-attempt",
    params(("quiz_id" = i64, Path, description = "Quiz the attempt belongs to")),
    responses(
        (status = 200, description = "The attempt, or null", body = AttemptResponse),
    )
)]
pub async fn get_attempt(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    AppPath(quiz_id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let attempt = attempt_service::get_attempt(store.as_ref(), user_id, quiz_id).await?;

    Ok(Json(AttemptResponse {
        success: true,
        result: attempt.as_ref().and_then(AttemptResult::for_attempt),
        attempt,
    }))
}
