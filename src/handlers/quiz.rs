// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::State,
    response::IntoResponse,
};

use crate::{
    error::{AppError, ErrorResponse},
    models::quiz::{QuizResponse, QuizView, SaveQuizRequest, SaveQuizResponse},
    services::quiz as quiz_service,
    store::DynStore,
    utils::{
        extract::{AppJson, AppPath},
        jwt::Claims,
    },
};

/// Creates or replaces the quiz of a course.
///
/// * Instructor only.
/// * The whole question list is overwritten; the original author is kept.
#[utoipa::path(
    post,
    path = "/api/v1/quiz/save",
    tag = "quiz",
    request_body = SaveQuizRequest,
    responses(
        (status = 200, description = "Quiz created or updated", body = SaveQuizResponse),
        (status = 400, description = "Malformed quiz", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
    )
)]
pub async fn save_quiz(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    AppJson(req): AppJson<SaveQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let author_id = claims.user_id()?;

    let saved = quiz_service::save_quiz(store.as_ref(), author_id, req).await?;

    let message = if saved.created {
        "Quiz created successfully"
    } else {
        "Quiz updated successfully"
    };

    Ok(Json(SaveQuizResponse {
        success: true,
        message: message.to_string(),
        quiz: saved.quiz,
    }))
}

/// Fetches the quiz of a course.
///
/// Students receive the questions without answers or explanations.
#[utoipa::path(
    get,
    path = "/api/v1/quiz/{course_id}",
    tag = "quiz",
    params(("course_id" = i64, Path, description = "Course the quiz belongs to")),
    responses(
        (status = 200, description = "The course quiz", body = QuizResponse),
        (status = 404, description = "No quiz for this course", body = ErrorResponse),
    )
)]
pub async fn get_quiz_by_course(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    AppPath(course_id): AppPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = quiz_service::get_quiz_by_course(store.as_ref(), course_id).await?;

    let quiz = if claims.can_author() {
        QuizView::Full(quiz)
    } else {
        QuizView::Public(quiz.to_public())
    };

    Ok(Json(QuizResponse {
        success: true,
        quiz,
    }))
}
