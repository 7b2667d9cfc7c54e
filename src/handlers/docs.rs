// src/handlers/docs.rs

use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::{
    error::ErrorResponse,
    handlers::{attempt, quiz},
    models::{
        attempt::{Attempt, AttemptResponse, AttemptResult, SaveAttemptRequest},
        quiz::{
            PublicQuestion, PublicQuiz, Question, QuestionInput, Quiz, QuizResponse, QuizView,
            SaveQuizRequest, SaveQuizResponse,
        },
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        quiz::save_quiz,
        quiz::get_quiz_by_course,
        attempt::save_attempt,
        attempt::get_attempt,
    ),
    components(schemas(
        Question,
        QuestionInput,
        Quiz,
        PublicQuestion,
        PublicQuiz,
        QuizView,
        SaveQuizRequest,
        SaveQuizResponse,
        QuizResponse,
        Attempt,
        AttemptResult,
        AttemptResponse,
        SaveAttemptRequest,
        ErrorResponse,
    )),
    tags(
        (name = "quiz", description = "Course quiz authoring and retrieval"),
        (name = "quiz-attempt", description = "Student attempts and grading"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
