// src/services/quiz.rs

use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{Question, QuestionInput, Quiz, SaveQuizRequest},
    store::{SavedQuiz, Store},
};

/// Checks every incoming question and converts it to its stored form.
///
/// Fails on the first malformed question, naming its index.
pub fn validate_questions(inputs: Vec<QuestionInput>) -> Result<Vec<Question>, AppError> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            let invalid = |reason: String| {
                AppError::BadRequest(format!("Invalid question format at index {}: {}", i, reason))
            };

            input.validate().map_err(|e| invalid(e.to_string()))?;

            let index = input
                .correct_answer_index
                .ok_or_else(|| invalid("correctAnswerIndex is required".to_string()))?;

            if index as usize >= input.options.len() {
                return Err(invalid(format!(
                    "correctAnswerIndex {} is out of range for {} options",
                    index,
                    input.options.len()
                )));
            }

            Ok(Question {
                text: input.text,
                options: input.options,
                correct_answer_index: index,
                explanation: input.explanation,
            })
        })
        .collect()
}

/// Creates or fully replaces the quiz of a course.
pub async fn save_quiz(
    store: &dyn Store,
    author_id: i64,
    req: SaveQuizRequest,
) -> Result<SavedQuiz, AppError> {
    let (Some(course_id), Some(inputs)) = (req.course_id, req.questions) else {
        return Err(AppError::BadRequest(
            "Invalid request: courseId and questions array are required".to_string(),
        ));
    };

    let questions = validate_questions(inputs)?;

    if !store.course_exists(course_id).await? {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let saved = store
        .upsert_quiz(course_id, &questions, author_id, Utc::now())
        .await?;

    tracing::info!(
        quiz_id = saved.quiz.id,
        course_id,
        questions = questions.len(),
        created = saved.created,
        "Quiz saved"
    );

    Ok(saved)
}

pub async fn get_quiz_by_course(store: &dyn Store, course_id: i64) -> Result<Quiz, AppError> {
    store
        .find_quiz_by_course(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
}
