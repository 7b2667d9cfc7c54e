// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A single multiple-choice question, embedded in a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,

    /// Ordered answer options; positions are the answer indices.
    pub options: Vec<String>,

    /// Index into `options` of the correct answer.
    pub correct_answer_index: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One quiz per course. Stored in the 'quizzes' table.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub course_id: i64,
    /// Order defines question numbering and the index space of attempt answers.
    pub questions: Vec<Question>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Quiz {
    /// The correct option index for every question, in question order.
    pub fn answer_key(&self) -> Vec<u32> {
        self.questions
            .iter()
            .map(|q| q.correct_answer_index)
            .collect()
    }

    pub fn to_public(&self) -> PublicQuiz {
        PublicQuiz {
            id: self.id,
            course_id: self.course_id,
            questions: self
                .questions
                .iter()
                .map(|q| PublicQuestion {
                    text: q.text.clone(),
                    options: q.options.clone(),
                })
                .collect(),
            last_updated: self.last_updated,
        }
    }
}

/// DTO for sending a question to students (excludes answer and explanation).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub text: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: i64,
    pub course_id: i64,
    pub questions: Vec<PublicQuestion>,
    pub last_updated: DateTime<Utc>,
}

/// A quiz as returned by `GET /quiz/{courseId}`: authors see everything.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum QuizView {
    Full(Quiz),
    Public(PublicQuiz),
}

/// Incoming question. Every field is optional or defaulted at the serde level
/// so that missing fields are reported as validation failures with the
/// question index instead of a generic body rejection.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[serde(default, alias = "question")]
    #[validate(
        length(max = 1000, message = "question text is too long"),
        custom(function = validate_not_blank, message = "question text is required")
    )]
    pub text: String,

    #[serde(default)]
    #[validate(
        length(min = 2, message = "at least 2 options are required"),
        custom(function = validate_options)
    )]
    pub options: Vec<String>,

    #[serde(default, alias = "correctAnswer")]
    pub correct_answer_index: Option<u32>,

    #[validate(length(max = 2000, message = "explanation is too long"))]
    pub explanation: Option<String>,
}

/// DTO for `POST /quiz/save`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveQuizRequest {
    pub course_id: Option<i64>,
    pub questions: Option<Vec<QuestionInput>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveQuizResponse {
    pub success: bool,
    pub message: String,
    pub quiz: Quiz,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuizResponse {
    pub success: bool,
    pub quiz: QuizView,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    for opt in options {
        if opt.trim().is_empty() {
            return Err(validator::ValidationError::new("option_blank")
                .with_message("options must not be blank".into()));
        }
        if opt.chars().count() > 500 {
            return Err(validator::ValidationError::new("option_too_long")
                .with_message("options must be at most 500 characters".into()));
        }
    }
    Ok(())
}
