// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A student's record of answers to one quiz. Stored in the 'quiz_attempts' table.
/// At most one exists per (user_id, quiz_id).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub quiz_id: i64,

    /// Selected option per question; `None` means unanswered.
    pub answers: Vec<Option<u32>>,

    /// Only ever moves from false to true.
    pub completed: bool,

    /// Number of correct answers. Stays 0 until the attempt is completed.
    pub score: i32,

    /// Correct indices the attempt was graded against.
    #[serde(skip)]
    pub answer_key: Option<Vec<u32>>,

    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    /// Optimistic-lock counter, bumped on every update.
    #[serde(skip)]
    pub version: i32,
}

/// Fields for the first save of an attempt.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub user_id: i64,
    pub course_id: i64,
    pub quiz_id: i64,
    pub answers: Vec<Option<u32>>,
    pub completed: bool,
    pub score: i32,
    pub answer_key: Option<Vec<u32>>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// DTO for `POST /quiz-attempt/save`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveAttemptRequest {
    pub quiz_id: i64,
    pub course_id: i64,
    #[serde(default)]
    pub answers: Vec<Option<u32>>,
    #[serde(default)]
    pub completed: bool,
}

/// Grade summary attached to completed attempts.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub score: i32,
    pub total_questions: usize,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
}

impl AttemptResult {
    /// Graded against the key snapshot, so later quiz edits do not move it.
    pub fn for_attempt(attempt: &Attempt) -> Option<Self> {
        if !attempt.completed {
            return None;
        }
        let total_questions = attempt.answer_key.as_ref()?.len();
        let percentage = if total_questions == 0 {
            0
        } else {
            ((attempt.score as f64 / total_questions as f64) * 100.0).round() as u32
        };
        Some(Self {
            score: attempt.score,
            total_questions,
            percentage,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttemptResponse {
    pub success: bool,
    pub attempt: Option<Attempt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AttemptResult>,
}
