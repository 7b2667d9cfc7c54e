// src/store/mod.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    attempt::{Attempt, NewAttempt},
    quiz::{Question, Quiz},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness or version check failed; the caller may re-read and retry.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Result of an upsert: the stored quiz and whether it was newly created.
#[derive(Debug, Clone)]
pub struct SavedQuiz {
    pub quiz: Quiz,
    pub created: bool,
}

/// Persistence for quizzes and attempts.
#[async_trait]
pub trait Store: Send + Sync {
    async fn course_exists(&self, course_id: i64) -> Result<bool, StoreError>;

    /// Creates the course's quiz or replaces its questions. `created_by` is
    /// only written on creation.
    async fn upsert_quiz(
        &self,
        course_id: i64,
        questions: &[Question],
        author_id: i64,
        now: DateTime<Utc>,
    ) -> Result<SavedQuiz, StoreError>;

    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, StoreError>;

    async fn find_quiz_by_course(&self, course_id: i64) -> Result<Option<Quiz>, StoreError>;

    async fn find_attempt(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<Option<Attempt>, StoreError>;

    /// Fails with `StoreError::Conflict` if an attempt for the pair already exists.
    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<Attempt, StoreError>;

    /// Writes the mutable fields of `attempt` if the stored version still
    /// equals `attempt.version`; fails with `StoreError::Conflict` otherwise.
    async fn update_attempt(&self, attempt: &Attempt) -> Result<Attempt, StoreError>;
}

pub type DynStore = Arc<dyn Store>;
