// src/store/memory.rs

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{SavedQuiz, Store, StoreError};
use crate::models::{
    attempt::{Attempt, NewAttempt},
    quiz::{Question, Quiz},
};

#[derive(Default)]
struct Inner {
    courses: HashSet<i64>,
    quizzes: HashMap<i64, Quiz>,
    quiz_by_course: HashMap<i64, i64>,
    attempts: HashMap<(i64, i64), Attempt>,
    next_quiz_id: i64,
    next_attempt_id: i64,
}

/// In-process store with the same uniqueness and version rules as the
/// PostgreSQL schema.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given course ids registered.
    pub fn with_courses(course_ids: impl IntoIterator<Item = i64>) -> Self {
        let mut store = Self::new();
        store.inner.get_mut().courses.extend(course_ids);
        store
    }

    /// Number of stored attempts, across all users and quizzes.
    pub async fn attempt_count(&self) -> usize {
        self.inner.read().await.attempts.len()
    }

    /// Number of stored quizzes.
    pub async fn quiz_count(&self) -> usize {
        self.inner.read().await.quizzes.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn course_exists(&self, course_id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.courses.contains(&course_id))
    }

    async fn upsert_quiz(
        &self,
        course_id: i64,
        questions: &[Question],
        author_id: i64,
        now: DateTime<Utc>,
    ) -> Result<SavedQuiz, StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(quiz_id) = inner.quiz_by_course.get(&course_id).copied() {
            if let Some(quiz) = inner.quizzes.get_mut(&quiz_id) {
                quiz.questions = questions.to_vec();
                quiz.last_updated = now;
                return Ok(SavedQuiz {
                    quiz: quiz.clone(),
                    created: false,
                });
            }
        }

        inner.next_quiz_id += 1;
        let quiz = Quiz {
            id: inner.next_quiz_id,
            course_id,
            questions: questions.to_vec(),
            created_by: author_id,
            created_at: now,
            last_updated: now,
        };
        inner.quiz_by_course.insert(course_id, quiz.id);
        inner.quizzes.insert(quiz.id, quiz.clone());

        Ok(SavedQuiz {
            quiz,
            created: true,
        })
    }

    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, StoreError> {
        Ok(self.inner.read().await.quizzes.get(&quiz_id).cloned())
    }

    async fn find_quiz_by_course(&self, course_id: i64) -> Result<Option<Quiz>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .quiz_by_course
            .get(&course_id)
            .and_then(|id| inner.quizzes.get(id))
            .cloned())
    }

    async fn find_attempt(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<Option<Attempt>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .attempts
            .get(&(user_id, quiz_id))
            .cloned())
    }

    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<Attempt, StoreError> {
        let mut inner = self.inner.write().await;
        let key = (attempt.user_id, attempt.quiz_id);

        if inner.attempts.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "Attempt for user {} and quiz {} already exists",
                attempt.user_id, attempt.quiz_id
            )));
        }

        inner.next_attempt_id += 1;
        let stored = Attempt {
            id: inner.next_attempt_id,
            user_id: attempt.user_id,
            course_id: attempt.course_id,
            quiz_id: attempt.quiz_id,
            answers: attempt.answers,
            completed: attempt.completed,
            score: attempt.score,
            answer_key: attempt.answer_key,
            started_at: attempt.started_at,
            completed_at: attempt.completed_at,
            updated_at: attempt.started_at,
            version: 0,
        };
        inner.attempts.insert(key, stored.clone());

        Ok(stored)
    }

    async fn update_attempt(&self, attempt: &Attempt) -> Result<Attempt, StoreError> {
        let mut inner = self.inner.write().await;

        let stored = inner
            .attempts
            .get_mut(&(attempt.user_id, attempt.quiz_id))
            .filter(|stored| stored.id == attempt.id && stored.version == attempt.version)
            .ok_or_else(|| {
                StoreError::Conflict(format!("Attempt {} was modified concurrently", attempt.id))
            })?;

        stored.answers = attempt.answers.clone();
        stored.completed = attempt.completed;
        stored.score = attempt.score;
        stored.answer_key = attempt.answer_key.clone();
        stored.completed_at = attempt.completed_at;
        stored.updated_at = attempt.updated_at;
        stored.version += 1;

        Ok(stored.clone())
    }
}
