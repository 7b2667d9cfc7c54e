// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use super::{SavedQuiz, Store, StoreError};
use crate::models::{
    attempt::{Attempt, NewAttempt},
    quiz::{Question, Quiz},
};

const QUIZ_COLUMNS: &str = "id, course_id, questions, created_by, created_at, last_updated";

const ATTEMPT_COLUMNS: &str = "id, user_id, course_id, quiz_id, answers, completed, score, \
     answer_key, started_at, completed_at, updated_at, version";

/// Row of the 'quizzes' table. Questions live in a JSONB column.
#[derive(Debug, FromRow)]
struct QuizRow {
    id: i64,
    course_id: i64,
    questions: Json<Vec<Question>>,
    created_by: i64,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl From<QuizRow> for Quiz {
    fn from(row: QuizRow) -> Self {
        Quiz {
            id: row.id,
            course_id: row.course_id,
            questions: row.questions.0,
            created_by: row.created_by,
            created_at: row.created_at,
            last_updated: row.last_updated,
        }
    }
}

#[derive(Debug, FromRow)]
struct UpsertedQuizRow {
    #[sqlx(flatten)]
    quiz: QuizRow,
    inserted: bool,
}

/// Row of the 'quiz_attempts' table.
#[derive(Debug, FromRow)]
struct AttemptRow {
    id: i64,
    user_id: i64,
    course_id: i64,
    quiz_id: i64,
    answers: Json<Vec<Option<u32>>>,
    completed: bool,
    score: i32,
    answer_key: Option<Json<Vec<u32>>>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
    version: i32,
}

impl From<AttemptRow> for Attempt {
    fn from(row: AttemptRow) -> Self {
        Attempt {
            id: row.id,
            user_id: row.user_id,
            course_id: row.course_id,
            quiz_id: row.quiz_id,
            answers: row.answers.0,
            completed: row.completed,
            score: row.score,
            answer_key: row.answer_key.map(|key| key.0),
            started_at: row.started_at,
            completed_at: row.completed_at,
            updated_at: row.updated_at,
            version: row.version,
        }
    }
}

/// PostgreSQL-backed store. Uniqueness is enforced by the schema
/// (`uq_quizzes_course`, `uq_quiz_attempts_user_quiz`).
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn course_exists(&self, course_id: i64) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn upsert_quiz(
        &self,
        course_id: i64,
        questions: &[Question],
        author_id: i64,
        now: DateTime<Utc>,
    ) -> Result<SavedQuiz, StoreError> {
        // xmax is 0 only for rows this statement inserted.
        let sql = format!(
            r#"
            INSERT INTO quizzes (course_id, questions, created_by, created_at, last_updated)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (course_id) DO UPDATE SET
                questions = EXCLUDED.questions,
                last_updated = EXCLUDED.last_updated
            RETURNING {QUIZ_COLUMNS}, (xmax = 0) AS inserted
            "#
        );

        let row: UpsertedQuizRow = sqlx::query_as(&sql)
            .bind(course_id)
            .bind(Json(questions))
            .bind(author_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(SavedQuiz {
            created: row.inserted,
            quiz: row.quiz.into(),
        })
    }

    async fn find_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, StoreError> {
        let sql = format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1");
        let row: Option<QuizRow> = sqlx::query_as(&sql)
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Quiz::from))
    }

    async fn find_quiz_by_course(&self, course_id: i64) -> Result<Option<Quiz>, StoreError> {
        let sql = format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE course_id = $1");
        let row: Option<QuizRow> = sqlx::query_as(&sql)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Quiz::from))
    }

    async fn find_attempt(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> Result<Option<Attempt>, StoreError> {
        let sql =
            format!("SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts WHERE user_id = $1 AND quiz_id = $2");
        let row: Option<AttemptRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Attempt::from))
    }

    async fn insert_attempt(&self, attempt: NewAttempt) -> Result<Attempt, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO quiz_attempts
            (user_id, course_id, quiz_id, answers, completed, score, answer_key,
             started_at, completed_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $8)
            RETURNING {ATTEMPT_COLUMNS}
            "#
        );

        let row: AttemptRow = sqlx::query_as(&sql)
            .bind(attempt.user_id)
            .bind(attempt.course_id)
            .bind(attempt.quiz_id)
            .bind(Json(&attempt.answers))
            .bind(attempt.completed)
            .bind(attempt.score)
            .bind(attempt.answer_key.as_ref().map(Json))
            .bind(attempt.started_at)
            .bind(attempt.completed_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db) if db.is_unique_violation() => StoreError::Conflict(format!(
                    "Attempt for user {} and quiz {} already exists",
                    attempt.user_id, attempt.quiz_id
                )),
                _ => StoreError::Database(e),
            })?;

        Ok(row.into())
    }

    async fn update_attempt(&self, attempt: &Attempt) -> Result<Attempt, StoreError> {
        let sql = format!(
            r#"
            UPDATE quiz_attempts SET
                answers = $1,
                completed = $2,
                score = $3,
                answer_key = $4,
                completed_at = $5,
                updated_at = $6,
                version = version + 1
            WHERE id = $7 AND version = $8
            RETURNING {ATTEMPT_COLUMNS}
            "#
        );

        let row: Option<AttemptRow> = sqlx::query_as(&sql)
            .bind(Json(&attempt.answers))
            .bind(attempt.completed)
            .bind(attempt.score)
            .bind(attempt.answer_key.as_ref().map(Json))
            .bind(attempt.completed_at)
            .bind(attempt.updated_at)
            .bind(attempt.id)
            .bind(attempt.version)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Attempt::from).ok_or_else(|| {
            StoreError::Conflict(format!("Attempt {} was modified concurrently", attempt.id))
        })
    }
}
