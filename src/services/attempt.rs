// src/services/attempt.rs

use chrono::{DateTime, Utc};

use crate::{
    config::ResubmissionPolicy,
    error::AppError,
    models::{
        attempt::{Attempt, NewAttempt, SaveAttemptRequest},
        quiz::Quiz,
    },
    store::{Store, StoreError},
};

/// Counts positions where the selected option equals the correct one.
/// Unanswered positions and answers past the end of the key never match.
pub fn calculate_score(answers: &[Option<u32>], answer_key: &[u32]) -> i32 {
    answers
        .iter()
        .zip(answer_key)
        .filter(|(answer, correct)| **answer == Some(**correct))
        .count() as i32
}

/// Applies a save request to an existing attempt.
///
/// * In-progress saves only replace the answers.
/// * Final saves re-grade against the quiz's current key and snapshot it.
/// * `completed_at` is only ever written once.
fn apply_save(
    mut attempt: Attempt,
    quiz: &Quiz,
    req: &SaveAttemptRequest,
    policy: ResubmissionPolicy,
    now: DateTime<Utc>,
) -> Result<Attempt, AppError> {
    if attempt.completed {
        if !req.completed {
            return Err(AppError::Conflict(
                "Quiz attempt is already completed".to_string(),
            ));
        }
        if policy == ResubmissionPolicy::Reject {
            return Err(AppError::Conflict(
                "Quiz attempt is already completed and cannot be resubmitted".to_string(),
            ));
        }
    }

    attempt.answers = req.answers.clone();
    attempt.updated_at = now;

    if req.completed {
        let key = quiz.answer_key();
        attempt.score = calculate_score(&attempt.answers, &key);
        attempt.answer_key = Some(key);
        attempt.completed = true;
        attempt.completed_at.get_or_insert(now);
    }

    Ok(attempt)
}

fn new_attempt(
    user_id: i64,
    quiz: &Quiz,
    req: &SaveAttemptRequest,
    now: DateTime<Utc>,
) -> NewAttempt {
    let (score, answer_key, completed_at) = if req.completed {
        let key = quiz.answer_key();
        (calculate_score(&req.answers, &key), Some(key), Some(now))
    } else {
        (0, None, None)
    };

    NewAttempt {
        user_id,
        course_id: quiz.course_id,
        quiz_id: quiz.id,
        answers: req.answers.clone(),
        completed: req.completed,
        score,
        answer_key,
        started_at: now,
        completed_at,
    }
}

/// Saves (or submits) a student's attempt at a quiz.
///
/// Read-modify-write against the store. A concurrent writer shows up as a
/// `StoreError::Conflict` (unique pair on insert, stale version on update);
/// the cycle is then re-run from a fresh read, at most `max_retries` times.
pub async fn save_attempt(
    store: &dyn Store,
    policy: ResubmissionPolicy,
    max_retries: u32,
    user_id: i64,
    req: SaveAttemptRequest,
) -> Result<Attempt, AppError> {
    let quiz = store
        .find_quiz(req.quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    if quiz.course_id != req.course_id {
        return Err(AppError::BadRequest(
            "Quiz does not belong to the given course".to_string(),
        ));
    }

    if req.answers.len() > quiz.questions.len() {
        return Err(AppError::BadRequest(format!(
            "Too many answers: quiz has {} questions, got {}",
            quiz.questions.len(),
            req.answers.len()
        )));
    }

    let mut tries = 0;
    loop {
        let now = Utc::now();

        let result = match store.find_attempt(user_id, quiz.id).await? {
            Some(existing) => {
                let next = apply_save(existing, &quiz, &req, policy, now)?;
                store.update_attempt(&next).await
            }
            None => store.insert_attempt(new_attempt(user_id, &quiz, &req, now)).await,
        };

        match result {
            Ok(attempt) => {
                if attempt.completed && req.completed {
                    tracing::info!(
                        attempt_id = attempt.id,
                        user_id,
                        quiz_id = quiz.id,
                        score = attempt.score,
                        "Quiz attempt completed"
                    );
                }
                return Ok(attempt);
            }
            Err(StoreError::Conflict(msg)) if tries < max_retries => {
                tries += 1;
                tracing::warn!(
                    "Conflict saving attempt (user {}, quiz {}), retrying ({}/{}): {}",
                    user_id,
                    quiz.id,
                    tries,
                    max_retries,
                    msg
                );
            }
            Err(e) => return Err(e.into()),
        }
    }
}

pub async fn get_attempt(
    store: &dyn Store,
    user_id: i64,
    quiz_id: i64,
) -> Result<Option<Attempt>, AppError> {
    Ok(store.find_attempt(user_id, quiz_id).await?)
}
