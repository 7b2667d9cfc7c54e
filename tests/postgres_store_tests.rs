// tests/postgres_store_tests.rs
//
// Runs against a real database when DATABASE_URL is set; skipped otherwise.

use chrono::Utc;
use quiz_backend::{
    models::{attempt::NewAttempt, quiz::Question},
    store::{PgStore, Store, StoreError},
};
use sqlx::postgres::PgPoolOptions;

async fn connect() -> Option<PgStore> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    Some(PgStore::new(pool))
}

async fn create_course(store: &PgStore) -> i64 {
    sqlx::query_scalar("INSERT INTO courses (title) VALUES ($1) RETURNING id")
        .bind("Store test course")
        .fetch_one(store.pool())
        .await
        .unwrap()
}

fn question(correct: u32) -> Question {
    Question {
        text: "Pick one".to_string(),
        options: vec!["a".to_string(), "b".to_string()],
        correct_answer_index: correct,
        explanation: Some("because".to_string()),
    }
}

#[tokio::test]
async fn quiz_upsert_is_keyed_by_course() {
    let Some(store) = connect().await else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };
    let course_id = create_course(&store).await;

    let first = store
        .upsert_quiz(course_id, &[question(0)], 1, Utc::now())
        .await
        .unwrap();
    let second = store
        .upsert_quiz(course_id, &[question(1), question(0)], 2, Utc::now())
        .await
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.quiz.id, second.quiz.id);
    assert_eq!(second.quiz.created_by, 1);

    let found = store.find_quiz_by_course(course_id).await.unwrap().unwrap();
    assert_eq!(found.answer_key(), vec![1, 0]);
    assert_eq!(found.questions[0].explanation.as_deref(), Some("because"));
}

#[tokio::test]
async fn attempt_pair_is_unique_and_versioned() {
    let Some(store) = connect().await else {
        eprintln!("DATABASE_URL not set, skipping");
        return;
    };
    let course_id = create_course(&store).await;
    let quiz = store
        .upsert_quiz(course_id, &[question(1), question(0)], 1, Utc::now())
        .await
        .unwrap()
        .quiz;

    let new_attempt = NewAttempt {
        user_id: 77,
        course_id,
        quiz_id: quiz.id,
        answers: vec![Some(1), None],
        completed: false,
        score: 0,
        answer_key: None,
        started_at: Utc::now(),
        completed_at: None,
    };

    let inserted = store.insert_attempt(new_attempt.clone()).await.unwrap();
    assert_eq!(inserted.answers, vec![Some(1), None]);

    let dup = store.insert_attempt(new_attempt).await.unwrap_err();
    assert!(matches!(dup, StoreError::Conflict(_)));

    let mut edit = inserted.clone();
    edit.answers = vec![Some(1), Some(0)];
    edit.completed = true;
    edit.score = 2;
    edit.answer_key = Some(vec![1, 0]);
    edit.completed_at = Some(Utc::now());
    let updated = store.update_attempt(&edit).await.unwrap();
    assert_eq!(updated.version, inserted.version + 1);
    assert_eq!(updated.answer_key, Some(vec![1, 0]));

    // `inserted` is now stale.
    let stale = store.update_attempt(&inserted).await.unwrap_err();
    assert!(matches!(stale, StoreError::Conflict(_)));
}
