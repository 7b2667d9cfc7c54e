// tests/quiz_api_tests.rs

use std::sync::Arc;

use quiz_backend::{
    config::{Config, ResubmissionPolicy},
    routes,
    state::AppState,
    store::MemoryStore,
    utils::jwt::{ROLE_INSTRUCTOR, ROLE_STUDENT, sign_jwt},
};

const SECRET: &str = "test_secret_for_quiz_tests";

/// Helper function to spawn the app on a random port for testing.
/// Courses 1 and 2 exist. Returns the base URL and the backing store.
async fn spawn_app() -> (String, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_courses([1, 2]));

    let config = Config {
        database_url: String::new(),
        jwt_secret: SECRET.to_string(),
        rust_log: "error".to_string(),
        port: 0,
        log_dir: "logs".to_string(),
        resubmission: ResubmissionPolicy::Reject,
        attempt_save_retries: 3,
    };

    let state = AppState {
        store: store.clone(),
        config,
    };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, store)
}

fn token(user_id: i64, role: &str) -> String {
    sign_jwt(user_id, role, SECRET, 600).unwrap()
}

fn sample_questions() -> serde_json::Value {
    serde_json::json!([
        {
            "text": "Which planet is known as the red planet?",
            "options": ["Venus", "Mars", "Jupiter"],
            "correctAnswerIndex": 1,
            "explanation": "Iron oxide on its surface."
        },
        {
            "text": "2 + 2 = ?",
            "options": ["4", "5"],
            "correctAnswerIndex": 0
        }
    ])
}

#[tokio::test]
async fn unknown_path_returns_404() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn save_quiz_requires_token() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/v1/quiz/save", address))
        .json(&serde_json::json!({ "courseId": 1, "questions": sample_questions() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn save_quiz_is_instructor_only() {
    let (address, store) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/v1/quiz/save", address))
        .bearer_auth(token(5, ROLE_STUDENT))
        .json(&serde_json::json!({ "courseId": 1, "questions": sample_questions() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(store.quiz_count().await, 0);
}

#[tokio::test]
async fn save_quiz_creates_then_replaces() {
    let (address, store) = spawn_app().await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/v1/quiz/save", address);

    // Arrange + Act: first save creates
    let created: serde_json::Value = client
        .post(&url)
        .bearer_auth(token(10, ROLE_INSTRUCTOR))
        .json(&serde_json::json!({ "courseId": 1, "questions": sample_questions() }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Quiz created successfully");
    assert_eq!(created["quiz"]["courseId"], 1);
    assert_eq!(created["quiz"]["createdBy"], 10);
    assert_eq!(created["quiz"]["questions"].as_array().unwrap().len(), 2);

    // Second save by another instructor replaces the questions, keeps the author
    let updated: serde_json::Value = client
        .post(&url)
        .bearer_auth(token(11, ROLE_INSTRUCTOR))
        .json(&serde_json::json!({
            "courseId": 1,
            "questions": [{ "text": "Only one now", "options": ["a", "b", "c"], "correctAnswerIndex": 2 }]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated["message"], "Quiz updated successfully");
    assert_eq!(updated["quiz"]["id"], created["quiz"]["id"]);
    assert_eq!(updated["quiz"]["createdBy"], 10);
    assert_eq!(updated["quiz"]["questions"].as_array().unwrap().len(), 1);
    assert_eq!(store.quiz_count().await, 1);
}

#[tokio::test]
async fn save_quiz_accepts_legacy_field_names() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/v1/quiz/save", address))
        .bearer_auth(token(10, ROLE_INSTRUCTOR))
        .json(&serde_json::json!({
            "courseId": 2,
            "questions": [{ "question": "Legacy?", "options": ["yes", "no"], "correctAnswer": 0 }]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["quiz"]["questions"][0]["text"], "Legacy?");
    assert_eq!(body["quiz"]["questions"][0]["correctAnswerIndex"], 0);
}

#[tokio::test]
async fn save_quiz_rejects_malformed_questions() {
    let (address, store) = spawn_app().await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/v1/quiz/save", address);

    let bad_bodies = [
        // index out of range
        serde_json::json!({ "courseId": 1, "questions": [{ "text": "q", "options": ["a", "b"], "correctAnswerIndex": 2 }] }),
        // too few options
        serde_json::json!({ "courseId": 1, "questions": [{ "text": "q", "options": ["a"], "correctAnswerIndex": 0 }] }),
        // missing text
        serde_json::json!({ "courseId": 1, "questions": [{ "options": ["a", "b"], "correctAnswerIndex": 0 }] }),
        // non-integer index
        serde_json::json!({ "courseId": 1, "questions": [{ "text": "q", "options": ["a", "b"], "correctAnswerIndex": 0.5 }] }),
        // questions not an array
        serde_json::json!({ "courseId": 1, "questions": "nope" }),
        // missing courseId
        serde_json::json!({ "questions": sample_questions() }),
    ];

    for body in bad_bodies {
        let response = client
            .post(&url)
            .bearer_auth(token(10, ROLE_INSTRUCTOR))
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400, "body: {}", body);
        let json: serde_json::Value = response.json().await.unwrap();
        assert_eq!(json["success"], false);
        assert!(json["message"].is_string());
    }

    assert_eq!(store.quiz_count().await, 0);
}

#[tokio::test]
async fn save_quiz_for_unknown_course_is_404() {
    let (address, store) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/v1/quiz/save", address))
        .bearer_auth(token(10, ROLE_INSTRUCTOR))
        .json(&serde_json::json!({ "courseId": 999, "questions": sample_questions() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Course not found");
    assert_eq!(store.quiz_count().await, 0);
}

#[tokio::test]
async fn get_quiz_hides_answers_from_students() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(&format!("{}/api/v1/quiz/save", address))
        .bearer_auth(token(10, ROLE_INSTRUCTOR))
        .json(&serde_json::json!({ "courseId": 1, "questions": sample_questions() }))
        .send()
        .await
        .unwrap();

    let url = format!("{}/api/v1/quiz/1", address);

    let student_view: serde_json::Value = client
        .get(&url)
        .bearer_auth(token(5, ROLE_STUDENT))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(student_view["success"], true);
    let question = &student_view["quiz"]["questions"][0];
    assert_eq!(question["options"].as_array().unwrap().len(), 3);
    assert!(question.get("correctAnswerIndex").is_none());
    assert!(question.get("explanation").is_none());

    let author_view: serde_json::Value = client
        .get(&url)
        .bearer_auth(token(10, ROLE_INSTRUCTOR))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(author_view["quiz"]["questions"][0]["correctAnswerIndex"], 1);
    assert_eq!(author_view["quiz"]["id"], student_view["quiz"]["id"]);
}

#[tokio::test]
async fn get_missing_quiz_is_404() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/v1/quiz/2", address))
        .bearer_auth(token(5, ROLE_STUDENT))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Quiz not found");
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let (address, _) = spawn_app().await;

    let doc: serde_json::Value = reqwest::get(&format!("{}/api/v1/openapi.json", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(doc["paths"].get("/api/v1/quiz/save").is_some());
    assert!(doc["paths"].get("/api/v1/quiz-attempt/{quiz_id}").is_some());
}

#[tokio::test]
async fn non_numeric_course_id_is_400_envelope() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/v1/quiz/abc", address))
        .bearer_auth(token(5, ROLE_STUDENT))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/json"));
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("abc"));
}
