mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use nl_vidstats::config::AppConfig;
use nl_vidstats::db::build_pool;
use nl_vidstats::llm::LlmManager;
use nl_vidstats::llm::models::GenerationOptions;
use nl_vidstats::translator::Translator;
use nl_vidstats::web::{router, state::AppState};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app(dir: &std::path::Path, llm: LlmManager) -> axum::Router {
    let path = common::seed_database(dir);
    let pool = build_pool(path.to_str().unwrap(), 1).unwrap();
    let state = AppState::new(AppConfig::default(), pool, Translator::new(llm));
    router(Arc::new(state))
}

async fn ask(app: axum::Router, question: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "question": question }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn ask_returns_the_number() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), common::stub_llm("SELECT COUNT(*) FROM videos"));

    let (status, body) = ask(app, "Сколько всего видео есть в системе?").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], 3);
    assert_eq!(body["sql"], "SELECT COUNT(*) FROM videos;");
}

#[tokio::test]
async fn rejected_sql_asks_to_rephrase_without_leaking_it() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), common::stub_llm("DROP TABLE videos;"));

    let (status, body) = ask(app, "Удали таблицу").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "untrusted_output_rejected");
    assert!(!body.to_string().contains("DROP"));
}

#[tokio::test]
async fn unavailable_model_asks_to_retry() {
    let dir = tempfile::tempdir().unwrap();
    let llm = LlmManager::with_endpoint(Box::new(common::DownModel), GenerationOptions::default());
    let app = app(dir.path(), llm);

    let (status, body) = ask(app, "Сколько всего видео?").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "endpoint_unavailable");
}

#[tokio::test]
async fn blank_question_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), common::stub_llm("SELECT 1"));

    let (status, body) = ask(app, "  ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "malformed_input");
}

#[tokio::test]
async fn query_against_unknown_table_fails_at_execution() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), common::stub_llm("SELECT COUNT(*) FROM users"));

    let (status, body) = ask(app, "How many users?").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "execution_failed");
}

#[tokio::test]
async fn status_reports_model() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), common::stub_llm("SELECT 1"));

    let request = Request::builder()
        .uri("/api/status")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["model"], "stub");
    assert_eq!(body["backend"], "ollama");
}
