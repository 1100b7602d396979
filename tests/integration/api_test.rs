// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{test_db, TestDb};
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use siteprofiler::domain::models::record::ExtractedRecord;
use siteprofiler::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use siteprofiler::domain::repositories::storage_repository::ReportStore;
use siteprofiler::domain::repositories::task_repository::TaskRepository;
use siteprofiler::infrastructure::storage::LocalReportStore;
use siteprofiler::presentation::routes;
use std::sync::Arc;
use tempfile::TempDir;

struct TestApp {
    server: TestServer,
    env: TestDb,
    store: Arc<LocalReportStore>,
    _report_dir: TempDir,
}

async fn create_test_app() -> TestApp {
    let env = test_db().await;
    let report_dir = TempDir::new().unwrap();
    let store = Arc::new(LocalReportStore::new(report_dir.path()));

    let app = routes::app(env.task_repo.clone(), env.result_repo.clone(), store.clone());
    TestApp {
        server: TestServer::new(app).unwrap(),
        env,
        store,
        _report_dir: report_dir,
    }
}

/// 创建一个已处于运行状态的任务
async fn running_task(app: &TestApp, url: &str) -> i32 {
    let task = app.env.task_repo.create(url).await.unwrap();
    let claimed = app.env.task_repo.acquire_next().await.unwrap().unwrap();
    assert_eq!(claimed.id, task.id);
    task.id
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "status": "healthy",
        "message": "Web scraping service is running"
    }));
}

#[tokio::test]
async fn test_create_scrape_returns_queued_task() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/scrape")
        .json(&json!({ "url": "https://acme.co" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["status"], "queued");
    let task_id = body["task_id"].as_i64().unwrap();

    let response = app.server.get(&format!("/tasks/{}", task_id)).await;
    response.assert_status_ok();
    let task: Value = response.json();
    assert_eq!(task["url"], "https://acme.co");
    assert_eq!(task["status"], "queued");

    let tasks: Value = app.server.get("/tasks").await.json();
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_scrape_rejects_invalid_urls() {
    let app = create_test_app().await;

    for url in ["not a url", "ftp://files.acme.co", ""] {
        let response = app.server.post("/scrape").json(&json!({ "url": url })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }

    assert!(app.env.task_repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let app = create_test_app().await;

    for route in ["/tasks/999", "/result/999", "/download-report/999"] {
        let response = app.server.get(route).await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "error": "Task not found" }));
    }
}

#[tokio::test]
async fn test_result_of_unfinished_task_is_not_ready() {
    let app = create_test_app().await;
    let task = app.env.task_repo.create("https://acme.co").await.unwrap();

    let response = app.server.get(&format!("/result/{}", task.id)).await;
    response.assert_status(StatusCode::CONFLICT);
    response.assert_json(&json!({ "error": "Result not ready" }));

    let response = app.server.get(&format!("/download-report/{}", task.id)).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Task not completed yet" }));
}

#[tokio::test]
async fn test_failed_task_has_no_result() {
    let app = create_test_app().await;
    let task_id = running_task(&app, "https://acme.co").await;
    app.env.task_repo.mark_failed(task_id).await.unwrap();

    let response = app.server.get(&format!("/result/{}", task_id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Result not found" }));
}

#[tokio::test]
async fn test_completed_task_serves_result_and_report() {
    let app = create_test_app().await;
    let task_id = running_task(&app, "https://acme.co").await;

    let mut record = ExtractedRecord::empty("https://acme.co");
    record.company = Some("Acme Widgets".to_string());
    app.env
        .result_repo
        .save(task_id, &[record.stamp(task_id, 1)])
        .await
        .unwrap();

    let pdf = b"%PDF-1.3 fake report".to_vec();
    let location = app
        .store
        .save(
            &format!("scraping_report_{}_20240102_030405.pdf", task_id),
            &pdf,
        )
        .await
        .unwrap();
    app.env
        .task_repo
        .mark_completed(task_id, Some(location.display().to_string()))
        .await
        .unwrap();

    let response = app.server.get(&format!("/result/{}", task_id)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["task_id"], task_id);
    assert_eq!(body["data"][0]["company"], "Acme Widgets");
    assert_eq!(body["data"][0]["provenance"]["page_number"], 1);

    let response = app
        .server
        .get(&format!("/download-report/{}", task_id))
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(
        response.header("content-disposition"),
        format!("attachment; filename=scraping_report_task_{}.pdf", task_id).as_str()
    );
    assert_eq!(response.header("cache-control"), "no-cache");
    assert_eq!(response.as_bytes().to_vec(), pdf);
}

#[tokio::test]
async fn test_completed_task_without_report_file() {
    let app = create_test_app().await;
    let task_id = running_task(&app, "https://acme.co").await;
    app.env.task_repo.mark_completed(task_id, None).await.unwrap();

    let response = app
        .server
        .get(&format!("/download-report/{}", task_id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Report not found" }));
}
