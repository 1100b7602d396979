// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;
use crate::config::settings::DEFAULT_USER_AGENT;
use axum::{
    http::{HeaderMap as AxumHeaders, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;

async fn start_test_server() -> String {
    let app = Router::new()
        .route(
            "/test",
            get(|| async {
                Response::builder()
                    .header("content-type", "text/html")
                    .body("<html><body>Test content</body></html>".to_string())
                    .unwrap()
            }),
        )
        .route(
            "/ua",
            get(|headers: AxumHeaders| async move {
                headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "late"
            }),
        )
        .route(
            "/error",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR.into_response() }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_reqwest_engine_basic_scraping() {
    let server_url = start_test_server().await;
    let engine = ReqwestEngine::new(DEFAULT_USER_AGENT).unwrap();

    let request = ScrapeRequest::get(format!("{}/test", server_url), Duration::from_secs(10));
    let response = engine.scrape(&request).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert!(response.is_ok());
    assert!(response.content.contains("Test content"));
}

#[tokio::test]
async fn test_reqwest_engine_sends_browser_user_agent() {
    let server_url = start_test_server().await;
    let engine = ReqwestEngine::new(DEFAULT_USER_AGENT).unwrap();

    let request = ScrapeRequest::get(format!("{}/ua", server_url), Duration::from_secs(10));
    let response = engine.scrape(&request).await.unwrap();

    assert!(response.content.contains("Chrome/"));
}

#[tokio::test]
async fn test_reqwest_engine_returns_error_status_without_failing() {
    let server_url = start_test_server().await;
    let engine = ReqwestEngine::new(DEFAULT_USER_AGENT).unwrap();

    let request = ScrapeRequest::get(format!("{}/error", server_url), Duration::from_secs(10));
    let response = engine.scrape(&request).await.unwrap();

    assert_eq!(response.status_code, 500);
    assert!(!response.is_ok());
}

#[tokio::test]
async fn test_reqwest_engine_times_out() {
    let server_url = start_test_server().await;
    let engine = ReqwestEngine::new(DEFAULT_USER_AGENT).unwrap();

    let request = ScrapeRequest::get(format!("{}/slow", server_url), Duration::from_millis(200));
    let err = engine.scrape(&request).await.unwrap_err();

    assert!(matches!(err, EngineError::Timeout));
    assert!(err.is_retryable());
}

#[test]
fn test_support_score() {
    let engine = ReqwestEngine::new(DEFAULT_USER_AGENT).unwrap();
    let request = ScrapeRequest::get("http://example.com", Duration::from_secs(10));
    assert_eq!(engine.support_score(&request), 100);

    for url in ["example.com", "/about", "ftp://example.com/file", "mailto:jane@acme.co"] {
        let request = ScrapeRequest::get(url, Duration::from_secs(10));
        assert_eq!(engine.support_score(&request), 0, "{}", url);
    }
    assert_eq!(engine.name(), "reqwest");
}
