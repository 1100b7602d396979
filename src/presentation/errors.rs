// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::usecases::create_scrape::CreateScrapeError;
use crate::application::usecases::download_report::DownloadReportError;
use crate::application::usecases::query_tasks::QueryError;

/// API错误类型
///
/// 统一映射为HTTP状态码和`{"error": "..."}`响应体
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::Internal(e) => {
                error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<CreateScrapeError> for ApiError {
    fn from(err: CreateScrapeError) -> Self {
        match err {
            CreateScrapeError::Validation(message) => ApiError::BadRequest(message),
            CreateScrapeError::Repository(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::TaskNotFound | QueryError::ResultNotFound => {
                ApiError::NotFound(err.to_string())
            }
            QueryError::ResultNotReady => ApiError::Conflict(err.to_string()),
            QueryError::Repository(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<DownloadReportError> for ApiError {
    fn from(err: DownloadReportError) -> Self {
        match err {
            DownloadReportError::TaskNotFound | DownloadReportError::ReportNotFound => {
                ApiError::NotFound(err.to_string())
            }
            DownloadReportError::NotCompleted => ApiError::BadRequest(err.to_string()),
            DownloadReportError::Repository(e) => ApiError::Internal(e.into()),
            DownloadReportError::Storage(e) => ApiError::Internal(e.into()),
        }
    }
}
