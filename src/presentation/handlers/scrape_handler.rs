// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::dto::scrape_request::ScrapeRequestDto;
use crate::application::usecases::create_scrape::CreateScrapeUseCase;
use crate::presentation::errors::ApiError;

/// 接收抓取请求
///
/// 任务写入后立即返回201，抓取由后台工作器异步完成
pub async fn create_scrape(
    Extension(use_case): Extension<Arc<CreateScrapeUseCase>>,
    Json(payload): Json<ScrapeRequestDto>,
) -> Result<impl IntoResponse, ApiError> {
    let response = use_case.execute(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
