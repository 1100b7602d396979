// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;

use crate::application::dto::scrape_response::ScrapeResultDto;
use crate::application::usecases::query_tasks::QueryTasksUseCase;
use crate::domain::models::task::Task;
use crate::presentation::errors::ApiError;

/// 列出所有任务
pub async fn list_tasks(
    Extension(use_case): Extension<Arc<QueryTasksUseCase>>,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(use_case.list().await?))
}

/// 查询单个任务
pub async fn get_task(
    Extension(use_case): Extension<Arc<QueryTasksUseCase>>,
    Path(task_id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(use_case.get_task(task_id).await?))
}

/// 查询任务结果
pub async fn get_result(
    Extension(use_case): Extension<Arc<QueryTasksUseCase>>,
    Path(task_id): Path<i32>,
) -> Result<Json<ScrapeResultDto>, ApiError> {
    Ok(Json(use_case.get_result(task_id).await?))
}
