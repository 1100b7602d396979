// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use thiserror::Error;

use crate::application::dto::scrape_response::ScrapeResultDto;
use crate::domain::models::task::Task;
use crate::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};

/// 查询错误
///
/// "任务不存在"、"结果未就绪"与"结果不存在"是三种不同的结局
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Task not found")]
    TaskNotFound,
    #[error("Result not ready")]
    ResultNotReady,
    #[error("Result not found")]
    ResultNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 任务与结果的只读查询
pub struct QueryTasksUseCase {
    task_repository: Arc<dyn TaskRepository>,
    result_repository: Arc<dyn ScrapeResultRepository>,
}

impl QueryTasksUseCase {
    pub fn new(
        task_repository: Arc<dyn TaskRepository>,
        result_repository: Arc<dyn ScrapeResultRepository>,
    ) -> Self {
        Self {
            task_repository,
            result_repository,
        }
    }

    pub async fn list(&self) -> Result<Vec<Task>, QueryError> {
        Ok(self.task_repository.list().await?)
    }

    pub async fn get_task(&self, task_id: i32) -> Result<Task, QueryError> {
        self.task_repository
            .find_by_id(task_id)
            .await?
            .ok_or(QueryError::TaskNotFound)
    }

    /// 查询任务结果
    ///
    /// # 返回值
    ///
    /// * `Err(QueryError::TaskNotFound)` - 任务不存在
    /// * `Err(QueryError::ResultNotReady)` - 任务仍在排队或运行
    /// * `Err(QueryError::ResultNotFound)` - 任务已结束但没有结果（例如失败）
    pub async fn get_result(&self, task_id: i32) -> Result<ScrapeResultDto, QueryError> {
        let task = self.get_task(task_id).await?;
        if !task.status.is_terminal() {
            return Err(QueryError::ResultNotReady);
        }

        let result = self
            .result_repository
            .find_by_task_id(task_id)
            .await?
            .ok_or(QueryError::ResultNotFound)?;
        Ok(result.into())
    }
}
