// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use validator::Validate;

use crate::application::dto::scrape_request::ScrapeRequestDto;
use crate::application::dto::scrape_response::ScrapeResponseDto;
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::utils::url_utils::is_absolute_http;

/// 任务接收错误
#[derive(Error, Debug)]
pub enum CreateScrapeError {
    /// 请求参数不合法
    #[error("Validation error: {0}")]
    Validation(String),
    /// 任务写入失败
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 创建抓取任务用例
///
/// 任务以`queued`状态写入存储，由工作器轮询领取后异步执行
pub struct CreateScrapeUseCase {
    task_repository: Arc<dyn TaskRepository>,
}

impl CreateScrapeUseCase {
    pub fn new(task_repository: Arc<dyn TaskRepository>) -> Self {
        Self { task_repository }
    }

    /// 校验请求并创建任务
    ///
    /// # 参数
    ///
    /// * `request_dto` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeResponseDto)` - 新任务的ID与状态
    /// * `Err(CreateScrapeError)` - 参数不合法或写入失败
    pub async fn execute(
        &self,
        request_dto: ScrapeRequestDto,
    ) -> Result<ScrapeResponseDto, CreateScrapeError> {
        request_dto
            .validate()
            .map_err(|e| CreateScrapeError::Validation(e.to_string()))?;

        let url = request_dto.url.trim();
        if !is_absolute_http(url) {
            return Err(CreateScrapeError::Validation(format!(
                "url must be an absolute http(s) address: {}",
                url
            )));
        }

        let task = self.task_repository.create(url).await?;
        info!("Task {} queued for {}", task.id, task.url);

        Ok(ScrapeResponseDto {
            task_id: task.id,
            status: task.status,
        })
    }
}
