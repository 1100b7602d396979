// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::domain::models::task::TaskStatus;
use crate::domain::repositories::storage_repository::{ReportStore, StorageError};
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::domain::services::report_renderer::download_file_name;

/// 报告下载错误
#[derive(Error, Debug)]
pub enum DownloadReportError {
    #[error("Task not found")]
    TaskNotFound,
    #[error("Task not completed yet")]
    NotCompleted,
    #[error("Report not found")]
    ReportNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// 待下载的报告
#[derive(Debug)]
pub struct ReportDownload {
    /// 规范化的下载文件名
    pub file_name: String,
    pub content: Vec<u8>,
}

/// 报告下载用例
pub struct DownloadReportUseCase {
    task_repository: Arc<dyn TaskRepository>,
    report_store: Arc<dyn ReportStore>,
}

impl DownloadReportUseCase {
    pub fn new(task_repository: Arc<dyn TaskRepository>, report_store: Arc<dyn ReportStore>) -> Self {
        Self {
            task_repository,
            report_store,
        }
    }

    /// 定位并读取任务的报告
    ///
    /// 同一任务存在多份报告时取文件名排序后的第一份
    pub async fn execute(&self, task_id: i32) -> Result<ReportDownload, DownloadReportError> {
        let task = self
            .task_repository
            .find_by_id(task_id)
            .await?
            .ok_or(DownloadReportError::TaskNotFound)?;

        if task.status != TaskStatus::Completed {
            return Err(DownloadReportError::NotCompleted);
        }

        let Some(location) = self.report_store.find_for_task(task_id).await? else {
            warn!("Task {} completed without a report file", task_id);
            return Err(DownloadReportError::ReportNotFound);
        };

        let content = self.report_store.read(&location).await?;
        Ok(ReportDownload {
            file_name: download_file_name(task_id),
            content,
        })
    }
}
