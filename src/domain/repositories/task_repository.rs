// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::{DomainError, Task};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 数据无法序列化或反序列化
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 违反任务状态机
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// 任务仓库特质
///
/// 定义任务数据访问接口
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 以`queued`状态创建新任务
    async fn create(&self, url: &str) -> Result<Task, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, RepositoryError>;
    /// 按ID顺序列出所有任务
    async fn list(&self) -> Result<Vec<Task>, RepositoryError>;
    /// 领取下一个待处理任务，并原子地将其置为`running`
    async fn acquire_next(&self) -> Result<Option<Task>, RepositoryError>;
    /// 标记任务已完成
    async fn mark_completed(
        &self,
        id: i32,
        report_path: Option<String>,
    ) -> Result<(), RepositoryError>;
    /// 标记任务已失败
    async fn mark_failed(&self, id: i32) -> Result<(), RepositoryError>;
}
