// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 存储错误
    #[error("Storage error: {0}")]
    Other(String),
}

/// 报告存储特质
///
/// 报告以文件名为键保存，同一任务可以存在多份报告
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// 保存报告，返回其存储位置
    async fn save(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StorageError>;

    /// 查找任务的报告，多份时按文件名排序取第一份
    async fn find_for_task(&self, task_id: i32) -> Result<Option<PathBuf>, StorageError>;

    /// 读取报告内容
    async fn read(&self, location: &std::path::Path) -> Result<Vec<u8>, StorageError>;
}
