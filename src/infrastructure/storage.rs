// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::repositories::storage_repository::{ReportStore, StorageError};
use crate::domain::services::report_renderer::report_file_prefix;

/// 本地文件系统报告存储
///
/// 所有报告平铺存放在同一目录下
#[derive(Debug, Clone)]
pub struct LocalReportStore {
    base_path: PathBuf,
}

impl LocalReportStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl ReportStore for LocalReportStore {
    async fn save(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        if file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(StorageError::Other(format!(
                "Invalid report file name: {}",
                file_name
            )));
        }

        // 确保目录存在
        fs::create_dir_all(&self.base_path).await?;

        let full_path = self.base_path.join(file_name);
        let mut file = fs::File::create(&full_path).await?;
        file.write_all(data).await?;
        file.flush().await?;

        Ok(full_path)
    }

    async fn find_for_task(&self, task_id: i32) -> Result<Option<PathBuf>, StorageError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let prefix = report_file_prefix(task_id);
        let mut matches = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(&prefix) && name.ends_with(".pdf") {
                matches.push(entry.path());
            }
        }

        matches.sort();
        Ok(matches.into_iter().next())
    }

    async fn read(&self, location: &Path) -> Result<Vec<u8>, StorageError> {
        Ok(fs::read(location).await?)
    }
}
