// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DatabaseConnection;
use siteprofiler::config::settings::DatabaseSettings;
use siteprofiler::infrastructure::database::connection;
use siteprofiler::infrastructure::repositories::scrape_result_repo_impl::ScrapeResultRepositoryImpl;
use siteprofiler::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use std::sync::Arc;

/// 已迁移的内存数据库及其上的仓库
#[allow(dead_code)]
pub struct TestDb {
    pub db: Arc<DatabaseConnection>,
    pub task_repo: Arc<TaskRepositoryImpl>,
    pub result_repo: Arc<ScrapeResultRepositoryImpl>,
}

pub async fn test_db() -> TestDb {
    // a single connection keeps every query on the same in-memory database
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: Some(5),
        idle_timeout: None,
    };
    let db = Arc::new(
        connection::connect_and_migrate(&settings)
            .await
            .expect("Failed to set up test database"),
    );

    TestDb {
        task_repo: Arc::new(TaskRepositoryImpl::new(db.clone())),
        result_repo: Arc::new(ScrapeResultRepositoryImpl::new(db.clone())),
        db,
    }
}
