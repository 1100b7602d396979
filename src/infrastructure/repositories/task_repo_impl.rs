// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::{DomainError, Task, TaskStatus};
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::infrastructure::database::entities::task as task_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::debug;

/// 任务仓库实现
///
/// 基于SeaORM实现的任务数据访问层
#[derive(Clone)]
pub struct TaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TaskRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 以比较并交换的方式写入状态
    ///
    /// 只有当数据库中的状态仍为`from`时才会更新，返回是否更新成功
    async fn swap_status(
        &self,
        task: &Task,
        from: TaskStatus,
    ) -> Result<bool, RepositoryError> {
        let result = task_entity::Entity::update_many()
            .col_expr(
                task_entity::Column::Status,
                Expr::value(task.status.to_string()),
            )
            .col_expr(
                task_entity::Column::ReportPath,
                Expr::value(task.report_path.clone()),
            )
            .col_expr(task_entity::Column::UpdatedAt, Expr::value(task.updated_at))
            .filter(task_entity::Column::Id.eq(task.id))
            .filter(task_entity::Column::Status.eq(from.to_string()))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected == 1)
    }

    async fn require(&self, id: i32) -> Result<Task, RepositoryError> {
        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }
}

/// 无法识别的状态字符串以`RepositoryError::Domain`返回，不会被猜测为某个状态
impl TryFrom<task_entity::Model> for Task {
    type Error = RepositoryError;

    fn try_from(model: task_entity::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            url: model.url,
            status: model.status.parse()?,
            report_path: model.report_path,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn create(&self, url: &str) -> Result<Task, RepositoryError> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let model = task_entity::ActiveModel {
            url: Set(url.to_string()),
            status: Set(TaskStatus::Queued.to_string()),
            report_path: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Task::try_from(inserted)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        model.map(Task::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        let models = task_entity::Entity::find()
            .order_by_asc(task_entity::Column::Id)
            .all(self.db.as_ref())
            .await?;

        models.into_iter().map(Task::try_from).collect()
    }

    async fn acquire_next(&self) -> Result<Option<Task>, RepositoryError> {
        loop {
            let candidate = task_entity::Entity::find()
                .filter(task_entity::Column::Status.eq(TaskStatus::Queued.to_string()))
                .order_by_asc(task_entity::Column::Id)
                .one(self.db.as_ref())
                .await?;

            let Some(candidate) = candidate else {
                return Ok(None);
            };

            let running = Task::try_from(candidate)?.start()?;
            if self.swap_status(&running, TaskStatus::Queued).await? {
                return Ok(Some(running));
            }
            // another worker claimed it first
            debug!("Task {} was claimed concurrently, retrying", running.id);
        }
    }

    async fn mark_completed(
        &self,
        id: i32,
        report_path: Option<String>,
    ) -> Result<(), RepositoryError> {
        let completed = self.require(id).await?.complete(report_path)?;
        if !self.swap_status(&completed, TaskStatus::Running).await? {
            let current = self.require(id).await?;
            return Err(RepositoryError::Domain(
                DomainError::InvalidStateTransition {
                    from: current.status,
                    to: TaskStatus::Completed,
                },
            ));
        }
        Ok(())
    }

    async fn mark_failed(&self, id: i32) -> Result<(), RepositoryError> {
        let failed = self.require(id).await?.fail()?;
        if !self.swap_status(&failed, TaskStatus::Running).await? {
            let current = self.require(id).await?;
            return Err(RepositoryError::Domain(
                DomainError::InvalidStateTransition {
                    from: current.status,
                    to: TaskStatus::Failed,
                },
            ));
        }
        Ok(())
    }
}
