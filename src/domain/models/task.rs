// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 抓取任务实体
///
/// 一个任务对应一个种子URL。任务由接入层创建为`Queued`，
/// 之后只由工作器推进状态，核心流程从不删除任务。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// 任务ID，由存储层分配
    pub id: i32,
    /// 种子URL
    pub url: String,
    /// 生命周期状态
    pub status: TaskStatus,
    /// 报告文件位置，仅在报告渲染成功时存在
    pub report_path: Option<String>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 最后更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 任务状态枚举
///
/// 状态转换遵循以下流程：
/// Queued → Running → Completed/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 已入队，等待工作器领取
    #[default]
    Queued,
    /// 运行中
    Running,
    /// 已完成，结果已持久化
    Completed,
    /// 已失败
    Failed,
}

impl TaskStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Queued => write!(f, "queued"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(TaskStatus::Queued),
            "running" => Ok(TaskStatus::Running),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(DomainError::ValidationError(format!(
                "unknown task status: {}",
                other
            ))),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    /// 无效的状态转换
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: TaskStatus, to: TaskStatus },

    /// 验证错误，当输入数据不符合领域规则时发生
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl Task {
    /// 启动任务
    ///
    /// 将任务状态从Queued变更为Running
    ///
    /// # 返回值
    ///
    /// * `Ok(Task)` - 成功启动的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn start(self) -> Result<Self, DomainError> {
        self.transition(TaskStatus::Queued, TaskStatus::Running)
    }

    /// 完成任务
    ///
    /// 将任务状态从Running变更为Completed，同时记录报告位置（可能为空）
    ///
    /// # 参数
    ///
    /// * `report_path` - 报告文件位置
    ///
    /// # 返回值
    ///
    /// * `Ok(Task)` - 成功完成的任务
    /// * `Err(DomainError)` - 状态转换失败
    pub fn complete(self, report_path: Option<String>) -> Result<Self, DomainError> {
        let mut task = self.transition(TaskStatus::Running, TaskStatus::Completed)?;
        task.report_path = report_path;
        Ok(task)
    }

    /// 标记任务失败
    ///
    /// 将任务状态从Running变更为Failed
    pub fn fail(self) -> Result<Self, DomainError> {
        self.transition(TaskStatus::Running, TaskStatus::Failed)
    }

    fn transition(mut self, from: TaskStatus, to: TaskStatus) -> Result<Self, DomainError> {
        if self.status != from {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Utc::now().into();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: TaskStatus) -> Task {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Task {
            id: 1,
            url: "https://acme.co".to_string(),
            status,
            report_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_happy_path_transitions() {
        let t = task(TaskStatus::Queued).start().unwrap();
        assert_eq!(t.status, TaskStatus::Running);

        let t = t
            .complete(Some("reports/scraping_report_1_20240102_030405.pdf".into()))
            .unwrap();
        assert_eq!(t.status, TaskStatus::Completed);
        assert!(t.report_path.is_some());
    }

    #[test]
    fn test_running_task_can_fail() {
        let t = task(TaskStatus::Running).fail().unwrap();
        assert_eq!(t.status, TaskStatus::Failed);
        assert!(t.status.is_terminal());
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        let err = task(TaskStatus::Completed).fail().unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidStateTransition {
                from: TaskStatus::Completed,
                to: TaskStatus::Failed
            }
        );
        assert!(task(TaskStatus::Failed).start().is_err());
        assert!(task(TaskStatus::Queued).complete(None).is_err());
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            TaskStatus::Queued,
            TaskStatus::Running,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("active".parse::<TaskStatus>().is_err());
    }
}
