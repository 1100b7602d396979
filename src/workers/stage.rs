// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 流水线各阶段的结果判定
//!
//! 每个阶段的原始结果在这里被映射为继续、降级、跳过或致命四种结局，
//! 编排器只根据结局行动。

use crate::domain::models::record::ExtractedRecord;
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::domain::services::field_extractor::ExtractionError;
use crate::domain::services::report_renderer::ReportError;
use crate::domain::services::url_discovery::DiscoveryError;
use crate::engines::acquirer::AcquiredPage;
use crate::engines::traits::EngineError;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 阶段结局
#[derive(Debug, PartialEq)]
pub enum StageOutcome<T> {
    /// 阶段成功
    Proceed(T),
    /// 阶段失败，但有可用的替代值
    Degraded { value: T, reason: String },
    /// 放弃当前单元（URL或页面），计一次失败
    Skip(String),
    /// 整个任务失败
    Fatal(String),
}

impl<T> StageOutcome<T> {
    /// 记录日志并展开结局
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(T))` - 继续或降级
    /// * `Ok(None)` - 跳过
    /// * `Err(anyhow::Error)` - 致命
    pub fn resolve(self, stage: &'static str, subject: &str) -> anyhow::Result<Option<T>> {
        match self {
            StageOutcome::Proceed(value) => Ok(Some(value)),
            StageOutcome::Degraded { value, reason } => {
                warn!("{} degraded for {}: {}", stage, subject, reason);
                Ok(Some(value))
            }
            StageOutcome::Skip(reason) => {
                debug!("{} skipped {}: {}", stage, subject, reason);
                Ok(None)
            }
            StageOutcome::Fatal(reason) => {
                Err(anyhow::anyhow!("{} failed for {}: {}", stage, subject, reason))
            }
        }
    }
}

/// 发现失败时降级为只抓取种子URL
pub fn discovery(
    result: Result<Vec<String>, DiscoveryError>,
    seed_url: &str,
) -> StageOutcome<Vec<String>> {
    match result {
        Ok(urls) => StageOutcome::Proceed(urls),
        Err(e) => StageOutcome::Degraded {
            value: vec![seed_url.to_string()],
            reason: e.to_string(),
        },
    }
}

/// 所有引擎都失败时跳过该URL
pub fn acquisition(result: Result<AcquiredPage, EngineError>) -> StageOutcome<AcquiredPage> {
    match result {
        Ok(page) => StageOutcome::Proceed(page),
        Err(e) => StageOutcome::Skip(e.to_string()),
    }
}

/// 提取出错或记录无意义时跳过该页
pub fn extraction(
    result: Result<ExtractedRecord, ExtractionError>,
) -> StageOutcome<ExtractedRecord> {
    match result {
        Ok(record) if record.is_meaningful() => StageOutcome::Proceed(record),
        Ok(_) => StageOutcome::Skip("no fields extracted".to_string()),
        Err(e) => StageOutcome::Skip(e.to_string()),
    }
}

/// 结果持久化失败对任务是致命的
pub fn persistence(result: Result<ScrapeResult, RepositoryError>) -> StageOutcome<ScrapeResult> {
    match result {
        Ok(saved) => StageOutcome::Proceed(saved),
        Err(e) => StageOutcome::Fatal(e.to_string()),
    }
}

/// 报告渲染失败时任务仍然完成，只是没有报告
pub fn report(result: Result<PathBuf, ReportError>) -> StageOutcome<Option<PathBuf>> {
    match result {
        Ok(location) => StageOutcome::Proceed(Some(location)),
        Err(e) => StageOutcome::Degraded {
            value: None,
            reason: e.to_string(),
        },
    }
}
