// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{EngineError, ScrapeRequest, ScraperEngine};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// 获取到的页面
#[derive(Debug, Clone)]
pub struct AcquiredPage {
    /// 请求的URL
    pub url: String,
    /// 页面HTML
    pub html: String,
    /// 成功的引擎名称
    pub engine: &'static str,
}

/// 内容获取器
///
/// 按支持分数从高到低依次尝试各引擎（分数相同时保持注册顺序），
/// 直连HTTP失败、非200或空响应时回退到浏览器渲染。
/// 所有引擎都失败时返回带有各引擎失败原因的错误，不会伪造页面内容。
pub struct ContentAcquirer {
    engines: Vec<Arc<dyn ScraperEngine>>,
    timeout: Duration,
}

impl ContentAcquirer {
    /// 创建新的内容获取器
    ///
    /// # 参数
    ///
    /// * `engines` - 引擎列表，按回退顺序排列
    /// * `timeout` - 单次请求超时
    pub fn new(engines: Vec<Arc<dyn ScraperEngine>>, timeout: Duration) -> Self {
        Self { engines, timeout }
    }

    fn candidates(&self, request: &ScrapeRequest) -> Vec<Arc<dyn ScraperEngine>> {
        let mut candidates: Vec<Arc<dyn ScraperEngine>> = self
            .engines
            .iter()
            .filter(|engine| engine.support_score(request) > 0)
            .cloned()
            .collect();
        // stable: equal scores keep registration order
        candidates.sort_by_key(|engine| std::cmp::Reverse(engine.support_score(request)));
        candidates
    }

    /// 获取一个URL的HTML
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    ///
    /// # 返回值
    ///
    /// * `Ok(AcquiredPage)` - 第一个成功引擎的结果
    /// * `Err(EngineError::AllEnginesFailed)` - 所有引擎都失败
    pub async fn acquire(&self, url: &str) -> Result<AcquiredPage, EngineError> {
        let start_time = Instant::now();
        let request = ScrapeRequest::get(url, self.timeout);
        let mut failures = Vec::new();

        for engine in self.candidates(&request) {
            let engine_name = engine.name();

            let outcome = match engine.scrape(&request).await {
                Ok(response) if !response.is_ok() => {
                    Err(EngineError::UnexpectedStatus(response.status_code))
                }
                Ok(response) if response.content.trim().is_empty() => Err(EngineError::EmptyBody),
                Ok(response) => Ok(response),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(response) => {
                    metrics::counter!("acquire_engine_total", "engine" => engine_name, "outcome" => "success")
                        .increment(1);
                    info!(
                        "Engine {} acquired {} in {}ms (total {:?})",
                        engine_name,
                        url,
                        response.response_time_ms,
                        start_time.elapsed()
                    );
                    return Ok(AcquiredPage {
                        url: url.to_string(),
                        html: response.content,
                        engine: engine_name,
                    });
                }
                Err(e) => {
                    metrics::counter!("acquire_engine_total", "engine" => engine_name, "outcome" => "failure")
                        .increment(1);
                    let kind = if e.is_retryable() { "transient" } else { "permanent" };
                    warn!(
                        "Engine {} failed for {} ({}): {}, trying next engine",
                        engine_name, url, kind, e
                    );
                    failures.push(format!("{}: {}", engine_name, e));
                }
            }
        }

        warn!("All engines failed for request to {}", url);
        if failures.is_empty() {
            failures.push("no engine available".to_string());
        }
        Err(EngineError::AllEnginesFailed(failures.join("; ")))
    }
}
