// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::browser_pool::BrowserPool;
use crate::engines::traits::{EngineError, ScrapeRequest, ScrapeResponse, ScraperEngine};
use crate::utils::url_utils::is_absolute_http;
use async_trait::async_trait;
use chromiumoxide::Browser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// 浏览器渲染抓取引擎
///
/// 基于chromiumoxide，从有界浏览器池领取实例，加载页面并等待固定的
/// 稳定时间后抓取序列化后的DOM
pub struct BrowserEngine {
    pool: Arc<BrowserPool>,
    settle: Duration,
    page_timeout: Duration,
}

impl BrowserEngine {
    /// 创建新的浏览器引擎
    ///
    /// # 参数
    ///
    /// * `pool` - 浏览器池
    /// * `settle` - 页面加载后等待客户端渲染的时间
    /// * `page_timeout` - 单页渲染总超时
    pub fn new(pool: Arc<BrowserPool>, settle: Duration, page_timeout: Duration) -> Self {
        Self {
            pool,
            settle,
            page_timeout,
        }
    }

    async fn render(&self, browser: &Browser, url: &str) -> Result<String, EngineError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        let outcome = async {
            page.goto(url)
                .await
                .map_err(|e| EngineError::Browser(e.to_string()))?;
            tokio::time::sleep(self.settle).await;
            page.content()
                .await
                .map_err(|e| EngineError::Browser(e.to_string()))
        }
        .await;

        if let Err(e) = page.close().await {
            debug!("Failed to close page for {}: {}", url, e);
        }

        outcome
    }
}

#[async_trait]
impl ScraperEngine for BrowserEngine {
    /// 执行浏览器渲染抓取
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapeResponse)` - 渲染后的页面，状态码固定为200
    /// * `Err(EngineError)` - 浏览器错误或超时
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, EngineError> {
        let start = Instant::now();
        let lease = self.pool.acquire().await?;

        match tokio::time::timeout(self.page_timeout, self.render(&lease, &request.url)).await {
            Ok(Ok(content)) => Ok(ScrapeResponse {
                // goto does not surface the navigation response
                status_code: 200,
                content,
                response_time_ms: start.elapsed().as_millis() as u64,
            }),
            Ok(Err(e)) => {
                lease.discard();
                Err(e)
            }
            Err(_) => {
                lease.discard();
                Err(EngineError::Timeout)
            }
        }
    }

    /// 计算对请求的支持分数
    ///
    /// 浏览器渲染代价高，只作为直连HTTP之后的回退，http(s)绝对URL返回50分
    fn support_score(&self, request: &ScrapeRequest) -> u8 {
        if !is_absolute_http(&request.url) {
            return 0;
        }
        50
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}
