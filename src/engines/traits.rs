// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非预期的HTTP状态码
    #[error("Unexpected status: {0}")]
    UnexpectedStatus(u16),
    /// 响应体为空
    #[error("Empty response body")]
    EmptyBody,
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 所有引擎都失败，附带每个引擎的失败原因
    #[error("All engines failed: {0}")]
    AllEnginesFailed(String),
}

impl EngineError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 如果错误是可重试的则返回true，否则返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            EngineError::UnexpectedStatus(code) => *code >= 500,
            EngineError::Timeout => true,
            _ => false,
        }
    }
}

/// 抓取请求
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// 目标URL
    pub url: String,
    /// 超时时间
    pub timeout: Duration,
}

impl ScrapeRequest {
    /// 构造一个普通的GET请求
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

/// 抓取响应
#[derive(Debug, Clone)]
pub struct ScrapeResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 响应内容
    pub content: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

impl ScrapeResponse {
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}

/// 抓取引擎特质
#[async_trait]
pub trait ScraperEngine: Send + Sync {
    /// 执行抓取
    ///
    /// 非2xx状态码不视为错误，由调用方判断
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, EngineError>;

    /// 计算对请求的支持分数（0-100），0表示不可用
    ///
    /// 非http(s)绝对URL的请求应返回0
    fn support_score(&self, request: &ScrapeRequest) -> u8;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
