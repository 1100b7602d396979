// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{EngineError, ScrapeRequest, ScraperEngine};
use crate::utils::url_utils::is_absolute_http;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

static HREF_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

/// URL发现错误
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// 种子页请求失败
    #[error("Failed to fetch seed page: {0}")]
    Fetch(#[from] EngineError),
    /// 种子页返回非成功状态码
    #[error("Seed page returned status {0}")]
    Status(u16),
}

/// URL发现服务
///
/// 抓取种子页一次，收集其中的绝对链接
pub struct UrlDiscovery {
    fetcher: Arc<dyn ScraperEngine>,
    timeout: Duration,
    max_urls: usize,
}

impl UrlDiscovery {
    /// 创建URL发现服务
    ///
    /// # 参数
    ///
    /// * `fetcher` - 直连HTTP引擎
    /// * `timeout` - 请求超时
    /// * `max_urls` - 返回的URL上限（含种子），至少为1
    pub fn new(fetcher: Arc<dyn ScraperEngine>, timeout: Duration, max_urls: usize) -> Self {
        Self {
            fetcher,
            timeout,
            max_urls: max_urls.max(1),
        }
    }

    /// 发现候选URL
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<String>)` - 种子在首位，其后为文档顺序的绝对链接（不去重）
    /// * `Err(DiscoveryError)` - 种子页抓取失败
    pub async fn discover(&self, seed_url: &str) -> Result<Vec<String>, DiscoveryError> {
        let response = self
            .fetcher
            .scrape(&ScrapeRequest::get(seed_url, self.timeout))
            .await?;

        if !(200..300).contains(&response.status_code) {
            return Err(DiscoveryError::Status(response.status_code));
        }

        let mut urls = vec![seed_url.to_string()];
        urls.extend(absolute_links(&response.content));
        urls.truncate(self.max_urls);
        Ok(urls)
    }
}

/// 按文档顺序提取所有绝对 http(s) 链接
pub fn absolute_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&HREF_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_absolute_http(href))
        .map(str::to_string)
        .collect()
}
