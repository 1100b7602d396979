// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{ScrapeRequest, ScraperEngine};
use crate::utils::url_utils::{join_by_concatenation, normalize_for_visit};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("static selector"));

/// 分页遍历器
///
/// 沿着文本包含"next"的链接逐页抓取。只使用直连HTTP，不回退到浏览器。
pub struct PaginationWalker {
    fetcher: Arc<dyn ScraperEngine>,
    timeout: Duration,
    max_pages: usize,
}

impl PaginationWalker {
    /// 创建分页遍历器
    ///
    /// # 参数
    ///
    /// * `fetcher` - 直连HTTP引擎
    /// * `timeout` - 单次请求超时
    /// * `max_pages` - 最多页数（含起始页），至少为1
    pub fn new(fetcher: Arc<dyn ScraperEngine>, timeout: Duration, max_pages: usize) -> Self {
        Self {
            fetcher,
            timeout,
            max_pages: max_pages.max(1),
        }
    }

    /// 遍历分页链
    ///
    /// # 参数
    ///
    /// * `html` - 起始页HTML
    /// * `base_url` - 起始页URL，相对链接按简单拼接挂在其后
    ///
    /// # 返回值
    ///
    /// 非空的页面HTML列表，起始页在首位。遇到以下任一情况停止：
    /// 没有"next"链接、请求失败或非200、链接已访问过、达到最大页数
    pub async fn paginate(&self, html: &str, base_url: &str) -> Vec<String> {
        let mut pages = vec![html.to_string()];
        let mut visited: HashSet<String> = HashSet::from([normalize_for_visit(base_url)]);

        while pages.len() < self.max_pages {
            let Some(href) = pages.last().and_then(|page| find_next_href(page)) else {
                break;
            };

            let next_url = join_by_concatenation(base_url, &href);
            if !visited.insert(normalize_for_visit(&next_url)) {
                debug!("Pagination revisits {}, stopping", next_url);
                break;
            }

            let request = ScrapeRequest::get(next_url.as_str(), self.timeout);
            match self.fetcher.scrape(&request).await {
                Ok(response) if response.is_ok() => pages.push(response.content),
                Ok(response) => {
                    debug!(
                        "Pagination stopped at {}: status {}",
                        next_url, response.status_code
                    );
                    break;
                }
                Err(e) => {
                    debug!("Pagination stopped at {}: {}", next_url, e);
                    break;
                }
            }
        }

        pages
    }
}

/// 查找第一个可见文本包含"next"（不区分大小写）的链接的href
///
/// 第一个匹配的链接没有href时返回None
pub fn find_next_href(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let anchor = document.select(&ANCHOR_SELECTOR).find(|a| {
        a.text()
            .collect::<String>()
            .to_lowercase()
            .contains("next")
    })?;
    anchor
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
