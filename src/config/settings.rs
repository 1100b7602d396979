// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含数据库、服务器、抓取、浏览器、工作器、报告和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取配置
    pub scraper: ScraperSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 工作器配置
    pub workers: WorkerSettings,
    /// 报告配置
    pub reports: ReportSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// 单次HTTP请求超时（秒）
    pub request_timeout_secs: u64,
    /// 直连请求使用的User-Agent
    pub user_agent: String,
    /// 分页链最多页数（含起始页）
    pub max_pages: usize,
    /// URL发现最多返回的URL数（含种子）
    pub max_discovered_urls: usize,
}

impl ScraperSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pages: 20,
            max_discovered_urls: 100,
        }
    }
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否启用浏览器回退
    pub enabled: bool,
    /// 浏览器池最大实例数
    pub max_instances: usize,
    /// 页面加载后的等待时间（毫秒）
    pub settle_ms: u64,
    /// 单页渲染超时（秒）
    pub page_timeout_secs: u64,
    /// 远程调试地址，设置后连接已有的Chrome而不是启动新进程
    pub remote_debugging_url: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_instances: 2,
            settle_ms: 3000,
            page_timeout_secs: 30,
            remote_debugging_url: None,
        }
    }
}

/// 工作器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    /// 并发工作器数量
    pub count: usize,
    /// 无任务时的轮询间隔（毫秒）
    pub poll_interval_ms: u64,
}

/// 报告配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// 报告目录
    pub dir: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 是否输出JSON格式日志
    pub json: bool,
}

/// 直连请求默认的浏览器标识
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default.toml`、`config/{APP_ENVIRONMENT}.toml`
    /// 以及`SITEPROFILER__`前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("database.url", "sqlite://siteprofiler.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("scraper.request_timeout_secs", 10)?
            .set_default("scraper.user_agent", DEFAULT_USER_AGENT)?
            .set_default("scraper.max_pages", 20)?
            .set_default("scraper.max_discovered_urls", 100)?
            .set_default("browser.enabled", true)?
            .set_default("browser.max_instances", 2)?
            .set_default("browser.settle_ms", 3000)?
            .set_default("browser.page_timeout_secs", 30)?
            .set_default("workers.count", 4)?
            .set_default("workers.poll_interval_ms", 1000)?
            .set_default("reports.dir", "reports")?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .set_default("logging.json", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SITEPROFILER").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
