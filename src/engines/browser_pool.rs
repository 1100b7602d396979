// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::EngineError;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use parking_lot::Mutex;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 池中的浏览器实例及其事件处理任务
struct PooledBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl PooledBrowser {
    // the Browser itself is dropped with the last reference, which kills a launched child
    fn shutdown(&self) {
        self.handler.abort();
    }
}

/// 有界浏览器池
///
/// 同时存在的浏览器实例不超过`max_instances`。实例按需懒启动，
/// 归还后留在池中复用；出错的实例被丢弃，下次领取时重新启动。
pub struct BrowserPool {
    settings: BrowserSettings,
    permits: Arc<Semaphore>,
    idle: Arc<Mutex<Vec<Arc<PooledBrowser>>>>,
}

impl BrowserPool {
    /// 创建浏览器池，此时不会启动任何浏览器
    pub fn new(settings: BrowserSettings) -> Self {
        let size = settings.max_instances.max(1);
        Self {
            settings,
            permits: Arc::new(Semaphore::new(size)),
            idle: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 池容量
    pub fn capacity(&self) -> usize {
        self.settings.max_instances.max(1)
    }

    /// 当前空闲实例数
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    /// 领取一个浏览器
    ///
    /// 池满时等待其他租约归还。返回的租约在drop时自动归还实例。
    ///
    /// # 返回值
    ///
    /// * `Ok(BrowserLease)` - 浏览器租约
    /// * `Err(EngineError)` - 浏览器启动或连接失败
    pub async fn acquire(&self) -> Result<BrowserLease, EngineError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| EngineError::Browser(format!("browser pool closed: {}", e)))?;

        let reused = self.idle.lock().pop();
        let pooled = match reused {
            Some(pooled) => {
                debug!("Reusing pooled browser");
                pooled
            }
            None => Arc::new(self.launch().await?),
        };

        Ok(BrowserLease {
            pooled,
            idle: self.idle.clone(),
            healthy: true,
            _permit: permit,
        })
    }

    async fn launch(&self) -> Result<PooledBrowser, EngineError> {
        let (browser, mut handler) = if let Some(ref url) = self.settings.remote_debugging_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url).await.map_err(|e| {
                EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
            })?
        } else {
            info!("Launching headless Chrome");
            let config = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(Duration::from_secs(self.settings.page_timeout_secs))
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .build()
                .map_err(EngineError::Browser)?;

            Browser::launch(config)
                .await
                .map_err(|e| EngineError::Browser(e.to_string()))?
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(PooledBrowser { browser, handler })
    }

    /// 关闭所有空闲实例
    pub fn shutdown(&self) {
        let drained: Vec<Arc<PooledBrowser>> = self.idle.lock().drain(..).collect();
        for pooled in drained {
            pooled.shutdown();
        }
    }
}

/// 浏览器租约
///
/// 持有期间占用池中的一个名额
pub struct BrowserLease {
    pooled: Arc<PooledBrowser>,
    idle: Arc<Mutex<Vec<Arc<PooledBrowser>>>>,
    healthy: bool,
    _permit: OwnedSemaphorePermit,
}

impl BrowserLease {
    /// 标记实例已损坏，归还时直接关闭而不是放回池中
    pub fn discard(mut self) {
        self.healthy = false;
    }
}

impl Deref for BrowserLease {
    type Target = Browser;

    fn deref(&self) -> &Browser {
        &self.pooled.browser
    }
}

impl Drop for BrowserLease {
    fn drop(&mut self) {
        if self.healthy && !self.pooled.handler.is_finished() {
            self.idle.lock().push(self.pooled.clone());
        } else {
            warn!("Discarding unhealthy browser instance");
            self.pooled.shutdown();
        }
    }
}
