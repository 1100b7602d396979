// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::config::settings::Settings;
use crate::domain::models::record::ExtractedRecord;
use crate::domain::models::task::{Task, TaskStatus};
use crate::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use crate::domain::repositories::storage_repository::ReportStore;
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::domain::services::field_extractor::FieldExtractor;
use crate::domain::services::pagination::PaginationWalker;
use crate::domain::services::report_renderer::{DocumentEncoder, ReportRenderer};
use crate::domain::services::url_discovery::UrlDiscovery;
use crate::engines::acquirer::ContentAcquirer;
use crate::engines::browser_engine::BrowserEngine;
use crate::engines::browser_pool::BrowserPool;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::{EngineError, ScraperEngine};
use crate::workers::stage;

/// 流水线各阶段的协作者
#[derive(Clone)]
pub struct PipelineStages {
    pub discovery: Arc<UrlDiscovery>,
    pub acquirer: Arc<ContentAcquirer>,
    pub walker: Arc<PaginationWalker>,
    pub extractor: Arc<FieldExtractor>,
    pub renderer: Arc<ReportRenderer>,
}

impl PipelineStages {
    /// 按配置组装各阶段
    ///
    /// 直连HTTP引擎在发现、获取和分页之间共享；
    /// 传入浏览器池时，获取阶段会注册浏览器回退引擎
    ///
    /// # 参数
    ///
    /// * `settings` - 应用配置
    /// * `browser_pool` - 浏览器池，为空时不启用浏览器回退
    /// * `encoder` - 报告编码器
    /// * `store` - 报告存储
    pub fn from_settings(
        settings: &Settings,
        browser_pool: Option<Arc<BrowserPool>>,
        encoder: Arc<dyn DocumentEncoder>,
        store: Arc<dyn ReportStore>,
    ) -> Result<Self, EngineError> {
        let timeout = settings.scraper.request_timeout();
        let direct: Arc<dyn ScraperEngine> =
            Arc::new(ReqwestEngine::new(&settings.scraper.user_agent)?);

        let mut engines = vec![direct.clone()];
        if let Some(pool) = browser_pool {
            engines.push(Arc::new(BrowserEngine::new(
                pool,
                Duration::from_millis(settings.browser.settle_ms),
                Duration::from_secs(settings.browser.page_timeout_secs),
            )));
        }

        Ok(Self {
            discovery: Arc::new(UrlDiscovery::new(
                direct.clone(),
                timeout,
                settings.scraper.max_discovered_urls,
            )),
            acquirer: Arc::new(ContentAcquirer::new(engines, timeout)),
            walker: Arc::new(PaginationWalker::new(
                direct,
                timeout,
                settings.scraper.max_pages,
            )),
            extractor: Arc::new(FieldExtractor::default()),
            renderer: Arc::new(ReportRenderer::new(encoder, store)),
        })
    }
}

/// 单次流水线运行的计数
///
/// 只用于日志和指标，不持久化
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PipelineStats {
    pub urls: usize,
    pub pages: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl PipelineStats {
    fn page_succeeded(&mut self) {
        self.succeeded += 1;
        metrics::counter!("scrape_pages_total", "outcome" => "success").increment(1);
    }

    fn page_failed(&mut self) {
        self.failed += 1;
        metrics::counter!("scrape_pages_total", "outcome" => "failure").increment(1);
    }
}

/// 抓取工作者
///
/// 轮询领取排队中的任务，对每个任务端到端地顺序执行流水线
pub struct ScrapeWorker<R, S>
where
    R: TaskRepository + 'static,
    S: ScrapeResultRepository + 'static,
{
    repository: Arc<R>,
    result_repository: Arc<S>,
    stages: PipelineStages,
    poll_interval: Duration,
    worker_id: usize,
}

impl<R, S> Clone for ScrapeWorker<R, S>
where
    R: TaskRepository + 'static,
    S: ScrapeResultRepository + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            result_repository: self.result_repository.clone(),
            stages: self.stages.clone(),
            poll_interval: self.poll_interval,
            worker_id: self.worker_id,
        }
    }
}

impl<R, S> ScrapeWorker<R, S>
where
    R: TaskRepository + 'static,
    S: ScrapeResultRepository + 'static,
{
    /// 创建新的抓取工作器实例
    pub fn new(
        repository: Arc<R>,
        result_repository: Arc<S>,
        stages: PipelineStages,
        poll_interval: Duration,
        worker_id: usize,
    ) -> Self {
        Self {
            repository,
            result_repository,
            stages,
            poll_interval,
            worker_id,
        }
    }

    /// 运行抓取工作器，直到收到关闭信号
    ///
    /// 关闭信号只在两个任务之间检查，正在执行的任务会运行到结束
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!("Scrape worker {} started", self.worker_id);

        while !*shutdown.borrow() {
            let idle = match self.process_next().await {
                Ok(processed) => !processed,
                Err(e) => {
                    error!("Worker {} failed to claim a task: {}", self.worker_id, e);
                    true
                }
            };

            if idle {
                tokio::select! {
                    _ = sleep(self.poll_interval) => {}
                    _ = shutdown.changed() => {}
                }
            }
        }

        info!("Scrape worker {} stopped", self.worker_id);
    }

    /// 领取并执行下一个任务
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 执行了一个任务
    /// * `Ok(false)` - 没有排队中的任务
    /// * `Err(RepositoryError)` - 领取失败
    pub async fn process_next(&self) -> Result<bool, RepositoryError> {
        match self.repository.acquire_next().await? {
            Some(task) => {
                self.execute(task).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 执行一个已处于`running`状态的任务，返回其终态
    ///
    /// 流水线在独立的tokio任务中运行。流水线返回错误或发生panic时：
    /// 结果尚未持久化则标记为失败，已持久化则以无报告的方式标记为完成
    pub async fn execute(&self, task: Task) -> TaskStatus {
        let task_id = task.id;
        let start_time = Instant::now();

        let status = match tokio::spawn(self.clone().run_pipeline(task)).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                error!("Task {} failed: {:#}", task_id, e);
                self.settle_after_error(task_id).await
            }
            Err(join_error) => {
                error!("Task {} pipeline aborted: {}", task_id, join_error);
                self.settle_after_error(task_id).await
            }
        };

        metrics::counter!("scrape_tasks_total", "status" => status.to_string()).increment(1);
        metrics::histogram!("scrape_task_duration_seconds")
            .record(start_time.elapsed().as_secs_f64());
        status
    }

    /// 流水线中断后为任务确定终态
    ///
    /// 已有持久化结果的任务不能被标记为失败，无法确认时任务保持`running`
    async fn settle_after_error(&self, task_id: i32) -> TaskStatus {
        match self.result_repository.find_by_task_id(task_id).await {
            Ok(Some(_)) => {
                warn!(
                    "Task {} has persisted results, completing without report",
                    task_id
                );
                match self.repository.mark_completed(task_id, None).await {
                    Ok(()) => TaskStatus::Completed,
                    Err(e) => {
                        error!("Failed to mark task {} as completed: {}", task_id, e);
                        TaskStatus::Running
                    }
                }
            }
            Ok(None) => match self.repository.mark_failed(task_id).await {
                Ok(()) => TaskStatus::Failed,
                Err(e) => {
                    error!("Failed to mark task {} as failed: {}", task_id, e);
                    TaskStatus::Running
                }
            },
            Err(e) => {
                error!("Failed to look up results of task {}: {}", task_id, e);
                TaskStatus::Running
            }
        }
    }

    #[instrument(skip(self, task), fields(task_id = task.id, url = %task.url, worker = self.worker_id))]
    async fn run_pipeline(self, task: Task) -> Result<TaskStatus> {
        info!("Pipeline started");
        let stages = &self.stages;
        let mut stats = PipelineStats::default();
        let mut records: Vec<ExtractedRecord> = Vec::new();

        let urls = stage::discovery(stages.discovery.discover(&task.url).await, &task.url)
            .resolve("discovery", &task.url)?
            .unwrap_or_else(|| vec![task.url.clone()]);

        for url in &urls {
            stats.urls += 1;

            let Some(page) =
                stage::acquisition(stages.acquirer.acquire(url).await).resolve("acquire", url)?
            else {
                stats.page_failed();
                continue;
            };

            let pages = stages.walker.paginate(&page.html, url).await;
            for (index, html) in pages.iter().enumerate() {
                stats.pages += 1;
                let extracted = stage::extraction(stages.extractor.extract(html, url))
                    .resolve("extract", url)?;
                match extracted {
                    Some(record) => {
                        stats.page_succeeded();
                        records.push(record.stamp(task.id, index as u32 + 1));
                    }
                    None => stats.page_failed(),
                }
            }
        }

        info!(
            "Pipeline finished: {} urls, {} pages, {} succeeded, {} failed",
            stats.urls, stats.pages, stats.succeeded, stats.failed
        );

        if records.is_empty() {
            self.repository.mark_failed(task.id).await?;
            return Ok(TaskStatus::Failed);
        }

        let subject = format!("task {}", task.id);
        stage::persistence(self.result_repository.save(task.id, &records).await)
            .resolve("persist", &subject)?;

        let report_path = stage::report(stages.renderer.render(task.id, &records).await)
            .resolve("report", &subject)?
            .flatten()
            .map(|path| path.display().to_string());

        self.repository
            .mark_completed(task.id, report_path)
            .await?;
        Ok(TaskStatus::Completed)
    }
}
