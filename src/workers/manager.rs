// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::workers::scrape_worker::{PipelineStages, ScrapeWorker};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
///
/// 启动固定数量的抓取工作器，每个工作器独立轮询任务，彼此不共享内存状态
pub struct WorkerManager<R, S>
where
    R: TaskRepository + 'static,
    S: ScrapeResultRepository + 'static,
{
    repository: Arc<R>,
    result_repository: Arc<S>,
    stages: PipelineStages,
    poll_interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl<R, S> WorkerManager<R, S>
where
    R: TaskRepository + 'static,
    S: ScrapeResultRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        result_repository: Arc<S>,
        stages: PipelineStages,
        poll_interval: Duration,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            repository,
            result_repository,
            stages,
            poll_interval,
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量
    pub fn start_workers(&mut self, count: usize) {
        for worker_id in 0..count {
            let worker = ScrapeWorker::new(
                self.repository.clone(),
                self.result_repository.clone(),
                self.stages.clone(),
                self.poll_interval,
                worker_id,
            );

            let shutdown = self.shutdown_tx.subscribe();
            let handle = tokio::spawn(async move {
                worker.run(shutdown).await;
            });
            self.handles.push(handle);
        }
        info!("Started {} scrape workers", count);
    }

    /// 正在运行的工作进程数量
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// 通知所有工作进程停止，并等待它们完成当前任务
    pub async fn shutdown(&mut self) {
        info!("Shutting down workers...");
        // receivers are held by the workers; a send error only means none are left
        let _ = self.shutdown_tx.send(true);

        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                error!("Worker exited abnormally: {}", e);
            }
        }

        info!("Workers shut down successfully");
    }
}
