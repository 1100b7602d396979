// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use siteprofiler::config::settings::Settings;
use siteprofiler::domain::repositories::storage_repository::ReportStore;
use siteprofiler::engines::browser_pool::BrowserPool;
use siteprofiler::infrastructure::database::connection;
use siteprofiler::infrastructure::metrics::init_metrics;
use siteprofiler::infrastructure::pdf_writer::PdfEncoder;
use siteprofiler::infrastructure::repositories::scrape_result_repo_impl::ScrapeResultRepositoryImpl;
use siteprofiler::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use siteprofiler::infrastructure::storage::LocalReportStore;
use siteprofiler::presentation::routes;
use siteprofiler::utils::telemetry;
use siteprofiler::workers::manager::WorkerManager;
use siteprofiler::workers::scrape_worker::PipelineStages;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration and initialize logging
    let settings = Arc::new(Settings::new()?);
    telemetry::init_telemetry(settings.logging.json);
    info!("Starting siteprofiler...");

    init_metrics(&settings.metrics);

    // 2. Connect to database and run migrations
    let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);
    info!("Database connection established");

    // 3. Initialize repositories and report output
    let task_repo = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let result_repo = Arc::new(ScrapeResultRepositoryImpl::new(db.clone()));
    let report_store: Arc<dyn ReportStore> =
        Arc::new(LocalReportStore::new(settings.reports.dir.clone()));

    let browser_pool = if settings.browser.enabled {
        info!(
            "Browser fallback enabled with {} instances",
            settings.browser.max_instances
        );
        Some(Arc::new(BrowserPool::new(settings.browser.clone())))
    } else {
        None
    };

    // 4. Start workers
    let stages = PipelineStages::from_settings(
        &settings,
        browser_pool.clone(),
        Arc::new(PdfEncoder),
        report_store.clone(),
    )?;
    let mut worker_manager = WorkerManager::new(
        task_repo.clone(),
        result_repo.clone(),
        stages,
        Duration::from_millis(settings.workers.poll_interval_ms),
    );
    worker_manager.start_workers(settings.workers.count);

    // 5. Start HTTP server
    let app = routes::app(task_repo, result_repo, report_store);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 6. Drain workers before releasing browsers
    worker_manager.shutdown().await;
    if let Some(pool) = browser_pool {
        pool.shutdown();
    }
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
