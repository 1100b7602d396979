// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::usecases::create_scrape::CreateScrapeUseCase;
use crate::application::usecases::download_report::DownloadReportUseCase;
use crate::application::usecases::query_tasks::QueryTasksUseCase;
use crate::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use crate::domain::repositories::storage_repository::ReportStore;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::presentation::handlers::{report_handler, scrape_handler, task_handler};
use axum::{
    extract::Json,
    routing::{get, post},
    Extension, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回未注入状态的路由，调用方需要通过`Extension`提供各用例
pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
        .route("/scrape", post(scrape_handler::create_scrape))
        .route("/tasks", get(task_handler::list_tasks))
        .route("/tasks/{task_id}", get(task_handler::get_task))
        .route("/result/{task_id}", get(task_handler::get_result))
        .route(
            "/download-report/{task_id}",
            get(report_handler::download_report),
        )
}

/// 创建完整的应用
///
/// 在路由之上注入用例、请求追踪和跨域层
///
/// # 参数
///
/// * `task_repository` - 任务仓库
/// * `result_repository` - 结果仓库
/// * `report_store` - 报告存储
pub fn app(
    task_repository: Arc<dyn TaskRepository>,
    result_repository: Arc<dyn ScrapeResultRepository>,
    report_store: Arc<dyn ReportStore>,
) -> Router {
    let create_scrape = Arc::new(CreateScrapeUseCase::new(task_repository.clone()));
    let query_tasks = Arc::new(QueryTasksUseCase::new(
        task_repository.clone(),
        result_repository,
    ));
    let download_report = Arc::new(DownloadReportUseCase::new(task_repository, report_store));

    routes()
        .layer(Extension(create_scrape))
        .layer(Extension(query_tasks))
        .layer(Extension(download_report))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 健康检查端点
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Web scraping service is running"
    }))
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
