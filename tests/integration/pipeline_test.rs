// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{test_db, TestDb};
use async_trait::async_trait;
use siteprofiler::domain::models::task::{Task, TaskStatus};
use siteprofiler::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use siteprofiler::domain::repositories::storage_repository::ReportStore;
use siteprofiler::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use siteprofiler::domain::services::field_extractor::FieldExtractor;
use siteprofiler::domain::services::pagination::PaginationWalker;
use siteprofiler::domain::services::report_renderer::ReportRenderer;
use siteprofiler::domain::services::url_discovery::UrlDiscovery;
use siteprofiler::engines::acquirer::ContentAcquirer;
use siteprofiler::engines::reqwest_engine::ReqwestEngine;
use siteprofiler::engines::traits::ScraperEngine;
use siteprofiler::infrastructure::pdf_writer::PdfEncoder;
use siteprofiler::infrastructure::repositories::scrape_result_repo_impl::ScrapeResultRepositoryImpl;
use siteprofiler::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use siteprofiler::infrastructure::storage::LocalReportStore;
use siteprofiler::workers::scrape_worker::{PipelineStages, ScrapeWorker};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME_PAGE: &str = r#"<html>
<head>
  <title>Acme Widgets</title>
  <meta name="description" content="Reliable industrial widgets for manufacturing teams everywhere.">
</head>
<body>
  <h1>Acme Widgets</h1>
  <a href="mailto:sales@acme.co">Email us</a>
  <a href="/page/2">Next page</a>
</body>
</html>"#;

const SECOND_PAGE: &str = r#"<html>
<body>
  <p>Call us at (415) 555-0100</p>
  <a href="/contact">Contact</a>
</body>
</html>"#;

fn stages(report_dir: &Path) -> PipelineStages {
    let timeout = Duration::from_secs(5);
    let direct: Arc<dyn ScraperEngine> =
        Arc::new(ReqwestEngine::new("siteprofiler-test").unwrap());
    let store: Arc<dyn ReportStore> = Arc::new(LocalReportStore::new(report_dir));

    PipelineStages {
        discovery: Arc::new(UrlDiscovery::new(direct.clone(), timeout, 100)),
        acquirer: Arc::new(ContentAcquirer::new(vec![direct.clone()], timeout)),
        walker: Arc::new(PaginationWalker::new(direct, timeout, 20)),
        extractor: Arc::new(FieldExtractor::default()),
        renderer: Arc::new(ReportRenderer::new(Arc::new(PdfEncoder), store)),
    }
}

fn worker(
    env: &TestDb,
    report_dir: &Path,
) -> ScrapeWorker<TaskRepositoryImpl, ScrapeResultRepositoryImpl> {
    ScrapeWorker::new(
        env.task_repo.clone(),
        env.result_repo.clone(),
        stages(report_dir),
        Duration::from_millis(10),
        0,
    )
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_pipeline_completes_with_paginated_records_and_report() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, HOME_PAGE).await;
    mount_page(&server, "/page/2", 200, SECOND_PAGE).await;

    let env = test_db().await;
    let report_dir = TempDir::new().unwrap();
    let task = env.task_repo.create(&server.uri()).await.unwrap();

    let worker = worker(&env, report_dir.path());
    assert!(worker.process_next().await.unwrap());

    let stored = env.task_repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);

    let result = env
        .result_repo
        .find_by_task_id(task.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.data.len(), 2);

    let home = &result.data[0];
    assert_eq!(home.company.as_deref(), Some("Acme Widgets"));
    assert_eq!(home.contacts.emails, vec!["sales@acme.co".to_string()]);
    assert_eq!(home.provenance.as_ref().unwrap().page_number, 1);
    assert_eq!(home.provenance.as_ref().unwrap().task_id, task.id);

    let second = &result.data[1];
    assert_eq!(second.contacts.phones, vec!["(415) 555-0100".to_string()]);
    assert_eq!(second.provenance.as_ref().unwrap().page_number, 2);

    let report_path = stored.report_path.expect("report path recorded");
    let bytes = std::fs::read(&report_path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(Path::new(&report_path).starts_with(report_dir.path()));
}

#[tokio::test]
async fn test_unreachable_site_fails_without_result() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 500, "internal error").await;

    let env = test_db().await;
    let report_dir = TempDir::new().unwrap();
    let task = env.task_repo.create(&server.uri()).await.unwrap();

    let worker = worker(&env, report_dir.path());
    assert!(worker.process_next().await.unwrap());

    let stored = env.task_repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Failed);
    assert!(stored.report_path.is_none());
    assert!(env
        .result_repo
        .find_by_task_id(task.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_blank_pages_fail_the_task() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, "<html><body><div></div></body></html>").await;

    let env = test_db().await;
    let report_dir = TempDir::new().unwrap();
    let task = env.task_repo.create(&server.uri()).await.unwrap();

    let worker = worker(&env, report_dir.path());
    assert_eq!(
        worker
            .execute(env.task_repo.acquire_next().await.unwrap().unwrap())
            .await,
        TaskStatus::Failed
    );

    let stored = env.task_repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Failed);
}

/// 第一次标记完成时失败的任务仓库
struct FlakyCompletion {
    inner: Arc<TaskRepositoryImpl>,
    completions: AtomicUsize,
}

#[async_trait]
impl TaskRepository for FlakyCompletion {
    async fn create(&self, url: &str) -> Result<Task, RepositoryError> {
        self.inner.create(url).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        self.inner.list().await
    }

    async fn acquire_next(&self) -> Result<Option<Task>, RepositoryError> {
        self.inner.acquire_next().await
    }

    async fn mark_completed(
        &self,
        id: i32,
        report_path: Option<String>,
    ) -> Result<(), RepositoryError> {
        if self.completions.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.inner.mark_completed(id, report_path).await
    }

    async fn mark_failed(&self, id: i32) -> Result<(), RepositoryError> {
        self.inner.mark_failed(id).await
    }
}

#[tokio::test]
async fn test_persisted_results_are_never_marked_failed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, HOME_PAGE).await;
    mount_page(&server, "/page/2", 200, SECOND_PAGE).await;

    let env = test_db().await;
    let report_dir = TempDir::new().unwrap();
    let task = env.task_repo.create(&server.uri()).await.unwrap();

    let repository = Arc::new(FlakyCompletion {
        inner: env.task_repo.clone(),
        completions: AtomicUsize::new(0),
    });
    let worker = ScrapeWorker::new(
        repository.clone(),
        env.result_repo.clone(),
        stages(report_dir.path()),
        Duration::from_millis(10),
        0,
    );
    assert!(worker.process_next().await.unwrap());

    assert_eq!(repository.completions.load(Ordering::SeqCst), 2);
    let stored = env.task_repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
    assert!(stored.report_path.is_none());

    let result = env
        .result_repo
        .find_by_task_id(task.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.data.len(), 2);
}

#[tokio::test]
async fn test_idle_worker_reports_no_work() {
    let env = test_db().await;
    let report_dir = TempDir::new().unwrap();

    let worker = worker(&env, report_dir.path());
    assert!(!worker.process_next().await.unwrap());
}
