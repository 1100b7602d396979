// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::test_db;
use siteprofiler::domain::models::record::{ExtractedRecord, Industry};
use siteprofiler::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use siteprofiler::domain::repositories::task_repository::TaskRepository;

fn record(url: &str) -> ExtractedRecord {
    let mut record = ExtractedRecord::empty(url);
    record.company = Some("Acme Widgets".to_string());
    record.contacts.emails = vec!["sales@acme.co".to_string()];
    record.industry = Some(Industry::Manufacturing);
    record
}

#[tokio::test]
async fn test_save_and_find_by_task_id() {
    let env = test_db().await;
    let task = env.task_repo.create("https://acme.co").await.unwrap();
    let records = vec![
        record("https://acme.co").stamp(task.id, 1),
        record("https://acme.co").stamp(task.id, 2),
    ];

    let saved = env.result_repo.save(task.id, &records).await.unwrap();
    assert_eq!(saved.task_id, task.id);

    let found = env
        .result_repo
        .find_by_task_id(task.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, saved.id);
    assert_eq!(found.data, records);
}

#[tokio::test]
async fn test_missing_result_is_none() {
    let env = test_db().await;
    assert!(env.result_repo.find_by_task_id(77).await.unwrap().is_none());
}

#[tokio::test]
async fn test_one_result_per_task() {
    let env = test_db().await;
    let task = env.task_repo.create("https://acme.co").await.unwrap();
    let records = vec![record("https://acme.co")];

    env.result_repo.save(task.id, &records).await.unwrap();
    assert!(env.result_repo.save(task.id, &records).await.is_err());
}
