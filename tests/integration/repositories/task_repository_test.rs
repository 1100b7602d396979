// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::test_db;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ActiveModelTrait, Set};
use siteprofiler::domain::models::task::{DomainError, TaskStatus};
use siteprofiler::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use siteprofiler::infrastructure::database::entities::task as task_entity;
use std::collections::HashSet;

#[tokio::test]
async fn test_create_and_list_in_creation_order() {
    let env = test_db().await;

    let first = env.task_repo.create("https://acme.co").await.unwrap();
    let second = env.task_repo.create("https://globex.com").await.unwrap();

    assert_eq!(first.status, TaskStatus::Queued);
    assert!(first.report_path.is_none());
    assert!(second.id > first.id);

    let tasks = env.task_repo.list().await.unwrap();
    let urls: Vec<&str> = tasks.iter().map(|t| t.url.as_str()).collect();
    assert_eq!(urls, vec!["https://acme.co", "https://globex.com"]);

    let found = env.task_repo.find_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(found.url, "https://globex.com");
    assert!(env.task_repo.find_by_id(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_acquire_next_claims_oldest_queued_task() {
    let env = test_db().await;
    let first = env.task_repo.create("https://acme.co").await.unwrap();
    let second = env.task_repo.create("https://globex.com").await.unwrap();

    let claimed = env.task_repo.acquire_next().await.unwrap().unwrap();
    assert_eq!(claimed.id, first.id);
    assert_eq!(claimed.status, TaskStatus::Running);

    let stored = env.task_repo.find_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Running);

    let claimed = env.task_repo.acquire_next().await.unwrap().unwrap();
    assert_eq!(claimed.id, second.id);

    assert!(env.task_repo.acquire_next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_acquire_never_hands_out_a_task_twice() {
    let env = test_db().await;
    for i in 0..3 {
        env.task_repo
            .create(&format!("https://site{}.example", i))
            .await
            .unwrap();
    }

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let repo = env.task_repo.clone();
            tokio::spawn(async move { repo.acquire_next().await.unwrap() })
        })
        .collect();

    let mut claimed = Vec::new();
    for handle in handles {
        if let Some(task) = handle.await.unwrap() {
            claimed.push(task.id);
        }
    }

    let unique: HashSet<i32> = claimed.iter().copied().collect();
    assert_eq!(claimed.len(), 3);
    assert_eq!(unique.len(), 3);
}

#[tokio::test]
async fn test_mark_completed_records_report_path() {
    let env = test_db().await;
    let task = env.task_repo.create("https://acme.co").await.unwrap();
    env.task_repo.acquire_next().await.unwrap();

    env.task_repo
        .mark_completed(task.id, Some("reports/scraping_report_1.pdf".to_string()))
        .await
        .unwrap();

    let stored = env.task_repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
    assert_eq!(
        stored.report_path.as_deref(),
        Some("reports/scraping_report_1.pdf")
    );
}

#[tokio::test]
async fn test_terminal_state_is_final() {
    let env = test_db().await;
    let task = env.task_repo.create("https://acme.co").await.unwrap();
    env.task_repo.acquire_next().await.unwrap();
    env.task_repo.mark_failed(task.id).await.unwrap();

    let result = env.task_repo.mark_completed(task.id, None).await;
    assert!(matches!(
        result,
        Err(RepositoryError::Domain(DomainError::InvalidStateTransition {
            from: TaskStatus::Failed,
            to: TaskStatus::Completed,
        }))
    ));

    let stored = env.task_repo.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Failed);
}

#[tokio::test]
async fn test_queued_task_cannot_skip_running() {
    let env = test_db().await;
    let task = env.task_repo.create("https://acme.co").await.unwrap();

    assert!(matches!(
        env.task_repo.mark_failed(task.id).await,
        Err(RepositoryError::Domain(_))
    ));
    assert!(matches!(
        env.task_repo.mark_failed(4242).await,
        Err(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_unknown_stored_status_is_an_error() {
    let env = test_db().await;
    let now: DateTime<FixedOffset> = Utc::now().into();
    let row = task_entity::ActiveModel {
        url: Set("https://acme.co".to_string()),
        status: Set("paused".to_string()),
        report_path: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(env.db.as_ref())
    .await
    .unwrap();

    match env.task_repo.find_by_id(row.id).await {
        Err(RepositoryError::Domain(DomainError::ValidationError(message))) => {
            assert!(message.contains("paused"));
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
    assert!(env.task_repo.list().await.is_err());

    // a corrupted row is never picked up as queued work
    assert!(env.task_repo.acquire_next().await.unwrap().is_none());
}
