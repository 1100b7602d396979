// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;
use crate::domain::models::record::Industry;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::path::Path;

fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap()
}

fn sample_record() -> ExtractedRecord {
    let mut record = ExtractedRecord::empty(format!("https://acme.co/{}", "a".repeat(80)));
    record.company = Some("Acme \u{2014} Widgets\u{2122}".to_string());
    record.contacts.emails = (1..=5).map(|i| format!("team{}@acme.co", i)).collect();
    record.services = vec!["Design".to_string(), "Hosting".to_string()];
    record
        .social_media
        .insert("twitter".to_string(), "https://twitter.com/acme".to_string());
    record.industry = Some(Industry::Software);
    record
}

#[test]
fn test_report_file_name_pattern() {
    assert_eq!(
        report_file_name(7, generated_at()),
        "scraping_report_7_20240102_030405.pdf"
    );
    assert!(report_file_name(7, generated_at()).starts_with(&report_file_prefix(7)));
    assert_eq!(download_file_name(7), "scraping_report_task_7.pdf");
}

#[test]
fn test_layout_header_and_summary() {
    let layout = layout_report(7, &[sample_record()], generated_at());
    let lines: Vec<&str> = layout.lines().collect();

    assert_eq!(layout.title, "Web Scraping Report - Task 7");
    assert_eq!(lines[0], "Web Scraping Report - Task 7");
    assert!(lines.contains(&"Total Records Extracted: 1"));
    assert!(lines.contains(&"Report Generated: 2024-01-02 03:04:05"));
    assert!(lines.contains(&"Record 1"));
}

#[test]
fn test_layout_record_fields_are_sanitized_and_bounded() {
    let layout = layout_report(1, &[sample_record()], generated_at());
    let lines: Vec<&str> = layout.lines().collect();

    let url = lines
        .iter()
        .find(|line| line.starts_with("https://acme.co/"))
        .unwrap();
    assert_eq!(url.chars().count(), 63);
    assert!(url.ends_with("..."));

    assert!(lines.contains(&"Acme -- Widgets(TM)"));
    assert!(lines.contains(&"team1@acme.co, team2@acme.co, team3@acme.co (+2 more)"));
    assert!(lines.contains(&"Design, Hosting"));
    assert!(lines.contains(&"twitter"));
    assert!(lines.contains(&"Software"));
    // empty optional sections are omitted
    assert!(!lines.contains(&"Phones:"));
    assert!(!lines.contains(&"Tagline:"));
}

#[test]
fn test_missing_company_renders_placeholder() {
    let layout = layout_report(1, &[ExtractedRecord::empty("https://acme.co")], generated_at());
    assert!(layout.lines().any(|line| line == "N/A"));
}

#[test]
fn test_many_records_span_pages() {
    let records: Vec<ExtractedRecord> = (0..30).map(|_| sample_record()).collect();
    let layout = layout_report(1, &records, generated_at());

    assert!(layout.pages.len() > 1);
    for page in &layout.pages {
        for run in &page.runs {
            assert!(run.y_mm <= PAGE_HEIGHT_MM - 20.0);
        }
    }
    assert!(layout.lines().any(|line| line == "Record 30"));
}

struct FakeEncoder;

impl DocumentEncoder for FakeEncoder {
    fn encode(&self, layout: &ReportLayout) -> Result<Vec<u8>, ReportError> {
        Ok(layout.title.clone().into_bytes())
    }
}

struct FailingEncoder;

impl DocumentEncoder for FailingEncoder {
    fn encode(&self, _layout: &ReportLayout) -> Result<Vec<u8>, ReportError> {
        Err(ReportError::Encode("boom".to_string()))
    }
}

#[derive(Default)]
struct MemoryStore {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn save(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        self.saved.lock().push((file_name.to_string(), data.to_vec()));
        Ok(PathBuf::from("reports").join(file_name))
    }

    async fn find_for_task(&self, _task_id: i32) -> Result<Option<PathBuf>, StorageError> {
        Ok(None)
    }

    async fn read(&self, _location: &Path) -> Result<Vec<u8>, StorageError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_render_encodes_and_stores() {
    let store = Arc::new(MemoryStore::default());
    let renderer = ReportRenderer::new(Arc::new(FakeEncoder), store.clone());

    let location = renderer.render(9, &[sample_record()]).await.unwrap();

    let saved = store.saved.lock();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].0.starts_with("scraping_report_9_"));
    assert!(saved[0].0.ends_with(".pdf"));
    assert_eq!(saved[0].1, b"Web Scraping Report - Task 9".to_vec());
    assert_eq!(location, PathBuf::from("reports").join(&saved[0].0));
}

#[tokio::test]
async fn test_render_reports_encoder_failure() {
    let store = Arc::new(MemoryStore::default());
    let renderer = ReportRenderer::new(Arc::new(FailingEncoder), store.clone());

    let result = renderer.render(9, &[sample_record()]).await;
    assert!(matches!(result, Err(ReportError::Encode(_))));
    assert!(store.saved.lock().is_empty());
}
