// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::ExtractedRecord;
use crate::domain::repositories::storage_repository::{ReportStore, StorageError};
use crate::utils::text_sanitizer::{sanitize_for_report, truncate_with_ellipsis};
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// A4纸宽（毫米）
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4纸高（毫米）
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const MARGIN_MM: f32 = 10.0;
const LABEL_WIDTH_MM: f32 = 30.0;
const AUTO_BREAK_MM: f32 = PAGE_HEIGHT_MM - 20.0;
const RECORD_BREAK_MM: f32 = 250.0;
const PT_TO_MM: f32 = 0.3528;

/// 报告渲染错误
#[derive(Error, Debug)]
pub enum ReportError {
    /// 文档编码失败
    #[error("Failed to encode report: {0}")]
    Encode(String),
    /// 报告保存失败
    #[error("Failed to store report: {0}")]
    Storage(#[from] StorageError),
}

/// 一段定位好的文本，坐标以页面左上角为原点
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_pt: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPage {
    pub runs: Vec<TextRun>,
}

/// 排版完成的报告，所有文本均已转换为可打印ASCII
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title: String,
    pub pages: Vec<ReportPage>,
}

impl ReportLayout {
    /// 按页面顺序返回所有文本
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|page| page.runs.iter().map(|run| run.text.as_str()))
    }
}

/// 文档编码器特质
///
/// 将排版结果编码为最终的文件字节
pub trait DocumentEncoder: Send + Sync {
    fn encode(&self, layout: &ReportLayout) -> Result<Vec<u8>, ReportError>;
}

/// 报告文件名：`scraping_report_{task_id}_{YYYYMMDD_HHMMSS}.pdf`
pub fn report_file_name(task_id: i32, generated_at: NaiveDateTime) -> String {
    format!(
        "{}{}.pdf",
        report_file_prefix(task_id),
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// 同一任务所有报告文件共有的前缀
pub fn report_file_prefix(task_id: i32) -> String {
    format!("scraping_report_{}_", task_id)
}

/// 下载时使用的规范文件名
pub fn download_file_name(task_id: i32) -> String {
    format!("scraping_report_task_{}.pdf", task_id)
}

/// 报告渲染器
pub struct ReportRenderer {
    encoder: Arc<dyn DocumentEncoder>,
    store: Arc<dyn ReportStore>,
}

impl ReportRenderer {
    pub fn new(encoder: Arc<dyn DocumentEncoder>, store: Arc<dyn ReportStore>) -> Self {
        Self { encoder, store }
    }

    /// 渲染并保存任务报告
    ///
    /// # 参数
    ///
    /// * `task_id` - 任务ID
    /// * `records` - 任务的全部提取记录
    ///
    /// # 返回值
    ///
    /// * `Ok(PathBuf)` - 报告的存储位置
    /// * `Err(ReportError)` - 编码或保存失败
    pub async fn render(
        &self,
        task_id: i32,
        records: &[ExtractedRecord],
    ) -> Result<PathBuf, ReportError> {
        let generated_at = Local::now().naive_local();
        let layout = layout_report(task_id, records, generated_at);
        let bytes = self.encoder.encode(&layout)?;

        let location = self
            .store
            .save(&report_file_name(task_id, generated_at), &bytes)
            .await?;
        info!(
            "Report for task {} written to {} ({} pages)",
            task_id,
            location.display(),
            layout.pages.len()
        );
        Ok(location)
    }
}

struct LayoutCursor {
    pages: Vec<ReportPage>,
    y_mm: f32,
}

impl LayoutCursor {
    fn new() -> Self {
        Self {
            pages: vec![ReportPage::default()],
            y_mm: MARGIN_MM,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(ReportPage::default());
        self.y_mm = MARGIN_MM;
    }

    fn gap(&mut self, height_mm: f32) {
        self.y_mm += height_mm;
    }

    fn push(&mut self, x_mm: f32, text: String, size_pt: f32, bold: bool) {
        if let Some(page) = self.pages.last_mut() {
            page.runs.push(TextRun {
                text,
                x_mm,
                y_mm: self.y_mm,
                size_pt,
                bold,
            });
        }
    }

    /// 写一行文本，空间不足时自动换页
    fn line(&mut self, text: &str, size_pt: f32, bold: bool, height_mm: f32) {
        self.ensure_room(height_mm);
        self.push(MARGIN_MM, sanitize_for_report(text), size_pt, bold);
        self.y_mm += height_mm;
    }

    fn centered(&mut self, text: &str, size_pt: f32, height_mm: f32) {
        self.ensure_room(height_mm);
        let text = sanitize_for_report(text);
        let width_mm = text.chars().count() as f32 * size_pt * PT_TO_MM * 0.5;
        let x_mm = ((PAGE_WIDTH_MM - width_mm) / 2.0).max(MARGIN_MM);
        self.push(x_mm, text, size_pt, true);
        self.y_mm += height_mm;
    }

    fn field(&mut self, label: &str, value: &str) {
        self.ensure_room(6.0);
        self.push(MARGIN_MM, label.to_string(), 10.0, true);
        self.push(MARGIN_MM + LABEL_WIDTH_MM, value.to_string(), 10.0, false);
        self.y_mm += 6.0;
    }

    fn ensure_room(&mut self, height_mm: f32) {
        if self.y_mm + height_mm > AUTO_BREAK_MM {
            self.new_page();
        }
    }
}

/// 列出前`limit`项，其余以`(+N more)`计数
fn with_overflow<'a>(items: impl IntoIterator<Item = &'a str>, limit: usize) -> String {
    let cleaned: Vec<String> = items
        .into_iter()
        .map(sanitize_for_report)
        .filter(|item| !item.is_empty())
        .collect();
    let mut text = cleaned
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if cleaned.len() > limit {
        text.push_str(&format!(" (+{} more)", cleaned.len() - limit));
    }
    text
}

/// 对任务记录进行排版
///
/// 标题与摘要之后，每条记录一节，仅输出非空字段
pub fn layout_report(
    task_id: i32,
    records: &[ExtractedRecord],
    generated_at: NaiveDateTime,
) -> ReportLayout {
    let title = sanitize_for_report(&format!("Web Scraping Report - Task {}", task_id));
    let mut cursor = LayoutCursor::new();

    cursor.centered(&title, 20.0, 15.0);
    cursor.gap(5.0);
    cursor.line("Executive Summary", 14.0, true, 10.0);
    cursor.line(
        &format!("Total Records Extracted: {}", records.len()),
        11.0,
        false,
        8.0,
    );
    cursor.line(
        &format!(
            "Report Generated: {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        11.0,
        false,
        8.0,
    );
    cursor.gap(10.0);

    for (index, record) in records.iter().enumerate() {
        if cursor.y_mm > RECORD_BREAK_MM {
            cursor.new_page();
        }

        cursor.line(&format!("Record {}", index + 1), 12.0, true, 10.0);
        cursor.field(
            "URL:",
            &truncate_with_ellipsis(&sanitize_for_report(&record.url), 60),
        );
        cursor.field(
            "Company:",
            &record
                .company
                .as_deref()
                .map(sanitize_for_report)
                .unwrap_or_else(|| "N/A".to_string()),
        );

        if !record.contacts.emails.is_empty() {
            cursor.field(
                "Emails:",
                &with_overflow(record.contacts.emails.iter().map(String::as_str), 3),
            );
        }
        if !record.contacts.phones.is_empty() {
            cursor.field(
                "Phones:",
                &with_overflow(record.contacts.phones.iter().map(String::as_str), 3),
            );
        }
        if let Some(tagline) = &record.tagline {
            cursor.field(
                "Tagline:",
                &truncate_with_ellipsis(&sanitize_for_report(tagline), 80),
            );
        }
        if let Some(description) = &record.description {
            cursor.field(
                "Description:",
                &truncate_with_ellipsis(&sanitize_for_report(description), 100),
            );
        }
        if !record.services.is_empty() {
            cursor.field(
                "Services:",
                &with_overflow(record.services.iter().map(String::as_str), 5),
            );
        }
        if !record.social_media.is_empty() {
            cursor.field(
                "Social:",
                &with_overflow(record.social_media.keys().map(String::as_str), 3),
            );
        }
        if let Some(industry) = record.industry {
            cursor.field("Industry:", industry.display_name());
        }

        cursor.gap(5.0);
    }

    ReportLayout {
        title,
        pages: cursor.pages,
    }
}

#[cfg(test)]
#[path = "report_renderer_test.rs"]
mod tests;
