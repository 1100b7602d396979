// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::usecases::download_report::DownloadReportUseCase;
use crate::presentation::errors::ApiError;

/// 下载任务报告
pub async fn download_report(
    Extension(use_case): Extension<Arc<DownloadReportUseCase>>,
    Path(task_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let report = use_case.execute(task_id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", report.file_name),
        ),
        (header::CACHE_CONTROL, "no-cache".to_string()),
    ];
    Ok((headers, report.content))
}
