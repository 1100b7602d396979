// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 抓取请求数据传输对象
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ScrapeRequestDto {
    /// 种子URL，必须是 http(s) 绝对地址
    #[validate(url(message = "invalid url"))]
    pub url: String,
}
