// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 判断链接是否已是绝对的 http(s) URL
pub fn is_absolute_http(href: &str) -> bool {
    Url::parse(href.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

/// 以简单路径拼接的方式将链接挂到基础URL上
///
/// 绝对链接原样返回；其余链接去掉前导`/`后拼接到去掉尾部`/`的基础URL之后。
/// 这不是 RFC 3986 的相对引用解析，`../` 与查询串都按字面拼接。
pub fn join_by_concatenation(base_url: &str, href: &str) -> String {
    let href = href.trim();
    if is_absolute_http(href) {
        return href.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

/// 生成用于判重的URL形式
///
/// 去掉片段与路径尾部的`/`，使`http://host`与`http://host/#top`视为同一页。
/// 无法解析的输入仅去掉尾部`/`。
pub fn normalize_for_visit(url: &str) -> String {
    let trimmed = url.trim();
    match Url::parse(trimmed) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => trimmed.trim_end_matches('/').to_string(),
    }
}
