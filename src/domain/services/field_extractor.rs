// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::{Contacts, ExtractedRecord, Industry};
use crate::domain::services::extraction_config::ExtractionConfig;
use scraper::{ElementRef, Html};
use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;
use thiserror::Error;

const HIDDEN_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// 不打断单词的行内元素，其余元素两侧视为单词边界
const INLINE_TAGS: [&str; 22] = [
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "data", "dfn", "em", "font", "i", "kbd",
    "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup",
];

/// 提取错误
#[derive(Error, Debug, PartialEq)]
pub enum ExtractionError {
    /// 输入为空白文档
    #[error("Document is empty")]
    EmptyDocument,
}

/// 字段提取器
///
/// 对单页HTML按固定的启发式规则逐字段提取，每个字段按规则顺序先匹配者胜出
pub struct FieldExtractor {
    config: ExtractionConfig,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl FieldExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// 从一页HTML中提取记录
    ///
    /// # 参数
    ///
    /// * `html` - 页面HTML
    /// * `url` - 页面来源URL
    ///
    /// # 返回值
    ///
    /// * `Ok(ExtractedRecord)` - 提取结果，字段可能全部为空
    /// * `Err(ExtractionError)` - 文档为空
    pub fn extract(&self, html: &str, url: &str) -> Result<ExtractedRecord, ExtractionError> {
        if html.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        let document = Html::parse_document(html);
        let text = visible_text(document.root_element());

        Ok(ExtractedRecord {
            url: url.to_string(),
            company: self.company(&document),
            contacts: Contacts {
                emails: self.emails(&document, &text),
                phones: self.phones(&document, &text),
                contact_page: self.contact_page(&document),
            },
            tagline: self.tagline(&document),
            services: self.services(&document),
            social_media: self.social_media(&document),
            address: self.address(&document, &text),
            description: self.description(&document),
            industry: industry(&text),
            provenance: None,
        })
    }

    fn company(&self, document: &Html) -> Option<String> {
        let by_selector = self.config.company_selectors.iter().find_map(|selector| {
            let name = element_text(document.select(selector).next()?);
            within(&name, 3..=99).then_some(name)
        });
        if by_selector.is_some() {
            return by_selector;
        }

        if let Some(meta) = document.select(&self.config.site_name_meta).next() {
            let site_name = meta.value().attr("content").unwrap_or_default().trim();
            if !site_name.is_empty() {
                return Some(site_name.to_string());
            }
        }

        let title = element_text(document.select(&self.config.title).next()?);
        self.config
            .title_separators
            .iter()
            .find_map(|separator| title.split_once(separator))
            .map(|(head, _)| head.trim().to_string())
            .filter(|head| !head.is_empty())
    }

    fn hrefs<'a>(&self, document: &'a Html) -> Vec<&'a str> {
        document
            .select(&self.config.anchors)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .collect()
    }

    fn emails(&self, document: &Html, text: &str) -> Vec<String> {
        let hrefs = self.hrefs(document);
        let from_links = hrefs
            .iter()
            .filter_map(|href| href.strip_prefix("mailto:"))
            .map(|target| target.split('?').next().unwrap_or_default().trim().to_string());
        let from_text = self
            .config
            .email_pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string());

        let mut seen = HashSet::new();
        from_links
            .chain(from_text)
            .filter(|email| self.is_valid_email(email))
            .filter(|email| seen.insert(email.clone()))
            .collect()
    }

    /// 判断邮箱是否有效
    ///
    /// 要求整体匹配邮箱格式，且不包含占位符样式的片段
    pub fn is_valid_email(&self, email: &str) -> bool {
        if !self.config.email_exact.is_match(email) {
            return false;
        }
        let lowered = email.to_lowercase();
        !self
            .config
            .email_placeholders
            .iter()
            .any(|placeholder| lowered.contains(placeholder))
    }

    fn phones(&self, document: &Html, text: &str) -> Vec<String> {
        let from_links: Vec<String> = self
            .hrefs(document)
            .into_iter()
            .filter_map(|href| href.strip_prefix("tel:"))
            .map(|target| target.trim().to_string())
            .collect();
        let from_text = self
            .config
            .phone_patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(text).map(|m| m.as_str().trim().to_string()));

        let mut seen = HashSet::new();
        from_links
            .into_iter()
            .chain(from_text)
            .filter(|phone| is_valid_phone(phone))
            .filter(|phone| seen.insert(clean_phone(phone)))
            .collect()
    }

    fn contact_page(&self, document: &Html) -> Option<String> {
        document.select(&self.config.anchors).find_map(|anchor| {
            let label = element_text(anchor).to_lowercase();
            self.config
                .contact_keywords
                .iter()
                .any(|keyword| label.contains(keyword))
                .then(|| anchor.value().attr("href").map(str::to_string))
                .flatten()
        })
    }

    fn tagline(&self, document: &Html) -> Option<String> {
        for selector in &self.config.tagline_meta {
            if let Some(content) = meta_content(document.select(selector).next()) {
                if within(&content, 20..=200) {
                    return Some(content);
                }
            }
        }

        let by_class = self.config.tagline_selectors.iter().find_map(|selector| {
            let tagline = element_text(document.select(selector).next()?);
            within(&tagline, 10..=200).then_some(tagline)
        });
        if by_class.is_some() {
            return by_class;
        }

        document
            .select(&self.config.paragraphs)
            .take(3)
            .map(element_text)
            .find(|p| {
                within(p, 20..=150)
                    && !self
                        .config
                        .tagline_excluded_prefixes
                        .iter()
                        .any(|prefix| p.starts_with(prefix))
            })
    }

    fn services(&self, document: &Html) -> Vec<String> {
        let mut candidates: Vec<String> = self
            .config
            .service_selectors
            .iter()
            .flat_map(|selector| document.select(selector).map(element_text))
            .collect();

        for heading in document.select(&self.config.service_headings) {
            let title = element_text(heading).to_lowercase();
            if !self
                .config
                .service_keywords
                .iter()
                .any(|keyword| title.contains(keyword))
            {
                continue;
            }

            let Some(block) = heading
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|el| matches!(el.value().name(), "ul" | "ol" | "div"))
            else {
                continue;
            };

            let mut items: Vec<ElementRef> = block.select(&self.config.list_items).collect();
            if items.is_empty() {
                items = block.select(&self.config.paragraphs).collect();
            }
            candidates.extend(
                items
                    .into_iter()
                    .take(self.config.max_services_per_heading)
                    .map(element_text),
            );
        }

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|service| within(service, 3..=100))
            .filter(|service| seen.insert(service.clone()))
            .take(self.config.max_services)
            .collect()
    }

    fn social_media(&self, document: &Html) -> BTreeMap<String, String> {
        let mut profiles = BTreeMap::new();
        for href in self.hrefs(document) {
            if let Some((platform, _)) = self
                .config
                .social_patterns
                .iter()
                .find(|(_, pattern)| pattern.is_match(href))
            {
                profiles.insert(platform.to_string(), href.to_string());
            }
        }
        profiles
    }

    fn address(&self, document: &Html, text: &str) -> Option<String> {
        let by_selector = self.config.address_selectors.iter().find_map(|selector| {
            let address = element_text(document.select(selector).next()?);
            (address.chars().count() > 10).then_some(address)
        });
        by_selector.or_else(|| {
            self.config
                .address_pattern
                .find(text)
                .map(|m| m.as_str().trim().to_string())
        })
    }

    fn description(&self, document: &Html) -> Option<String> {
        if let Some(content) = meta_content(document.select(&self.config.description_meta).next())
        {
            if within(&content, 50..=500) {
                return Some(content);
            }
        }

        let elements: Vec<ElementRef> = document.select(&self.config.all_elements).collect();
        for heading in document.select(&self.config.about_headings) {
            if !self.config.about_pattern.is_match(&element_text(heading)) {
                continue;
            }
            let Some(position) = elements.iter().position(|el| el.id() == heading.id()) else {
                continue;
            };
            let following = elements[position + 1..].iter().find(|el| {
                matches!(el.value().name(), "p" | "div")
                    && !el.ancestors().any(|ancestor| ancestor.id() == heading.id())
            });
            if let Some(next) = following {
                let description = element_text(*next);
                if within(&description, 50..=500) {
                    return Some(description);
                }
            }
        }
        None
    }
}

/// 判断电话是否有效
///
/// 去掉数字和加号以外的字符后长度需在10到15之间
pub fn is_valid_phone(phone: &str) -> bool {
    (10..=15).contains(&clean_phone(phone).len())
}

fn clean_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

fn industry(text: &str) -> Option<Industry> {
    let lowered = text.to_lowercase();
    Industry::ALL
        .into_iter()
        .find(|industry| lowered.contains(industry.keyword()))
}

fn within(value: &str, range: RangeInclusive<usize>) -> bool {
    range.contains(&value.chars().count())
}

fn meta_content(meta: Option<ElementRef>) -> Option<String> {
    meta?
        .value()
        .attr("content")
        .map(|content| content.trim().to_string())
}

/// 元素内可见文本，忽略脚本和样式，空白折叠为单个空格
fn element_text(element: ElementRef) -> String {
    visible_text(element)
}

fn visible_text(root: ElementRef) -> String {
    let mut raw = String::new();
    for node in root.descendants() {
        if let Some(element) = node.value().as_element() {
            if !INLINE_TAGS.contains(&element.name()) {
                raw.push(' ');
            }
            continue;
        }
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        // text right after a closed block element starts a new word
        let after_block = node
            .prev_sibling()
            .and_then(|sibling| sibling.value().as_element().map(|el| el.name()))
            .is_some_and(|name| !INLINE_TAGS.contains(&name));
        if after_block {
            raw.push(' ');
        }
        raw.push_str(text);
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "field_extractor_test.rs"]
mod tests;
