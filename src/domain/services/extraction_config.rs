// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use regex::Regex;
use scraper::Selector;

/// 字段提取规则
///
/// 选择器、正则与词表在构造时编译一次，此后只读，
/// 可以在多个任务之间共享
pub struct ExtractionConfig {
    pub company_selectors: Vec<Selector>,
    pub site_name_meta: Selector,
    pub title: Selector,
    pub title_separators: Vec<&'static str>,

    pub anchors: Selector,
    pub email_pattern: Regex,
    pub email_exact: Regex,
    pub email_placeholders: Vec<&'static str>,
    pub phone_patterns: Vec<Regex>,
    pub contact_keywords: Vec<&'static str>,

    pub tagline_meta: Vec<Selector>,
    pub tagline_selectors: Vec<Selector>,
    pub paragraphs: Selector,
    pub tagline_excluded_prefixes: Vec<&'static str>,

    pub service_selectors: Vec<Selector>,
    pub service_headings: Selector,
    pub service_keywords: Vec<&'static str>,
    pub list_items: Selector,
    pub max_services: usize,
    pub max_services_per_heading: usize,

    pub social_patterns: Vec<(&'static str, Regex)>,

    pub address_selectors: Vec<Selector>,
    pub address_pattern: Regex,

    pub description_meta: Selector,
    pub about_headings: Selector,
    pub about_pattern: Regex,
    pub all_elements: Selector,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("built-in selector must parse")
}

fn selectors(list: &[&str]) -> Vec<Selector> {
    list.iter().map(|css| selector(css)).collect()
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            company_selectors: selectors(&[
                "h1",
                ".company-name",
                ".org-title",
                ".company-title",
                r#"[data-testid*="company"]"#,
                ".business-name",
                ".brand-name",
                ".site-title",
                ".logo-text",
                "title",
                ".header-title",
                ".hero-title",
                ".main-title",
                r#"[class*="company"]"#,
                r#"[class*="brand"]"#,
                r#"[id*="company"]"#,
            ]),
            site_name_meta: selector(r#"meta[property="og:site_name"]"#),
            title: selector("title"),
            title_separators: vec![" | ", " - ", " \u{2013} ", " :: "],

            anchors: selector("a[href]"),
            email_pattern: regex(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
            email_exact: regex(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$"),
            email_placeholders: vec!["example", "test", "dummy", "placeholder", "yourname"],
            phone_patterns: vec![
                // US format
                regex(r"\+?1?[-.\s]?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})"),
                // (123) 456-7890
                regex(r"\(\d{3}\)\s?\d{3}[-.\s]?\d{4}"),
                // general international
                regex(r"\+?[0-9]{1,4}[-.\s]?\(?[0-9]{1,4}\)?[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,4}"),
                // plain 10 digit
                regex(r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b"),
            ],
            contact_keywords: vec!["contact", "about", "reach", "connect", "get in touch"],

            tagline_meta: selectors(&[
                r#"meta[name="description"]"#,
                r#"meta[property="og:description"]"#,
            ]),
            tagline_selectors: selectors(&[
                ".tagline",
                ".slogan",
                ".subtitle",
                ".hero-subtitle",
                ".lead",
                ".description",
                ".intro",
                "p.lead",
                ".hero-description",
                r#"[class*="tagline"]"#,
                r#"[class*="slogan"]"#,
            ]),
            paragraphs: selector("p"),
            tagline_excluded_prefixes: vec!["The", "This", "Our"],

            service_selectors: selectors(&[
                ".services li",
                ".offerings li",
                ".products li",
                ".features li",
                r#"[class*="service"] li"#,
                r#"[class*="product"] li"#,
                ".what-we-do li",
                ".our-services li",
                ".capabilities li",
            ]),
            service_headings: selector("h2, h3, h4"),
            service_keywords: vec!["service", "offering", "product", "solution"],
            list_items: selector("li"),
            max_services: 10,
            max_services_per_heading: 5,

            social_patterns: vec![
                ("linkedin", regex(r"(?i)linkedin\.com/(?:in|company)/([^/\s]+)")),
                ("twitter", regex(r"(?i)twitter\.com/([^/\s]+)")),
                ("facebook", regex(r"(?i)facebook\.com/([^/\s]+)")),
                ("instagram", regex(r"(?i)instagram\.com/([^/\s]+)")),
            ],

            address_selectors: selectors(&[
                ".address",
                ".location",
                ".contact-address",
                r#"[itemtype*="PostalAddress"]"#,
                ".postal-address",
                r#"[class*="address"]"#,
                r#"[class*="location"]"#,
            ]),
            address_pattern: regex(
                r"(?i)\d+\s+[A-Za-z\s]+(?:Street|St|Avenue|Road|Nagar|Rasta|Ave|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Way|Place|Pl)(?:,\s*[A-Za-z\s]+)*,\s*[A-Z]{2}\s+\d{5}",
            ),

            description_meta: selector(r#"meta[name="description"]"#),
            about_headings: selector("h1, h2, h3"),
            about_pattern: regex(r"(?i)about|who we are|our story"),
            all_elements: selector("*"),
        }
    }
}
