// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 单个页面的提取结果
///
/// 由字段提取器从一页HTML中产生。除`url`和`provenance`外的字段
/// 全部为空时视为"无意义"记录，编排器会将其计为失败。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// 来源URL
    pub url: String,
    /// 公司名称
    pub company: Option<String>,
    /// 联系方式
    pub contacts: Contacts,
    /// 标语
    pub tagline: Option<String>,
    /// 服务列表（有序，最多10项）
    pub services: Vec<String>,
    /// 社交媒体：平台名 → 主页URL
    pub social_media: BTreeMap<String, String>,
    /// 地址
    pub address: Option<String>,
    /// 描述
    pub description: Option<String>,
    /// 行业
    pub industry: Option<Industry>,
    /// 来源元数据，由编排器在聚合时写入
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

/// 联系方式
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contacts {
    /// 邮箱（保序去重）
    pub emails: Vec<String>,
    /// 电话（保序去重）
    pub phones: Vec<String>,
    /// 联系页面URL
    pub contact_page: Option<String>,
}

impl Contacts {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.contact_page.is_none()
    }
}

/// 记录来源元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// 提取时间
    pub extracted_at: DateTime<Utc>,
    /// 在其来源URL分页链中的页码，从1开始
    pub page_number: u32,
    /// 所属任务ID
    pub task_id: i32,
}

impl ExtractedRecord {
    /// 创建只包含来源URL的空记录
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// 判断记录是否包含任何有效字段
    ///
    /// 来源URL与来源元数据不参与判断
    pub fn is_meaningful(&self) -> bool {
        self.company.is_some()
            || !self.contacts.is_empty()
            || self.tagline.is_some()
            || !self.services.is_empty()
            || !self.social_media.is_empty()
            || self.address.is_some()
            || self.description.is_some()
            || self.industry.is_some()
    }

    /// 写入来源元数据
    pub fn stamp(mut self, task_id: i32, page_number: u32) -> Self {
        self.provenance = Some(Provenance {
            extracted_at: Utc::now(),
            page_number,
            task_id,
        });
        self
    }
}

/// 行业受控词表
///
/// 顺序即匹配优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Industry {
    Technology,
    Healthcare,
    Finance,
    Education,
    Retail,
    Manufacturing,
    Consulting,
    Marketing,
    #[serde(rename = "Real Estate")]
    RealEstate,
    Construction,
    Automotive,
    Food,
    Travel,
    Entertainment,
    Software,
    Hardware,
    Services,
    #[serde(rename = "E-Commerce")]
    ECommerce,
    Nonprofit,
}

impl Industry {
    /// 按匹配优先级排列的全部行业
    pub const ALL: [Industry; 19] = [
        Industry::Technology,
        Industry::Healthcare,
        Industry::Finance,
        Industry::Education,
        Industry::Retail,
        Industry::Manufacturing,
        Industry::Consulting,
        Industry::Marketing,
        Industry::RealEstate,
        Industry::Construction,
        Industry::Automotive,
        Industry::Food,
        Industry::Travel,
        Industry::Entertainment,
        Industry::Software,
        Industry::Hardware,
        Industry::Services,
        Industry::ECommerce,
        Industry::Nonprofit,
    ];

    /// 在页面文本中查找的小写关键词
    pub fn keyword(&self) -> &'static str {
        match self {
            Industry::Technology => "technology",
            Industry::Healthcare => "healthcare",
            Industry::Finance => "finance",
            Industry::Education => "education",
            Industry::Retail => "retail",
            Industry::Manufacturing => "manufacturing",
            Industry::Consulting => "consulting",
            Industry::Marketing => "marketing",
            Industry::RealEstate => "real estate",
            Industry::Construction => "construction",
            Industry::Automotive => "automotive",
            Industry::Food => "food",
            Industry::Travel => "travel",
            Industry::Entertainment => "entertainment",
            Industry::Software => "software",
            Industry::Hardware => "hardware",
            Industry::Services => "services",
            Industry::ECommerce => "e-commerce",
            Industry::Nonprofit => "nonprofit",
        }
    }

    /// 首字母大写的展示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Healthcare => "Healthcare",
            Industry::Finance => "Finance",
            Industry::Education => "Education",
            Industry::Retail => "Retail",
            Industry::Manufacturing => "Manufacturing",
            Industry::Consulting => "Consulting",
            Industry::Marketing => "Marketing",
            Industry::RealEstate => "Real Estate",
            Industry::Construction => "Construction",
            Industry::Automotive => "Automotive",
            Industry::Food => "Food",
            Industry::Travel => "Travel",
            Industry::Entertainment => "Entertainment",
            Industry::Software => "Software",
            Industry::Hardware => "Hardware",
            Industry::Services => "Services",
            Industry::ECommerce => "E-Commerce",
            Industry::Nonprofit => "Nonprofit",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
