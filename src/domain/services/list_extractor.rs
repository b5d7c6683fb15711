// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{DynamicKey, QueryParam, SelectorSettings, SiteSettings};
use crate::domain::models::record::Record;
use crate::utils::text::normalize_whitespace;
use crate::utils::url_utils::join_path;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// 列表提取错误
#[derive(Error, Debug)]
pub enum ExtractError {
    /// 选择器无法解析
    #[error("Invalid selector `{name}`: {reason}")]
    InvalidSelector { name: &'static str, reason: String },
    /// 未找到列表容器
    #[error("Listing container `{0}` not found")]
    ContainerNotFound(String),
}

/// 单条目的诊断信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDiagnostic {
    /// 条目在容器中的位置（从0开始）
    pub index: usize,
    pub reason: String,
}

/// 一次提取的结果
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// 按页面顺序排列的记录
    pub records: Vec<Record>,
    /// 被跳过的条目
    pub diagnostics: Vec<ItemDiagnostic>,
    /// 因缺少锚点而跳过的行数（表头等非数据行）
    pub skipped_rows: usize,
}

/// 列表提取器
///
/// 从渲染后的列表页HTML中按页面顺序提取记录，并根据锚点属性重建详情地址。
/// 动态参数严格按照配置的键顺序输出，与属性在标签中的声明顺序无关。
pub struct ListExtractor {
    container_css: String,
    container: Selector,
    item: Selector,
    anchor: Selector,
    title: Option<Selector>,
    period: Option<Selector>,
    status: Option<Selector>,
    detail_base: String,
    fixed_query: Vec<QueryParam>,
    dynamic_keys: Vec<DynamicKey>,
}

fn required(name: &'static str, css: &str) -> Result<Selector, ExtractError> {
    if css.trim().is_empty() {
        return Err(ExtractError::InvalidSelector {
            name,
            reason: "selector is empty".to_string(),
        });
    }
    Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
        name,
        reason: e.to_string(),
    })
}

fn optional(name: &'static str, css: &str) -> Result<Option<Selector>, ExtractError> {
    if css.trim().is_empty() {
        return Ok(None);
    }
    required(name, css).map(Some)
}

impl ListExtractor {
    /// 根据站点与选择器配置创建提取器
    ///
    /// # 参数
    ///
    /// * `site` - 站点地址配置
    /// * `selectors` - 列表选择器配置
    ///
    /// # 返回值
    ///
    /// * `Ok(ListExtractor)` - 创建成功
    /// * `Err(ExtractError)` - 容器、条目或锚点选择器缺失或无法解析
    pub fn new(site: &SiteSettings, selectors: &SelectorSettings) -> Result<Self, ExtractError> {
        Ok(Self {
            container_css: selectors.container.clone(),
            container: required("container", &selectors.container)?,
            item: required("item", &selectors.item)?,
            anchor: required("anchor", &selectors.anchor)?,
            title: optional("title", &selectors.title)?,
            period: optional("period", &selectors.period)?,
            status: optional("status", &selectors.status)?,
            detail_base: join_path(&site.base_url, &site.detail_path),
            fixed_query: site.fixed_query.clone(),
            dynamic_keys: site.dynamic_keys.clone(),
        })
    }

    /// 提取当前视图中的所有记录
    ///
    /// 单个条目失败只会跳过该条目；找不到容器时整次提取失败
    pub fn extract(&self, html: &str) -> Result<Extraction, ExtractError> {
        let document = Html::parse_document(html);
        let container = document
            .select(&self.container)
            .next()
            .ok_or_else(|| ExtractError::ContainerNotFound(self.container_css.clone()))?;

        let mut extraction = Extraction::default();

        for (index, item) in container.select(&self.item).enumerate() {
            let Some(anchor) = item.select(&self.anchor).next() else {
                extraction.skipped_rows += 1;
                continue;
            };

            match self.build_record(item, anchor) {
                Ok(record) => extraction.records.push(record),
                Err(reason) => {
                    warn!("Skipping listing item {}: {}", index, reason);
                    extraction.diagnostics.push(ItemDiagnostic { index, reason });
                }
            }
        }

        debug!(
            "Extracted {} records ({} rows without anchor, {} skipped)",
            extraction.records.len(),
            extraction.skipped_rows,
            extraction.diagnostics.len()
        );

        Ok(extraction)
    }

    fn build_record(&self, item: ElementRef<'_>, anchor: ElementRef<'_>) -> Result<Record, String> {
        let url = self.detail_url(&anchor);
        Url::parse(&url).map_err(|e| format!("reconstructed address `{}` is invalid: {}", url, e))?;

        Ok(Record::new(
            text_of(item, self.title.as_ref()),
            text_of(item, self.period.as_ref()),
            text_of(item, self.status.as_ref()),
            url,
        ))
    }

    /// 重建详情地址
    ///
    /// `detail_base ? fixed_query & dynamic_query`，缺失的属性以空字符串代替
    pub fn detail_url(&self, anchor: &ElementRef<'_>) -> String {
        let fixed = self
            .fixed_query
            .iter()
            .map(|p| format!("{}={}", p.key, p.value))
            .collect::<Vec<_>>()
            .join("&");
        let dynamic = self.dynamic_query(anchor);

        let query = [fixed, dynamic]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            self.detail_base.clone()
        } else {
            format!("{}?{}", self.detail_base, query)
        }
    }

    fn dynamic_query(&self, anchor: &ElementRef<'_>) -> String {
        self.dynamic_keys
            .iter()
            .map(|key| {
                let value = anchor.value().attr(&key.attribute_name()).unwrap_or("");
                format!("{}={}", key.key, value)
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn text_of(item: ElementRef<'_>, selector: Option<&Selector>) -> String {
    selector
        .and_then(|s| item.select(s).next())
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "list_extractor_test.rs"]
mod tests;
