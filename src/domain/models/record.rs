// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::filter::FilterContext;
use crate::domain::services::identity::IdentityHasher;
use serde::{Deserialize, Serialize};

/// 列表记录实体
///
/// 每次提取时重新构建；`id` 完全由 `url` 决定，
/// `period` 与 `status` 已做空白规范化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 由规范地址派生的稳定标识
    pub id: String,
    /// 标题
    pub title: String,
    /// 期间
    pub period: String,
    /// 状态
    pub status: String,
    /// 规范详情地址
    pub url: String,
    /// 外层筛选值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    /// 内层筛选值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Record {
    /// 创建一个新的记录，`id` 由 `url` 计算得出
    pub fn new(title: String, period: String, status: String, url: String) -> Self {
        Self {
            id: IdentityHasher::id(&url),
            title,
            period,
            status,
            url,
            term: None,
            category: None,
        }
    }

    /// 附加筛选上下文标签
    pub fn tagged(mut self, context: &FilterContext) -> Self {
        self.term = Some(context.term.clone());
        self.category = Some(context.category.clone());
        self
    }
}
