// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 筛选轴上的一个选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisOption {
    /// 选项值（不透明字符串）
    pub value: String,
    /// 显示文本
    pub label: String,
}

impl AxisOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// 筛选轴
///
/// 按控件呈现顺序保存可选值，每次遍历开始时读取一次
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterAxis {
    values: Vec<String>,
}

impl FilterAxis {
    /// 从控件选项构建筛选轴，丢弃空值与占位符值
    ///
    /// 选项值原样保留，仅在判断空值与占位符时去除首尾空白
    pub fn from_options(options: Vec<AxisOption>, placeholders: &[String]) -> Self {
        let values = options
            .into_iter()
            .map(|o| o.value)
            .filter(|v| {
                let trimmed = v.trim();
                !trimmed.is_empty() && !placeholders.iter().any(|p| p == trimmed)
            })
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 一次提取时生效的筛选值
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterContext {
    pub term: String,
    pub category: String,
}

impl FilterContext {
    pub fn new(term: &str, category: &str) -> Self {
        Self {
            term: term.to_string(),
            category: category.to_string(),
        }
    }
}

impl std::fmt::Display for FilterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.term, self.category)
    }
}
