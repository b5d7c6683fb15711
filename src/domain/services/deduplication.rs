// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::Record;
use std::collections::BTreeSet;

/// 已通知的ID集合
pub type SeenSet = BTreeSet<String>;

/// 去重结果
#[derive(Debug, Clone, Default)]
pub struct DiffOutcome {
    /// 新发现的记录，保持输入顺序
    pub new: Vec<Record>,
    /// `seen` 与新记录ID的并集
    pub updated_seen: SeenSet,
}

/// 去重引擎
pub struct DeduplicationEngine;

impl DeduplicationEngine {
    /// 计算新记录
    ///
    /// 同一ID在输入中出现多次时（同一条目出现在多个筛选组合下），
    /// 只在第一次出现的位置报告一次
    pub fn diff(incoming: Vec<Record>, seen: &SeenSet) -> DiffOutcome {
        let mut updated_seen = seen.clone();
        let mut new = Vec::new();

        for record in incoming {
            if updated_seen.insert(record.id.clone()) {
                new.push(record);
            }
        }

        DiffOutcome { new, updated_seen }
    }

    /// 将已确认送达的ID并入集合，集合只增不减
    pub fn mark_delivered<'a, I>(seen: &SeenSet, delivered: I) -> SeenSet
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut merged = seen.clone();
        merged.extend(delivered.into_iter().cloned());
        merged
    }
}
