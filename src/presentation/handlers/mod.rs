// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::Record;
use crate::domain::services::notification_service::{batch_entries, format_within_budget, Entry};
use crate::presentation::context::Reply;

pub mod help_handler;
pub mod latest_handler;
pub mod search_handler;
pub mod status_handler;

/// 将记录按预算打包为回复消息
pub(crate) fn record_replies(records: &[Record], budget: usize) -> Vec<Reply> {
    let entries = records.iter().filter_map(|record| {
        format_within_budget(record, budget).map(|text| Entry {
            id: record.id.clone(),
            text,
        })
    });

    batch_entries(entries, budget)
        .into_iter()
        .map(|batch| Reply::text(batch.text))
        .collect()
}
