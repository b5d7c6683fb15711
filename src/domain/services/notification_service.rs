// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::Record;
use crate::infrastructure::metrics;
use crate::utils::text::truncate_chars;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// 消息之间的分隔符（空行）
pub const ENTRY_SEPARATOR: &str = "\n\n";

/// 消息网关错误
#[derive(Error, Debug)]
pub enum GatewayError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 网关拒绝了消息
    #[error("Gateway rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// 消息网关特质
///
/// 外部消息通道的最小接口，消息内容为 HTML 文本
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// 发送一条文本消息
    async fn send_text(&self, text: &str) -> Result<(), GatewayError>;

    /// 网关名称
    fn name(&self) -> &'static str;
}

/// 已格式化的单条记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub text: String,
}

/// 待发送的一条消息及其包含的记录ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub text: String,
    pub ids: Vec<String>,
}

/// 发送结果
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    /// 成功发送的消息数
    pub messages_sent: usize,
    /// 发送失败的消息数
    pub messages_failed: usize,
    /// 已确认送达的记录ID
    pub delivered: Vec<String>,
    /// 未送达的记录ID
    pub undelivered: Vec<String>,
}

fn render(record: &Record, title: &str) -> String {
    format!(
        "<b>{}</b>\nStatus: {}\nPeriod: {}\n<a href=\"{}\">Details</a>",
        html_escape::encode_text(title),
        html_escape::encode_text(&record.status),
        html_escape::encode_text(&record.period),
        html_escape::encode_double_quoted_attribute(&record.url),
    )
}

/// 将记录格式化为消息文本，所有字段均做 HTML 转义
pub fn format_record(record: &Record) -> String {
    render(record, &record.title)
}

/// 在预算内格式化记录
///
/// 超出预算时缩短标题；标题缩短到空仍放不下则返回 `None`
pub fn format_within_budget(record: &Record, budget: usize) -> Option<String> {
    let mut title_len = record.title.chars().count();
    loop {
        let text = render(record, &truncate_chars(&record.title, title_len));
        let len = text.chars().count();
        if len <= budget {
            return Some(text);
        }
        if title_len == 0 {
            return None;
        }
        title_len = title_len.saturating_sub(len - budget).min(title_len - 1);
    }
}

/// 按预算将条目打包成消息
///
/// 追加下一条会超出预算时先结束当前消息，条目永远不会被拆分
pub fn batch_entries<I>(entries: I, budget: usize) -> Vec<Batch>
where
    I: IntoIterator<Item = Entry>,
{
    let separator_len = ENTRY_SEPARATOR.chars().count();
    let mut batches = Vec::new();
    let mut current = Batch {
        text: String::new(),
        ids: Vec::new(),
    };
    let mut current_len = 0;

    for entry in entries {
        let entry_len = entry.text.chars().count();
        let projected = if current.ids.is_empty() {
            entry_len
        } else {
            current_len + separator_len + entry_len
        };

        if projected > budget && !current.ids.is_empty() {
            batches.push(std::mem::replace(
                &mut current,
                Batch {
                    text: String::new(),
                    ids: Vec::new(),
                },
            ));
            current_len = 0;
        }

        if !current.ids.is_empty() {
            current.text.push_str(ENTRY_SEPARATOR);
            current_len += separator_len;
        }
        current.text.push_str(&entry.text);
        current_len += entry_len;
        current.ids.push(entry.id);
    }

    if !current.ids.is_empty() {
        batches.push(current);
    }

    batches
}

/// 通知分发器
///
/// 按“最早发现优先”的顺序发送新记录；每条消息独立发送，
/// 单条失败不影响其余消息，失败消息中的记录不会被视为已送达。
pub struct NotificationDispatcher {
    gateway: Arc<dyn MessageGateway>,
    budget: usize,
}

impl NotificationDispatcher {
    pub fn new(gateway: Arc<dyn MessageGateway>, budget: usize) -> Self {
        Self { gateway, budget }
    }

    /// 将记录按预算打包，返回消息与无法放入预算的记录ID
    pub fn plan(&self, records: &[Record]) -> (Vec<Batch>, Vec<String>) {
        let mut oversized = Vec::new();
        let entries: Vec<Entry> = records
            .iter()
            .filter_map(|record| match format_within_budget(record, self.budget) {
                Some(text) => Some(Entry {
                    id: record.id.clone(),
                    text,
                }),
                None => {
                    error!(
                        "Record {} cannot fit into a {}-character message",
                        record.id, self.budget
                    );
                    oversized.push(record.id.clone());
                    None
                }
            })
            .collect();

        (batch_entries(entries, self.budget), oversized)
    }

    /// 发送新记录
    ///
    /// # 参数
    ///
    /// * `records` - 去重引擎输出的新记录（最新在前）
    ///
    /// # 返回值
    ///
    /// 发送结果，包含已送达与未送达的记录ID
    pub async fn dispatch(&self, records: &[Record]) -> DispatchReport {
        let oldest_first: Vec<Record> = records.iter().rev().cloned().collect();
        let (batches, oversized) = self.plan(&oldest_first);

        let mut report = DispatchReport {
            undelivered: oversized,
            ..Default::default()
        };

        for (index, batch) in batches.into_iter().enumerate() {
            match self.gateway.send_text(&batch.text).await {
                Ok(()) => {
                    report.messages_sent += 1;
                    report.delivered.extend(batch.ids);
                    metrics::message_sent(true);
                }
                Err(e) => {
                    warn!(
                        "Message {} via {} failed ({} records not delivered): {}",
                        index + 1,
                        self.gateway.name(),
                        batch.ids.len(),
                        e
                    );
                    report.messages_failed += 1;
                    report.undelivered.extend(batch.ids);
                    metrics::message_sent(false);
                }
            }
        }

        info!(
            "Dispatched {} messages ({} failed), {} records delivered",
            report.messages_sent,
            report.messages_failed,
            report.delivered.len()
        );

        report
    }
}

#[cfg(test)]
#[path = "notification_service_test.rs"]
mod tests;
