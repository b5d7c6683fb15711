// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 运行指标
//!
//! 仅通过 `metrics` 门面记录计数器，是否导出由宿主进程安装的 recorder 决定

use metrics::counter;

pub const RECORDS_EXTRACTED: &str = "listwatch_records_extracted_total";
pub const EXTRACTION_PASSES: &str = "listwatch_extraction_passes_total";
pub const RECORDS_BLOCKED: &str = "listwatch_records_blocked_total";
pub const NEW_RECORDS: &str = "listwatch_new_records_total";
pub const MESSAGES_SENT: &str = "listwatch_messages_sent_total";

fn outcome(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "failed"
    }
}

pub fn records_extracted(count: usize) {
    counter!(RECORDS_EXTRACTED).increment(count as u64);
}

pub fn extraction_pass(ok: bool) {
    counter!(EXTRACTION_PASSES, "outcome" => outcome(ok)).increment(1);
}

pub fn records_blocked(count: usize) {
    counter!(RECORDS_BLOCKED).increment(count as u64);
}

pub fn new_records(count: usize) {
    counter!(NEW_RECORDS).increment(count as u64);
}

pub fn message_sent(ok: bool) {
    counter!(MESSAGES_SENT, "outcome" => outcome(ok)).increment(1);
}
