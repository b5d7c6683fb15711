// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::{
    config::settings::RunMode,
    domain::{
        repositories::storage_repository::{SeenRepository, SnapshotRepository, StorageError},
        services::{
            blocklist::BlockedDomainFilter,
            deduplication::DeduplicationEngine,
            notification_service::NotificationDispatcher,
        },
    },
    engines::traits::{RecordSource, SourceError},
    infrastructure::metrics,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// 一次运行的统计结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// 提取到的记录数（屏蔽前）
    pub extracted: usize,
    /// 被屏蔽域名过滤的记录数
    pub blocked: usize,
    /// 新记录数
    pub new: usize,
    /// 已送达的记录数
    pub delivered: usize,
    /// 未送达的记录数
    pub undelivered: usize,
    /// 失败的提取次数
    pub passes_failed: usize,
}

/// 监控流水线
///
/// 读取 → 屏蔽 → 去重 → 通知 → 持久化 → 快照。
/// 只有送达的记录才会写入已通知集合，快照写入失败不影响运行结果。
pub struct WatchUseCase {
    source: Box<dyn RecordSource>,
    blocklist: BlockedDomainFilter,
    seen_repo: Arc<dyn SeenRepository>,
    snapshot_repo: Arc<dyn SnapshotRepository>,
    dispatcher: NotificationDispatcher,
}

impl WatchUseCase {
    pub fn new(
        source: Box<dyn RecordSource>,
        blocklist: BlockedDomainFilter,
        seen_repo: Arc<dyn SeenRepository>,
        snapshot_repo: Arc<dyn SnapshotRepository>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            source,
            blocklist,
            seen_repo,
            snapshot_repo,
            dispatcher,
        }
    }

    /// 执行一次完整运行
    ///
    /// # 参数
    ///
    /// * `mode` - 遍历全部筛选组合或仅提取当前视图
    ///
    /// # 返回值
    ///
    /// * `Ok(RunReport)` - 运行统计
    /// * `Err(PipelineError)` - 致命错误，此时不会持久化任何状态
    pub async fn run(&mut self, mode: RunMode) -> Result<RunReport, PipelineError> {
        let seen = self.seen_repo.load().await;
        info!(
            "Running {} in {:?} mode ({} ids already seen)",
            self.source.name(),
            mode,
            seen.len()
        );

        let batch = match mode {
            RunMode::Sweep => self.source.iter_all_terms().await?,
            RunMode::Current => self.source.iter_current().await?,
        };

        let mut report = RunReport {
            extracted: batch.records.len(),
            passes_failed: batch.failed_passes,
            ..Default::default()
        };

        let (records, blocked): (Vec<_>, Vec<_>) = batch
            .records
            .into_iter()
            .partition(|record| !self.blocklist.is_blocked(&record.url));
        report.blocked = blocked.len();
        if !blocked.is_empty() {
            debug!("Dropped {} records on blocked domains", blocked.len());
            metrics::records_blocked(blocked.len());
        }

        let snapshot = records.clone();
        let outcome = DeduplicationEngine::diff(records, &seen);
        report.new = outcome.new.len();
        metrics::new_records(outcome.new.len());

        if outcome.new.is_empty() {
            info!("No new records");
        } else {
            let dispatch = self.dispatcher.dispatch(&outcome.new).await;
            report.delivered = dispatch.delivered.len();
            report.undelivered = dispatch.undelivered.len();

            if !dispatch.delivered.is_empty() {
                let updated = DeduplicationEngine::mark_delivered(&seen, &dispatch.delivered);
                self.seen_repo.save(&updated).await?;
            }
        }

        if let Err(e) = self.snapshot_repo.save_snapshot(&snapshot).await {
            warn!("Failed to write snapshot: {}", e);
        }

        info!(
            "Run finished: {} extracted, {} blocked, {} new, {} delivered, {} undelivered, {} failed passes",
            report.extracted,
            report.blocked,
            report.new,
            report.delivered,
            report.undelivered,
            report.passes_failed
        );

        Ok(report)
    }
}
