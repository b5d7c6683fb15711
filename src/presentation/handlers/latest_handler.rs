// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::{BoxFuture, FutureExt};

use crate::domain::repositories::storage_repository::SnapshotRepository;
use crate::presentation::context::{AppContext, Reply, Update};
use crate::presentation::handlers::record_replies;
use crate::presentation::routes::HandlerResult;

/// `/latest` 最多展示的记录数
pub const LATEST_LIMIT: usize = 10;

/// `/latest`：最近一次快照中的前几条记录
pub fn latest<'a>(ctx: &'a AppContext, _update: &'a Update) -> BoxFuture<'a, HandlerResult> {
    async move {
        let snapshot = ctx.snapshot_repo().load_snapshot().await?;
        if snapshot.is_empty() {
            return Ok(vec![Reply::text("No records yet. Wait for the next run.")]);
        }

        let shown = &snapshot[..snapshot.len().min(LATEST_LIMIT)];
        Ok(record_replies(shown, ctx.budget()))
    }
    .boxed()
}
