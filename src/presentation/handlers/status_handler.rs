// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::{BoxFuture, FutureExt};

use crate::domain::repositories::storage_repository::{SeenRepository, SnapshotRepository};
use crate::presentation::context::{AppContext, Reply, Update};
use crate::presentation::routes::HandlerResult;

/// `/status`：已通知ID数与快照记录数
pub fn status<'a>(ctx: &'a AppContext, _update: &'a Update) -> BoxFuture<'a, HandlerResult> {
    async move {
        let seen = ctx.seen_repo().load().await;
        let snapshot = ctx.snapshot_repo().load_snapshot().await?;
        Ok(vec![Reply::text(format!(
            "Tracked records: {}\nRecords in latest snapshot: {}",
            seen.len(),
            snapshot.len()
        ))])
    }
    .boxed()
}
