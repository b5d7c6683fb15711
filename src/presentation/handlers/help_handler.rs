// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::{BoxFuture, FutureExt};

use crate::presentation::context::{AppContext, Reply, Update};
use crate::presentation::routes::HandlerResult;

const HELP_TEXT: &str = "Commands:\n\
/status - tracked and snapshot record counts\n\
/latest - records from the most recent run\n\
/search - find records open on a date\n\
/cancel - abandon the current search";

/// `/start` 与 `/help`
pub fn help<'a>(_ctx: &'a AppContext, _update: &'a Update) -> BoxFuture<'a, HandlerResult> {
    async move { Ok(vec![Reply::text(HELP_TEXT)]) }.boxed()
}
