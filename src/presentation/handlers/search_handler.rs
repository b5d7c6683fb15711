// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use crate::domain::models::record::Record;
use crate::domain::repositories::storage_repository::SnapshotRepository;
use crate::presentation::context::{AppContext, Button, ChatId, Reply, Update, UpdateKind};
use crate::presentation::conversation::{period_covers, step, ConversationState, Effect, Event};
use crate::presentation::handlers::record_replies;
use crate::presentation::routes::HandlerResult;

/// 分类按钮的回调前缀
pub const CATEGORY_PREFIX: &str = "cat:";

/// 匹配所有分类的按钮值
pub const ANY_CATEGORY: &str = "*";

/// `/search`
pub fn search<'a>(ctx: &'a AppContext, update: &'a Update) -> BoxFuture<'a, HandlerResult> {
    drive(ctx, update.chat_id, Event::Search).boxed()
}

/// `/cancel`
pub fn cancel<'a>(ctx: &'a AppContext, update: &'a Update) -> BoxFuture<'a, HandlerResult> {
    drive(ctx, update.chat_id, Event::Cancel).boxed()
}

/// 普通文本消息
pub fn text<'a>(ctx: &'a AppContext, update: &'a Update) -> BoxFuture<'a, HandlerResult> {
    let event = match &update.kind {
        UpdateKind::Text(text) => Event::from_text(text),
        _ => Event::Text(String::new()),
    };
    drive(ctx, update.chat_id, event).boxed()
}

/// `cat:` 按钮回调
pub fn category<'a>(ctx: &'a AppContext, update: &'a Update) -> BoxFuture<'a, HandlerResult> {
    let value = match &update.kind {
        UpdateKind::Callback(data) => data.strip_prefix(CATEGORY_PREFIX).unwrap_or(data),
        _ => "",
    };
    drive(ctx, update.chat_id, Event::Category(value.to_string())).boxed()
}

async fn drive(ctx: &AppContext, chat_id: ChatId, event: Event) -> HandlerResult {
    let previous = ctx.conversation(chat_id).await;
    let (next, effect) = step(&previous, &event);
    debug!("Chat {}: {:?} -> {:?} ({:?})", chat_id, previous, next, effect);
    ctx.set_conversation(chat_id, next).await;

    match effect {
        Effect::PromptDate => Ok(vec![Reply::text(
            "Send the date to look up as YYYY-MM-DD.",
        )]),
        Effect::DateHint => Ok(vec![Reply::text(
            "Could not read a date. Use YYYY-MM-DD, or /cancel.",
        )]),
        Effect::OfferCategories => offer_categories(ctx, &next).await,
        Effect::CategoryHint => Ok(vec![Reply::text(
            "Pick a category with the buttons, or /cancel.",
        )]),
        Effect::ShowMatches => show_matches(ctx, &previous, &event).await,
        Effect::Cancelled => Ok(vec![Reply::text("Cancelled.")]),
        Effect::Expired => Ok(vec![Reply::text(
            "That selection has expired. Start again with /search.",
        )]),
        Effect::Unhandled => Ok(vec![Reply::text("Send /help to see what I can do.")]),
    }
}

/// 快照中出现过的分类（按首次出现顺序）
fn categories(records: &[Record]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for category in records.iter().filter_map(|r| r.category.as_ref()) {
        if !categories.contains(category) {
            categories.push(category.clone());
        }
    }
    categories
}

async fn offer_categories(ctx: &AppContext, state: &ConversationState) -> HandlerResult {
    let ConversationState::SelectingCategory { date } = state else {
        return Ok(Vec::new());
    };

    let snapshot = ctx.snapshot_repo().load_snapshot().await?;
    let mut buttons: Vec<Button> = categories(&snapshot)
        .into_iter()
        .map(|category| Button {
            data: format!("{}{}", CATEGORY_PREFIX, category),
            label: category,
        })
        .collect();
    buttons.push(Button {
        label: "All".to_string(),
        data: format!("{}{}", CATEGORY_PREFIX, ANY_CATEGORY),
    });

    Ok(vec![Reply::with_buttons(
        format!("Pick a category for {}:", date.format("%Y-%m-%d")),
        buttons,
    )])
}

async fn show_matches(
    ctx: &AppContext,
    previous: &ConversationState,
    event: &Event,
) -> HandlerResult {
    let (ConversationState::SelectingCategory { date }, Event::Category(category)) =
        (previous, event)
    else {
        return Ok(Vec::new());
    };

    let snapshot = ctx.snapshot_repo().load_snapshot().await?;
    let matches: Vec<Record> = snapshot
        .into_iter()
        .filter(|record| {
            category == ANY_CATEGORY || record.category.as_deref() == Some(category.as_str())
        })
        .filter(|record| period_covers(&record.period, *date))
        .collect();

    if matches.is_empty() {
        return Ok(vec![Reply::text(format!(
            "No records cover {}.",
            date.format("%Y-%m-%d")
        ))]);
    }

    Ok(record_replies(&matches, ctx.budget()))
}
