// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

// 2025-03-01, 2025.3.1, 2025/03/01
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[-./](\d{1,2})[-./](\d{1,2})").unwrap());

/// 会话状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingDate,
    SelectingCategory { date: NaiveDate },
}

/// 不带数据的状态种类，作为转移表的键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Idle,
    AwaitingDate,
    SelectingCategory,
}

impl ConversationState {
    pub fn kind(&self) -> StateKind {
        match self {
            ConversationState::Idle => StateKind::Idle,
            ConversationState::AwaitingDate => StateKind::AwaitingDate,
            ConversationState::SelectingCategory { .. } => StateKind::SelectingCategory,
        }
    }
}

/// 会话事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Search,
    Cancel,
    Date(NaiveDate),
    Text(String),
    Category(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Search,
    Cancel,
    Date,
    Text,
    Category,
}

impl Event {
    /// 将自由文本归类为日期或普通文本
    pub fn from_text(text: &str) -> Self {
        match dates_in(text).into_iter().next() {
            Some(date) => Event::Date(date),
            None => Event::Text(text.to_string()),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Search => EventKind::Search,
            Event::Cancel => EventKind::Cancel,
            Event::Date(_) => EventKind::Date,
            Event::Text(_) => EventKind::Text,
            Event::Category(_) => EventKind::Category,
        }
    }
}

/// 状态转移附带的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    PromptDate,
    DateHint,
    OfferCategories,
    CategoryHint,
    ShowMatches,
    Cancelled,
    Expired,
    Unhandled,
}

use EventKind as E;
use StateKind as S;

/// (当前状态, 事件) → (下一状态, 动作)
static TRANSITIONS: &[(StateKind, EventKind, StateKind, Effect)] = &[
    (S::Idle, E::Search, S::AwaitingDate, Effect::PromptDate),
    (S::AwaitingDate, E::Search, S::AwaitingDate, Effect::PromptDate),
    (S::SelectingCategory, E::Search, S::AwaitingDate, Effect::PromptDate),
    (S::Idle, E::Cancel, S::Idle, Effect::Cancelled),
    (S::AwaitingDate, E::Cancel, S::Idle, Effect::Cancelled),
    (S::SelectingCategory, E::Cancel, S::Idle, Effect::Cancelled),
    (S::AwaitingDate, E::Date, S::SelectingCategory, Effect::OfferCategories),
    (S::AwaitingDate, E::Text, S::AwaitingDate, Effect::DateHint),
    (S::AwaitingDate, E::Category, S::AwaitingDate, Effect::DateHint),
    (S::SelectingCategory, E::Date, S::SelectingCategory, Effect::CategoryHint),
    (S::SelectingCategory, E::Text, S::SelectingCategory, Effect::CategoryHint),
    (S::SelectingCategory, E::Category, S::Idle, Effect::ShowMatches),
    (S::Idle, E::Category, S::Idle, Effect::Expired),
];

/// 查表得到状态转移，未列出的组合保持原状态
pub fn transition(state: StateKind, event: EventKind) -> (StateKind, Effect) {
    TRANSITIONS
        .iter()
        .find(|(from, on, _, _)| *from == state && *on == event)
        .map(|(_, _, to, effect)| (*to, *effect))
        .unwrap_or((state, Effect::Unhandled))
}

/// 对当前状态应用事件
///
/// 进入 `SelectingCategory` 时日期取自事件，停留时沿用原有日期
pub fn step(state: &ConversationState, event: &Event) -> (ConversationState, Effect) {
    let (next, effect) = transition(state.kind(), event.kind());
    let next = match next {
        StateKind::Idle => ConversationState::Idle,
        StateKind::AwaitingDate => ConversationState::AwaitingDate,
        StateKind::SelectingCategory => match (event, state) {
            (Event::Date(date), ConversationState::AwaitingDate) => {
                ConversationState::SelectingCategory { date: *date }
            }
            (_, ConversationState::SelectingCategory { date }) => {
                ConversationState::SelectingCategory { date: *date }
            }
            _ => return (ConversationState::Idle, Effect::Expired),
        },
    };
    (next, effect)
}

/// 提取文本中出现的日期（按出现顺序，跳过无效日期）
pub fn dates_in(text: &str) -> Vec<NaiveDate> {
    DATE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let year = caps.get(1)?.as_str().parse().ok()?;
            let month = caps.get(2)?.as_str().parse().ok()?;
            let day = caps.get(3)?.as_str().parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .collect()
}

/// 解析期间字符串
///
/// 前两个日期构成闭区间；只有一个日期时为单日区间；没有日期返回 `None`
pub fn parse_period(period: &str) -> Option<(NaiveDate, NaiveDate)> {
    let dates = dates_in(period);
    match dates.as_slice() {
        [] => None,
        [single] => Some((*single, *single)),
        [first, second, ..] => Some(((*first).min(*second), (*first).max(*second))),
    }
}

/// 期间是否覆盖指定日期
pub fn period_covers(period: &str, date: NaiveDate) -> bool {
    parse_period(period)
        .map(|(start, end)| start <= date && date <= end)
        .unwrap_or(false)
}
