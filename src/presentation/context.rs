// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::domain::repositories::storage_repository::{SeenRepository, SnapshotRepository};
use crate::presentation::conversation::ConversationState;
use crate::presentation::routes::{routes, CommandRouter};

/// 会话键（聊天ID）
pub type ChatId = i64;

/// 入站更新
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateKind {
    /// `/name args`，名称已去掉 `@bot` 后缀并转为小写
    Command { name: String, args: String },
    Text(String),
    Callback(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub chat_id: ChatId,
    pub kind: UpdateKind,
}

impl Update {
    /// 解析一条文本消息
    pub fn message(chat_id: ChatId, text: &str) -> Self {
        let trimmed = text.trim();
        let kind = match trimmed.strip_prefix('/') {
            Some(rest) if !rest.is_empty() => {
                let (head, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let name = head.split('@').next().unwrap_or(head).to_lowercase();
                UpdateKind::Command {
                    name,
                    args: args.trim().to_string(),
                }
            }
            _ => UpdateKind::Text(trimmed.to_string()),
        };
        Self { chat_id, kind }
    }

    /// 按钮回调
    pub fn callback(chat_id: ChatId, data: &str) -> Self {
        Self {
            chat_id,
            kind: UpdateKind::Callback(data.to_string()),
        }
    }
}

/// 内联按钮
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

/// 出站回复
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub buttons: Vec<Button>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(text: impl Into<String>, buttons: Vec<Button>) -> Self {
        Self {
            text: text.into(),
            buttons,
        }
    }
}

/// 应用上下文
///
/// 启动时构建一次并传递给所有处理器，持有存储、消息预算、
/// 命令路由表以及按聊天ID保存的会话状态
pub struct AppContext {
    seen_repo: Arc<dyn SeenRepository>,
    snapshot_repo: Arc<dyn SnapshotRepository>,
    budget: usize,
    router: CommandRouter,
    conversations: Mutex<HashMap<ChatId, ConversationState>>,
}

impl AppContext {
    pub fn new(
        seen_repo: Arc<dyn SeenRepository>,
        snapshot_repo: Arc<dyn SnapshotRepository>,
        budget: usize,
    ) -> Self {
        Self {
            seen_repo,
            snapshot_repo,
            budget,
            router: routes(),
            conversations: Mutex::new(HashMap::new()),
        }
    }

    pub fn seen_repo(&self) -> &Arc<dyn SeenRepository> {
        &self.seen_repo
    }

    pub fn snapshot_repo(&self) -> &Arc<dyn SnapshotRepository> {
        &self.snapshot_repo
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// 当前会话状态，未开始的会话为 `Idle`
    pub async fn conversation(&self, chat_id: ChatId) -> ConversationState {
        self.conversations
            .lock()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }

    /// 更新会话状态，回到 `Idle` 时移除记录
    pub async fn set_conversation(&self, chat_id: ChatId, state: ConversationState) {
        let mut conversations = self.conversations.lock().await;
        if state == ConversationState::Idle {
            conversations.remove(&chat_id);
        } else {
            conversations.insert(chat_id, state);
        }
    }

    /// 处理一条入站更新
    ///
    /// # 参数
    ///
    /// * `update` - 已解析的消息或按钮回调
    ///
    /// # 返回值
    ///
    /// 需要发送的回复，处理失败时返回一条通用错误提示
    pub async fn handle(&self, update: &Update) -> Vec<Reply> {
        let Some(handler) = self.router.resolve(update) else {
            debug!("No handler for {:?}", update.kind);
            return vec![Reply::text("Unknown command. Send /help to see what I can do.")];
        };

        match handler(self, update).await {
            Ok(replies) => replies,
            Err(e) => {
                error!("Handler failed for chat {}: {}", update.chat_id, e);
                vec![Reply::text("Something went wrong. Please try again later.")]
            }
        }
    }
}
