// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::BoxFuture;
use std::collections::HashMap;

use crate::presentation::context::{AppContext, Reply, Update, UpdateKind};
use crate::presentation::errors::HandlerError;
use crate::presentation::handlers::{help_handler, latest_handler, search_handler, status_handler};

pub type HandlerResult = Result<Vec<Reply>, HandlerError>;

/// 处理器函数
pub type Handler = for<'a> fn(&'a AppContext, &'a Update) -> BoxFuture<'a, HandlerResult>;

/// 命令路由表
///
/// 命令按名称精确匹配，回调按前缀匹配，普通文本交给会话处理器
pub struct CommandRouter {
    commands: HashMap<&'static str, Handler>,
    callbacks: Vec<(&'static str, Handler)>,
    text: Handler,
}

impl CommandRouter {
    pub fn new(text: Handler) -> Self {
        Self {
            commands: HashMap::new(),
            callbacks: Vec::new(),
            text,
        }
    }

    pub fn command(mut self, name: &'static str, handler: Handler) -> Self {
        self.commands.insert(name, handler);
        self
    }

    pub fn callback(mut self, prefix: &'static str, handler: Handler) -> Self {
        self.callbacks.push((prefix, handler));
        self
    }

    /// 查找更新对应的处理器
    pub fn resolve(&self, update: &Update) -> Option<Handler> {
        match &update.kind {
            UpdateKind::Command { name, .. } => self.commands.get(name.as_str()).copied(),
            UpdateKind::Callback(data) => self
                .callbacks
                .iter()
                .find(|(prefix, _)| data.starts_with(prefix))
                .map(|(_, handler)| *handler),
            UpdateKind::Text(_) => Some(self.text),
        }
    }

    /// 已注册的命令名（排序后）
    pub fn commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// 创建命令路由表
pub fn routes() -> CommandRouter {
    CommandRouter::new(search_handler::text)
        .command("start", help_handler::help)
        .command("help", help_handler::help)
        .command("status", status_handler::status)
        .command("latest", latest_handler::latest)
        .command("search", search_handler::search)
        .command("cancel", search_handler::cancel)
        .callback(search_handler::CATEGORY_PREFIX, search_handler::category)
}
