// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod log_gateway;
pub mod telegram_gateway_impl;

use crate::config::settings::NotifierSettings;
use crate::domain::services::notification_service::MessageGateway;
use std::sync::Arc;
use tracing::warn;

/// 根据配置创建消息网关
///
/// Bot Token 与会话ID都存在时使用 Telegram，否则退化为日志输出
pub fn create_gateway(settings: &NotifierSettings) -> Arc<dyn MessageGateway> {
    match (&settings.bot_token, &settings.chat_id) {
        (Some(token), Some(chat_id)) if !token.is_empty() && !chat_id.is_empty() => Arc::new(
            telegram_gateway_impl::TelegramGateway::new(&settings.api_base, token, chat_id),
        ),
        _ => {
            warn!("Notifier bot_token/chat_id not configured, messages will only be logged");
            Arc::new(log_gateway::LogGateway)
        }
    }
}
