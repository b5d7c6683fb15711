// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::notification_service::{GatewayError, MessageGateway};
use async_trait::async_trait;
use reqwest::header;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Telegram Bot API 消息网关
pub struct TelegramGateway {
    /// HTTP 客户端
    client: reqwest::Client,
    /// `{api_base}/bot{token}/sendMessage`
    endpoint: String,
    /// 目标会话ID
    chat_id: String,
}

impl TelegramGateway {
    /// 创建新的 Telegram 网关
    ///
    /// # 参数
    ///
    /// * `api_base` - Bot API 地址
    /// * `token` - Bot Token
    /// * `chat_id` - 目标会话ID
    pub fn new(api_base: &str, token: &str, chat_id: &str) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("listwatch/0.1.0"),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token),
            chat_id: chat_id.to_string(),
        }
    }
}

#[async_trait]
impl MessageGateway for TelegramGateway {
    async fn send_text(&self, text: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "HTML",
                "disable_web_page_preview": true,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            debug!("Telegram message delivered ({} chars)", text.chars().count());
            Ok(())
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(GatewayError::Rejected { status, body })
        }
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
