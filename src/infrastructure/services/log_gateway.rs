// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::notification_service::{GatewayError, MessageGateway};
use async_trait::async_trait;
use tracing::info;

/// 仅写日志的网关，未配置 Bot Token 时使用
pub struct LogGateway;

#[async_trait]
impl MessageGateway for LogGateway {
    async fn send_text(&self, text: &str) -> Result<(), GatewayError> {
        info!(target: "listwatch::notify", "\n{}", text);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
