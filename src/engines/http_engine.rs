// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::BrowserSettings;
use crate::domain::models::filter::AxisOption;
use crate::engines::traits::{EngineError, RenderSurface};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// HTTP 渲染表面
///
/// 基于 reqwest 直接获取页面，不执行脚本，因此不支持筛选控件操作
pub struct HttpSurface {
    client: reqwest::Client,
    body: Option<String>,
}

impl HttpSurface {
    pub fn new(settings: &BrowserSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(
                settings
                    .user_agent
                    .clone()
                    .unwrap_or_else(|| "Mozilla/5.0 (compatible; listwatch/0.1)".to_string()),
            )
            .timeout(Duration::from_secs(settings.request_timeout_secs.max(1)))
            .cookie_store(true)
            .build()?;

        Ok(Self { client, body: None })
    }
}

#[async_trait]
impl RenderSurface for HttpSurface {
    async fn open(&mut self, url: &str) -> Result<(), EngineError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        self.body = Some(body);
        Ok(())
    }

    async fn content(&mut self) -> Result<String, EngineError> {
        self.body.clone().ok_or(EngineError::NotOpened)
    }

    async fn read_options(&mut self, _selector: &str) -> Result<Vec<AxisOption>, EngineError> {
        Err(EngineError::Unsupported("http"))
    }

    async fn select_option(&mut self, _selector: &str, _value: &str) -> Result<(), EngineError> {
        Err(EngineError::Unsupported("http"))
    }

    async fn clear_toggles(&mut self, _selector: &str) -> Result<usize, EngineError> {
        Err(EngineError::Unsupported("http"))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
