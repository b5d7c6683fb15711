// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::domain::models::filter::AxisOption;
use crate::engines::traits::{EngineError, RenderSurface};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;

// Global browser instance to avoid re-launching Chrome on every run step.
static BROWSER_INSTANCE: OnceCell<Browser> = OnceCell::const_new();

/// 获取或初始化共享的浏览器实例
///
/// 优先连接 `remote_url` 或 `CHROMIUM_REMOTE_DEBUGGING_URL` 指定的远程实例，否则本地启动
pub async fn get_browser(settings: &BrowserSettings) -> Result<&'static Browser, EngineError> {
    BROWSER_INSTANCE
        .get_or_try_init(|| async {
            let remote_debugging_url = settings
                .remote_url
                .clone()
                .filter(|url| !url.is_empty())
                .or_else(|| std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok());

            let (browser, mut handler) = if let Some(ref url) = remote_debugging_url {
                tracing::info!("Connecting to remote Chrome instance at: {}", url);
                Browser::connect(url).await.map_err(|e| {
                    EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
                })?
            } else {
                let config = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(Duration::from_secs(settings.request_timeout_secs))
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage")
                    .build()
                    .map_err(EngineError::Browser)?;

                Browser::launch(config)
                    .await
                    .map_err(|e| EngineError::Browser(e.to_string()))?
            };

            // Spawn a handler to process browser events
            tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(browser)
        })
        .await
}

/// Chromium 渲染表面
///
/// 基于 chromiumoxide 驱动单个页面，筛选控件通过页面脚本操作
pub struct ChromiumSurface {
    settings: BrowserSettings,
    page: Option<Page>,
}

impl ChromiumSurface {
    pub fn new(settings: BrowserSettings) -> Self {
        Self {
            settings,
            page: None,
        }
    }

    fn page(&self) -> Result<&Page, EngineError> {
        self.page.as_ref().ok_or(EngineError::NotOpened)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs.max(1))
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, EngineError>
    where
        F: Future<Output = Result<T, EngineError>>,
    {
        tokio::time::timeout(self.timeout(), fut)
            .await
            .map_err(|_| EngineError::Timeout)?
    }

    async fn evaluate<T: DeserializeOwned>(&self, script: String) -> Result<T, EngineError> {
        let page = self.page()?;
        self.bounded(async {
            page.evaluate(script)
                .await
                .map_err(|e| EngineError::Browser(format!("Script failed: {}", e)))?
                .into_value::<T>()
                .map_err(|e| EngineError::Browser(format!("Unexpected script result: {}", e)))
        })
        .await
    }
}

/// 将字符串编码为 JS 字面量
fn js_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn read_options_script(selector: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector({sel});
            if (!el) return {{ found: false, options: [] }};
            const options = Array.from(el.options || []).map(o => ({{ value: o.value, label: (o.textContent || '').trim() }}));
            return {{ found: true, options }};
        }})()"#,
        sel = js_literal(selector)
    )
}

/// 选项读取脚本的返回值
///
/// 控件缺失时 `found` 为 `false`，避免与空结果混淆
#[derive(Debug, Deserialize)]
struct OptionsResult {
    found: bool,
    #[serde(default)]
    options: Vec<AxisOption>,
}

impl OptionsResult {
    fn into_options(self, selector: &str) -> Result<Vec<AxisOption>, EngineError> {
        if self.found {
            Ok(self.options)
        } else {
            Err(EngineError::ElementNotFound(selector.to_string()))
        }
    }
}

fn select_option_script(selector: &str, value: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector({sel});
            if (!el) return 'missing';
            el.value = {val};
            if (el.value !== {val}) return 'rejected';
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return 'ok';
        }})()"#,
        sel = js_literal(selector),
        val = js_literal(value)
    )
}

fn clear_toggles_script(selector: &str) -> String {
    format!(
        r#"(() => {{
            let cleared = 0;
            document.querySelectorAll({sel}).forEach(el => {{
                if (el.checked) {{ el.click(); cleared += 1; }}
            }});
            return cleared;
        }})()"#,
        sel = js_literal(selector)
    )
}

#[async_trait]
impl RenderSurface for ChromiumSurface {
    async fn open(&mut self, url: &str) -> Result<(), EngineError> {
        if self.page.is_none() {
            let browser = get_browser(&self.settings).await?;
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| EngineError::Browser(e.to_string()))?;
            if let Some(ua) = &self.settings.user_agent {
                page.set_user_agent(ua.as_str())
                    .await
                    .map_err(|e| EngineError::Browser(e.to_string()))?;
            }
            self.page = Some(page);
        }

        let page = self.page()?;
        // goto waits for the load event by default
        self.bounded(async {
            page.goto(url)
                .await
                .map_err(|e| EngineError::Browser(format!("Navigation failed: {}", e)))?;
            Ok(())
        })
        .await
    }

    async fn content(&mut self) -> Result<String, EngineError> {
        let page = self.page()?;
        self.bounded(async {
            page.content()
                .await
                .map_err(|e| EngineError::Browser(e.to_string()))
        })
        .await
    }

    async fn read_options(&mut self, selector: &str) -> Result<Vec<AxisOption>, EngineError> {
        let result: OptionsResult = self.evaluate(read_options_script(selector)).await?;
        result.into_options(selector)
    }

    async fn select_option(&mut self, selector: &str, value: &str) -> Result<(), EngineError> {
        let status: String = self.evaluate(select_option_script(selector, value)).await?;
        match status.as_str() {
            "ok" => Ok(()),
            "missing" => Err(EngineError::ElementNotFound(selector.to_string())),
            _ => Err(EngineError::ValueRejected {
                selector: selector.to_string(),
                value: value.to_string(),
            }),
        }
    }

    async fn clear_toggles(&mut self, selector: &str) -> Result<usize, EngineError> {
        self.evaluate(clear_toggles_script(selector)).await
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}
