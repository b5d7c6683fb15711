// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use listwatch::config::settings::{
    DynamicKey, FilterSettings, QueryParam, SelectorSettings, SiteSettings,
};
use listwatch::domain::models::filter::AxisOption;
use listwatch::domain::services::list_extractor::ListExtractor;
use listwatch::domain::services::notification_service::{GatewayError, MessageGateway};
use listwatch::engines::filter_enumerator::FilterEnumerator;
use listwatch::engines::traits::{EngineError, RenderSurface};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub const OUTER: &str = "select#term";
pub const INNER: &str = "select#category";
pub const TOGGLES: &str = "input.only-open";

/// 可脚本化的渲染表面
///
/// 每个 (外层, 内层) 组合返回预置的页面，并记录所有调用
#[derive(Default)]
pub struct FakeSurface {
    outer: Vec<AxisOption>,
    inner: Vec<AxisOption>,
    pages: HashMap<(String, String), String>,
    default_page: String,
    selected: (String, String),
    opened: bool,
    reject: HashSet<String>,
    unavailable: bool,
    calls: Arc<Mutex<Vec<String>>>,
    extracted_at: Arc<Mutex<Vec<Instant>>>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axes(mut self, outer: &[&str], inner: &[&str]) -> Self {
        self.outer = outer.iter().map(|v| AxisOption::new(v, v)).collect();
        self.inner = inner.iter().map(|v| AxisOption::new(v, v)).collect();
        self
    }

    /// 追加一个占位选项（值为空）
    pub fn with_placeholders(mut self) -> Self {
        self.outer.insert(0, AxisOption::new("", "-- term --"));
        self.inner.insert(0, AxisOption::new("", "-- category --"));
        self
    }

    pub fn with_page(mut self, outer: &str, inner: &str, html: String) -> Self {
        self.pages
            .insert((outer.to_string(), inner.to_string()), html);
        self
    }

    pub fn with_default_page(mut self, html: String) -> Self {
        self.default_page = html;
        self
    }

    /// 选择该值时控件拒绝
    pub fn rejecting(mut self, value: &str) -> Self {
        self.reject.insert(value.to_string());
        self
    }

    /// 读取内容总是失败
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }

    /// 每次读取内容时的（虚拟）时间
    pub fn extraction_times(&self) -> Arc<Mutex<Vec<Instant>>> {
        self.extracted_at.clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RenderSurface for FakeSurface {
    async fn open(&mut self, url: &str) -> Result<(), EngineError> {
        self.log(format!("open {}", url));
        self.opened = true;
        self.selected = (String::new(), String::new());
        Ok(())
    }

    async fn content(&mut self) -> Result<String, EngineError> {
        if !self.opened {
            return Err(EngineError::NotOpened);
        }
        if self.unavailable {
            return Err(EngineError::Browser("target closed".to_string()));
        }
        self.log(format!("extract {}/{}", self.selected.0, self.selected.1));
        self.extracted_at.lock().unwrap().push(Instant::now());
        Ok(self
            .pages
            .get(&self.selected)
            .cloned()
            .unwrap_or_else(|| self.default_page.clone()))
    }

    async fn read_options(&mut self, selector: &str) -> Result<Vec<AxisOption>, EngineError> {
        match selector {
            OUTER => Ok(self.outer.clone()),
            INNER => Ok(self.inner.clone()),
            other => Err(EngineError::ElementNotFound(other.to_string())),
        }
    }

    async fn select_option(&mut self, selector: &str, value: &str) -> Result<(), EngineError> {
        self.log(format!("select {}={}", selector, value));
        if self.reject.contains(value) {
            return Err(EngineError::ValueRejected {
                selector: selector.to_string(),
                value: value.to_string(),
            });
        }
        match selector {
            OUTER => self.selected.0 = value.to_string(),
            INNER => self.selected.1 = value.to_string(),
            other => return Err(EngineError::ElementNotFound(other.to_string())),
        }
        Ok(())
    }

    async fn clear_toggles(&mut self, selector: &str) -> Result<usize, EngineError> {
        self.log(format!("clear {}", selector));
        Ok(1)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// 记录所有消息的网关，可指定第几次发送失败（从1开始）
#[derive(Default)]
pub struct RecordingGateway {
    pub sent: Mutex<Vec<String>>,
    fail_on: Mutex<HashSet<usize>>,
    attempts: Mutex<usize>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        let gateway = Self::default();
        gateway.fail_on.lock().unwrap().extend(calls.iter().copied());
        gateway
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn heal(&self) {
        self.fail_on.lock().unwrap().clear();
    }
}

#[async_trait]
impl MessageGateway for RecordingGateway {
    async fn send_text(&self, text: &str) -> Result<(), GatewayError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        if self.fail_on.lock().unwrap().contains(&attempt) {
            return Err(GatewayError::Rejected {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub fn site_settings() -> SiteSettings {
    SiteSettings {
        name: "board".to_string(),
        base_url: "https://example.com".to_string(),
        listing_path: "/list".to_string(),
        detail_path: "/detail".to_string(),
        fixed_query: vec![QueryParam {
            key: "mode".to_string(),
            value: "view".to_string(),
        }],
        dynamic_keys: vec![DynamicKey::new("item_id")],
        ..Default::default()
    }
}

pub fn selector_settings() -> SelectorSettings {
    SelectorSettings {
        container: "#list".to_string(),
        item: "tr".to_string(),
        anchor: "a".to_string(),
        title: "td.title".to_string(),
        period: "td.period".to_string(),
        status: "td.status".to_string(),
    }
}

pub fn filter_settings() -> FilterSettings {
    FilterSettings {
        outer: Some(OUTER.to_string()),
        inner: Some(INNER.to_string()),
        toggles: Some(TOGGLES.to_string()),
        placeholder_values: Vec::new(),
    }
}

pub fn detail_url(id: &str) -> String {
    format!("https://example.com/detail?mode=view&item_id={}", id)
}

/// 生成带表头行的列表页
pub fn listing_html(items: &[(&str, &str)]) -> String {
    let rows: String = items
        .iter()
        .map(|(id, title)| {
            format!(
                "<tr><td class=\"title\"><a href=\"#\" data-item-id=\"{}\">{}</a></td>\
                 <td class=\"period\">2025-03-01 ~ 2025-03-31</td>\
                 <td class=\"status\">Open</td></tr>",
                id, title
            )
        })
        .collect();
    format!(
        "<html><body><table id=\"list\"><tr><th>Title</th><th>Period</th></tr>{}</table></body></html>",
        rows
    )
}

pub fn enumerator(surface: FakeSurface, filters: FilterSettings) -> FilterEnumerator<FakeSurface> {
    enumerator_with_settle(surface, filters, Duration::ZERO)
}

pub fn enumerator_with_settle(
    surface: FakeSurface,
    filters: FilterSettings,
    settle: Duration,
) -> FilterEnumerator<FakeSurface> {
    let extractor = ListExtractor::new(&site_settings(), &selector_settings()).unwrap();
    FilterEnumerator::new(
        "board",
        surface,
        extractor,
        "https://example.com/list",
        filters,
        settle,
    )
}
