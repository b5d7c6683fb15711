// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 所有配置节在缺失时均回退为默认值，不做额外的结构校验
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 站点地址配置
    pub site: SiteSettings,
    /// 列表选择器配置
    pub selectors: SelectorSettings,
    /// 筛选控件配置
    pub filters: FilterSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 通知配置
    pub notifier: NotifierSettings,
    /// 屏蔽域名配置
    pub blocklist: BlocklistSettings,
    /// 运行模式配置
    pub run: RunSettings,
}

/// 数据源类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// 由浏览器渲染并可操作筛选控件
    #[default]
    Interactive,
    /// 通过HTTP直接获取，不支持筛选控件
    Static,
}

/// 查询参数（保持声明顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryParam {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// 动态参数键
///
/// `attr` 为空时使用 `data-` 加上将 `_` 替换为 `-` 的键名
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DynamicKey {
    pub key: String,
    #[serde(default)]
    pub attr: Option<String>,
}

impl DynamicKey {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            attr: None,
        }
    }

    /// 锚点元素上对应的属性名
    pub fn attribute_name(&self) -> String {
        match &self.attr {
            Some(attr) if !attr.is_empty() => attr.clone(),
            _ => format!("data-{}", self.key.replace('_', "-")),
        }
    }
}

/// 站点地址配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// 数据源类型
    pub kind: SourceKind,
    /// 站点名称，用于日志
    pub name: String,
    /// 基础地址，例如 `https://example.com`
    pub base_url: String,
    /// 列表页路径
    pub listing_path: String,
    /// 详情页路径
    pub detail_path: String,
    /// 详情页固定查询参数
    pub fixed_query: Vec<QueryParam>,
    /// 从锚点属性读取的动态查询参数（顺序即输出顺序）
    pub dynamic_keys: Vec<DynamicKey>,
}

/// 列表选择器配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    pub container: String,
    pub item: String,
    pub anchor: String,
    pub title: String,
    pub period: String,
    pub status: String,
}

/// 筛选控件配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// 外层轴（学期）下拉框选择器
    pub outer: Option<String>,
    /// 内层轴（分类）下拉框选择器
    pub inner: Option<String>,
    /// 需要在遍历前取消勾选的独立复选框选择器
    pub toggles: Option<String>,
    /// 视为占位符而被丢弃的选项值（空值总会被丢弃）
    pub placeholder_values: Vec<String>,
}

/// 浏览器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// 远程 Chrome 调试地址，为空时本地启动
    pub remote_url: Option<String>,
    /// 选择筛选值后的等待时间（毫秒）
    pub settle_ms: u64,
    /// 单次请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 用户代理
    pub user_agent: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            remote_url: None,
            settle_ms: 1500,
            request_timeout_secs: 30,
            user_agent: None,
        }
    }
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// 已通知ID集合文件
    pub seen_path: String,
    /// 最近一次提取结果快照文件
    pub snapshot_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            seen_path: "./storage/seen.json".to_string(),
            snapshot_path: "./storage/snapshot.json".to_string(),
        }
    }
}

/// 通知配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifierSettings {
    /// Telegram Bot Token，为空时仅记录日志
    pub bot_token: Option<String>,
    /// 目标会话ID
    pub chat_id: Option<String>,
    /// Bot API 地址
    pub api_base: String,
    /// 单条消息的最大字符数
    pub budget: usize,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base: "https://api.telegram.org".to_string(),
            budget: 4000,
        }
    }
}

/// 屏蔽域名配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlocklistSettings {
    pub domains: Vec<String>,
}

/// 运行模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// 遍历所有筛选组合
    #[default]
    Sweep,
    /// 仅提取当前视图
    Current,
}

/// 运行配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub mode: RunMode,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载 `config/default`、`config/{APP_ENVIRONMENT}`（仅在设置时）与 `LISTWATCH__*` 环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").ok();
        let mut builder = Config::builder();
        for name in config_files(env.as_deref()) {
            builder = builder.add_source(File::with_name(&name).required(false));
        }

        builder
            .add_source(Environment::with_prefix("LISTWATCH").separator("__"))
            .build()?
            .try_deserialize()
    }
}

/// 按加载顺序排列的配置文件名
fn config_files(env: Option<&str>) -> Vec<String> {
    let mut files = vec!["config/default".to_string()];
    match env.map(str::trim) {
        Some(env) if !env.is_empty() && env != "default" => files.push(format!("config/{}", env)),
        _ => {}
    }
    files
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
