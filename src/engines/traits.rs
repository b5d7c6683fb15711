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

use crate::domain::models::filter::AxisOption;
use crate::domain::models::record::Record;
use crate::domain::services::list_extractor::ExtractError;
use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 元素不存在
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    /// 控件拒绝了选择的值
    #[error("Value `{value}` rejected by `{selector}`")]
    ValueRejected { selector: String, value: String },
    /// 当前引擎不支持该操作
    #[error("Operation not supported by {0} surface")]
    Unsupported(&'static str),
    /// 页面尚未打开
    #[error("No page is open")]
    NotOpened,
    /// 浏览器错误
    #[error("Browser error: {0}")]
    Browser(String),
}

/// 渲染表面特质
///
/// 一个渲染表面对应一个可变的页面状态，所有操作都需要独占访问
#[async_trait]
pub trait RenderSurface: Send {
    /// 打开（或重新加载）页面
    async fn open(&mut self, url: &str) -> Result<(), EngineError>;

    /// 获取当前渲染后的 HTML
    async fn content(&mut self) -> Result<String, EngineError>;

    /// 读取下拉框的全部选项（按呈现顺序）
    async fn read_options(&mut self, selector: &str) -> Result<Vec<AxisOption>, EngineError>;

    /// 在下拉框中选择指定值
    async fn select_option(&mut self, selector: &str, value: &str) -> Result<(), EngineError>;

    /// 取消勾选所有匹配的复选框，返回被取消的数量
    async fn clear_toggles(&mut self, selector: &str) -> Result<usize, EngineError>;

    /// 表面名称
    fn name(&self) -> &'static str;
}

/// 枚举错误
#[derive(Error, Debug)]
pub enum EnumerateError {
    /// 筛选值选择失败，整个遍历终止
    #[error("Failed to select {axis} value `{value}`: {source}")]
    AxisSelection {
        axis: &'static str,
        value: String,
        #[source]
        source: EngineError,
    },
    /// 筛选轴选项读取失败
    #[error("Failed to read {axis} axis options: {source}")]
    AxisRead {
        axis: &'static str,
        #[source]
        source: EngineError,
    },
    /// 只配置了一个筛选轴
    #[error("Filter axis `{0}` is not configured")]
    AxisNotConfigured(&'static str),
    /// 渲染表面不可用
    #[error("Surface unavailable: {0}")]
    Surface(#[from] EngineError),
}

/// 数据源错误
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Enumerate(#[from] EnumerateError),
}

/// 一次数据源读取的结果
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    /// 按提取顺序排列的记录
    pub records: Vec<Record>,
    /// 执行的提取次数
    pub passes: usize,
    /// 失败的提取次数
    pub failed_passes: usize,
}

/// 记录数据源特质
///
/// 具体站点在构造时选定，通过两个变体读取记录
#[async_trait]
pub trait RecordSource: Send {
    /// 仅提取当前视图（不操作筛选控件）
    async fn iter_current(&mut self) -> Result<SourceBatch, SourceError>;

    /// 遍历所有筛选组合
    async fn iter_all_terms(&mut self) -> Result<SourceBatch, SourceError>;

    /// 数据源名称
    fn name(&self) -> &str;
}
