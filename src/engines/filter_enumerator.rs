// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::FilterSettings;
use crate::domain::models::filter::{FilterAxis, FilterContext};
use crate::domain::models::record::Record;
use crate::domain::services::list_extractor::{ExtractError, Extraction, ListExtractor};
use crate::engines::traits::{
    EngineError, EnumerateError, RecordSource, RenderSurface, SourceBatch, SourceError,
};
use crate::infrastructure::metrics;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 遍历状态
///
/// `Init → SelectOuter → SelectInner → SettleWait → Extract → … → Done`，
/// `Init` 在 [`FilterEnumerator::enumerate`] 中完成
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    SelectOuter { outer: usize, inner: usize },
    SelectInner { outer: usize, inner: usize },
    SettleWait { outer: usize, inner: usize },
    Extract { outer: usize, inner: usize },
    Done,
}

/// 步骤失败时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// 终止整个遍历
    Fatal,
    /// 记录日志并继续下一个组合
    Continue,
}

impl SweepState {
    /// 该步骤失败时的策略
    pub fn policy(&self) -> StepPolicy {
        match self {
            SweepState::Extract { .. } => StepPolicy::Continue,
            _ => StepPolicy::Fatal,
        }
    }
}

/// 单个筛选组合的提取结果
#[derive(Debug)]
pub struct Pass {
    pub context: FilterContext,
    /// 已附加筛选标签的记录，或该组合的提取错误
    pub outcome: Result<Vec<Record>, ExtractError>,
}

/// 筛选枚举器
///
/// 独占一个渲染表面，遍历 (外层 × 内层) 的全部组合并在每个组合下提取记录。
/// 遍历游标以可变借用持有枚举器，因此同一表面上不可能同时存在两个遍历。
pub struct FilterEnumerator<S: RenderSurface> {
    name: String,
    surface: S,
    extractor: ListExtractor,
    listing_url: String,
    filters: FilterSettings,
    settle: Duration,
    opened: bool,
}

impl<S: RenderSurface> FilterEnumerator<S> {
    /// 创建新的筛选枚举器
    ///
    /// # 参数
    ///
    /// * `name` - 数据源名称
    /// * `surface` - 独占的渲染表面
    /// * `extractor` - 列表提取器
    /// * `listing_url` - 列表页地址
    /// * `filters` - 筛选控件配置
    /// * `settle` - 每次选择后的等待时间
    pub fn new(
        name: impl Into<String>,
        surface: S,
        extractor: ListExtractor,
        listing_url: impl Into<String>,
        filters: FilterSettings,
        settle: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            surface,
            extractor,
            listing_url: listing_url.into(),
            filters,
            settle,
            opened: false,
        }
    }

    /// 是否配置了筛选轴
    pub fn has_axes(&self) -> bool {
        self.filters.outer.is_some() || self.filters.inner.is_some()
    }

    /// 开始一次完整遍历
    ///
    /// 重新加载列表页、清除独立复选框，并读取两个筛选轴的全部选项
    pub async fn enumerate(&mut self) -> Result<Sweep<'_, S>, EnumerateError> {
        let (outer_selector, inner_selector) = match (&self.filters.outer, &self.filters.inner) {
            (Some(outer), Some(inner)) => (outer.clone(), inner.clone()),
            (None, _) => return Err(EnumerateError::AxisNotConfigured("outer")),
            (_, None) => return Err(EnumerateError::AxisNotConfigured("inner")),
        };

        self.surface.open(&self.listing_url).await?;
        self.opened = true;

        if let Some(toggles) = &self.filters.toggles {
            let cleared = self.surface.clear_toggles(toggles).await?;
            debug!("Cleared {} filter toggles", cleared);
        }

        let outer_options = self
            .surface
            .read_options(&outer_selector)
            .await
            .map_err(|source| EnumerateError::AxisRead {
                axis: "outer",
                source,
            })?;
        let inner_options = self
            .surface
            .read_options(&inner_selector)
            .await
            .map_err(|source| EnumerateError::AxisRead {
                axis: "inner",
                source,
            })?;

        let placeholders = &self.filters.placeholder_values;
        let outer = FilterAxis::from_options(outer_options, placeholders);
        let inner = FilterAxis::from_options(inner_options, placeholders);

        info!(
            "{}: sweeping {} x {} filter combinations",
            self.name,
            outer.len(),
            inner.len()
        );
        if outer.is_empty() || inner.is_empty() {
            warn!("{}: a filter axis has no selectable values", self.name);
        }

        let state = if outer.is_empty() || inner.is_empty() {
            SweepState::Done
        } else {
            SweepState::SelectOuter { outer: 0, inner: 0 }
        };

        Ok(Sweep {
            enumerator: self,
            outer_selector,
            inner_selector,
            outer,
            inner,
            state,
        })
    }

    /// 提取当前视图
    async fn extract_view(&mut self) -> Result<Extraction, SourceError> {
        let html = self.surface.content().await?;
        Ok(self.extractor.extract(&html)?)
    }

    async fn open_fresh(&mut self) -> Result<(), EngineError> {
        self.surface.open(&self.listing_url).await?;
        self.opened = true;
        Ok(())
    }
}

/// 遍历游标
///
/// 每次调用 [`Sweep::next_pass`] 推进状态机直到完成一个组合的提取
pub struct Sweep<'a, S: RenderSurface> {
    enumerator: &'a mut FilterEnumerator<S>,
    outer_selector: String,
    inner_selector: String,
    outer: FilterAxis,
    inner: FilterAxis,
    state: SweepState,
}

impl<'a, S: RenderSurface> Sweep<'a, S> {
    /// 本次遍历的总提取次数
    pub fn total_passes(&self) -> usize {
        self.outer.len() * self.inner.len()
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    pub fn outer_axis(&self) -> &FilterAxis {
        &self.outer
    }

    pub fn inner_axis(&self) -> &FilterAxis {
        &self.inner
    }

    fn advance(&self, outer: usize, inner: usize) -> SweepState {
        if inner + 1 < self.inner.len() {
            SweepState::SelectOuter {
                outer,
                inner: inner + 1,
            }
        } else if outer + 1 < self.outer.len() {
            SweepState::SelectOuter {
                outer: outer + 1,
                inner: 0,
            }
        } else {
            SweepState::Done
        }
    }

    /// 推进到下一个组合并返回其提取结果，全部完成后返回 `None`
    ///
    /// 筛选值选择失败或表面不可用时终止遍历并返回错误
    pub async fn next_pass(&mut self) -> Result<Option<Pass>, EnumerateError> {
        loop {
            let step = self.state;
            match step {
                SweepState::Done => return Ok(None),
                SweepState::SelectOuter { outer, inner } => {
                    let value = self.outer.values()[outer].clone();
                    if let Err(source) = self
                        .enumerator
                        .surface
                        .select_option(&self.outer_selector, &value)
                        .await
                    {
                        self.state = SweepState::Done;
                        return Err(EnumerateError::AxisSelection {
                            axis: "outer",
                            value,
                            source,
                        });
                    }
                    self.state = SweepState::SelectInner { outer, inner };
                }
                SweepState::SelectInner { outer, inner } => {
                    let value = self.inner.values()[inner].clone();
                    if let Err(source) = self
                        .enumerator
                        .surface
                        .select_option(&self.inner_selector, &value)
                        .await
                    {
                        self.state = SweepState::Done;
                        return Err(EnumerateError::AxisSelection {
                            axis: "inner",
                            value,
                            source,
                        });
                    }
                    self.state = SweepState::SettleWait { outer, inner };
                }
                SweepState::SettleWait { outer, inner } => {
                    if !self.enumerator.settle.is_zero() {
                        tokio::time::sleep(self.enumerator.settle).await;
                    }
                    self.state = SweepState::Extract { outer, inner };
                }
                SweepState::Extract { outer, inner } => {
                    let context =
                        FilterContext::new(&self.outer.values()[outer], &self.inner.values()[inner]);
                    self.state = self.advance(outer, inner);

                    let outcome = match self.enumerator.extract_view().await {
                        Ok(extraction) => Ok(extraction
                            .records
                            .into_iter()
                            .map(|r| r.tagged(&context))
                            .collect()),
                        Err(SourceError::Extract(e)) if step.policy() == StepPolicy::Continue => {
                            Err(e)
                        }
                        Err(SourceError::Engine(e)) => {
                            self.state = SweepState::Done;
                            return Err(EnumerateError::Surface(e));
                        }
                        Err(e) => {
                            self.state = SweepState::Done;
                            return Err(EnumerateError::Surface(EngineError::Browser(
                                e.to_string(),
                            )));
                        }
                    };

                    return Ok(Some(Pass { context, outcome }));
                }
            }
        }
    }

    /// 执行剩余的全部组合并汇总记录
    ///
    /// 失败的组合记录日志后跳过
    pub async fn collect(mut self) -> Result<SourceBatch, EnumerateError> {
        let mut batch = SourceBatch::default();

        while let Some(pass) = self.next_pass().await? {
            batch.passes += 1;
            match pass.outcome {
                Ok(records) => {
                    debug!("{}: {} records", pass.context, records.len());
                    metrics::extraction_pass(true);
                    metrics::records_extracted(records.len());
                    batch.records.extend(records);
                }
                Err(e) => {
                    warn!("Extraction for {} failed, continuing: {}", pass.context, e);
                    metrics::extraction_pass(false);
                    batch.failed_passes += 1;
                }
            }
        }

        Ok(batch)
    }
}

#[async_trait]
impl<S: RenderSurface> RecordSource for FilterEnumerator<S> {
    async fn iter_current(&mut self) -> Result<SourceBatch, SourceError> {
        if !self.opened {
            self.open_fresh().await?;
        }

        let extraction = self.extract_view().await?;
        metrics::extraction_pass(true);
        metrics::records_extracted(extraction.records.len());

        Ok(SourceBatch {
            records: extraction.records,
            passes: 1,
            failed_passes: 0,
        })
    }

    async fn iter_all_terms(&mut self) -> Result<SourceBatch, SourceError> {
        if !self.has_axes() {
            info!("{}: no filter axes configured, extracting a single view", self.name);
            self.open_fresh().await?;
            return self.iter_current().await;
        }

        let sweep = self.enumerate().await?;
        Ok(sweep.collect().await?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
