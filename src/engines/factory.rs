// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{FilterSettings, Settings, SourceKind};
use crate::domain::services::list_extractor::ListExtractor;
use crate::engines::chromium_engine::ChromiumSurface;
use crate::engines::filter_enumerator::FilterEnumerator;
use crate::engines::http_engine::HttpSurface;
use crate::engines::traits::{RecordSource, SourceError};
use crate::utils::url_utils::join_path;
use std::time::Duration;
use tracing::{info, warn};

/// 根据配置创建记录数据源
///
/// # 参数
///
/// * `settings` - 应用配置
///
/// # 返回值
///
/// 对应 `site.kind` 的数据源；选择器无效时返回错误
pub fn create_record_source(settings: &Settings) -> Result<Box<dyn RecordSource>, SourceError> {
    let extractor = ListExtractor::new(&settings.site, &settings.selectors)?;
    let listing_url = join_path(&settings.site.base_url, &settings.site.listing_path);
    let name = if settings.site.name.is_empty() {
        listing_url.clone()
    } else {
        settings.site.name.clone()
    };
    let settle = Duration::from_millis(settings.browser.settle_ms);

    match settings.site.kind {
        SourceKind::Interactive => {
            info!("Using chromium surface for {}", name);
            let surface = ChromiumSurface::new(settings.browser.clone());
            Ok(Box::new(FilterEnumerator::new(
                name,
                surface,
                extractor,
                listing_url,
                settings.filters.clone(),
                settle,
            )))
        }
        SourceKind::Static => {
            if settings.filters.outer.is_some() || settings.filters.inner.is_some() {
                warn!("Static sources cannot operate filter controls; filters are ignored");
            }
            let surface = HttpSurface::new(&settings.browser)?;
            Ok(Box::new(FilterEnumerator::new(
                name,
                surface,
                extractor,
                listing_url,
                FilterSettings::default(),
                Duration::ZERO,
            )))
        }
    }
}
