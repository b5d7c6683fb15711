// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::url_utils::host_of;
use std::collections::HashSet;

/// 屏蔽域名过滤器
///
/// 主机名与屏蔽域名完全相同，或是其严格子域名时命中。
/// 无法解析出主机名的地址一律视为屏蔽。
#[derive(Debug, Clone, Default)]
pub struct BlockedDomainFilter {
    domains: HashSet<String>,
}

impl BlockedDomainFilter {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| d.as_ref().trim().trim_end_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }

    pub fn is_blocked(&self, url: &str) -> bool {
        let Some(host) = host_of(url) else {
            return true;
        };

        self.domains.iter().any(|blocked| {
            host == *blocked
                || host
                    .strip_suffix(blocked.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
