// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 拼接基础地址与路径，避免出现重复或缺失的斜杠
pub fn join_path(base_url: &str, path: &str) -> String {
    match (base_url.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base_url, &path[1..]),
        (false, false) if !path.is_empty() => format!("{}/{}", base_url, path),
        _ => format!("{}{}", base_url, path),
    }
}

/// 提取URL中的主机名（小写，去除末尾的根点）
///
/// 无法解析或不含主机名时返回 `None`
pub fn host_of(url_str: &str) -> Option<String> {
    let url = Url::parse(url_str).ok()?;
    let host = url.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
