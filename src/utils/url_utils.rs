// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 解析公告链接
///
/// 空链接、无法解析的链接以及非 http(s) 链接（如 `javascript:`、`mailto:`）返回 `None`
pub fn resolve_http_url(base_url: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    resolve_url(base_url, href)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// 主机键，用于按主机分组和限流
///
/// 带端口时为 `host:port`，没有主机时为空字符串
pub fn host_key(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}
