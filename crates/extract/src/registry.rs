// ABOUTME: The platform registry: ordered URL predicates mapped to extractors and publishers.
// ABOUTME: Detection is first-match-wins in declared order with an Unknown sentinel.

//! Platform detection and dispatch.
//!
//! A [`Registry`] holds an ordered list of platform entries and answers
//! three questions: which platform owns a URL, how to crawl it, and how to
//! publish to it. The built-in table mirrors the supported sites; callers
//! hold the registry explicitly and pass it into dispatch calls.

use std::fmt;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::article::Article;
use crate::bridge::PlatformInfo;
use crate::error::ExtractError;
use crate::page::Page;
use crate::platforms::{Baidu, ChinaDaily, Extractor, Netease, Pengpai, Sohu, Tencent, Toutiao};
use crate::publish::{EditorFill, Publisher, TOUTIAO_EDITOR, WEIXIN_EDITOR};

/// The supported platforms plus the Unknown sentinel.
///
/// `Unknown` also deserializes from `"auto"`: the host sends that when it
/// wants detection to pick the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Baidu,
    Pengpai,
    Sohu,
    Tencent,
    Netease,
    Chinadaily,
    Toutiao,
    Weixin,
    #[serde(alias = "auto")]
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Baidu => "baidu",
            Platform::Pengpai => "pengpai",
            Platform::Sohu => "sohu",
            Platform::Tencent => "tencent",
            Platform::Netease => "netease",
            Platform::Chinadaily => "chinadaily",
            Platform::Toutiao => "toutiao",
            Platform::Weixin => "weixin",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registry row: identity, URL predicate, and the optional capabilities.
struct Entry {
    platform: Platform,
    name: &'static str,
    matches: fn(&str) -> bool,
    extractor: Option<&'static dyn Extractor>,
    publisher: Option<&'static dyn Publisher>,
}

/// The ordered platform table.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// Builds the registry of all supported platforms, in detection order.
    pub fn builtin() -> Self {
        let entries = vec![
            Entry {
                platform: Platform::Baidu,
                name: "Baidu News",
                matches: |u| u.contains("baijiahao.baidu.com") || u.contains("baidu.com/s?"),
                extractor: Some(&Baidu),
                publisher: None,
            },
            Entry {
                platform: Platform::Pengpai,
                name: "Pengpai News",
                matches: |u| u.contains("thepaper.cn"),
                extractor: Some(&Pengpai),
                publisher: None,
            },
            Entry {
                platform: Platform::Sohu,
                name: "Sohu News",
                matches: |u| u.contains("sohu.com"),
                extractor: Some(&Sohu),
                publisher: None,
            },
            Entry {
                platform: Platform::Tencent,
                name: "Tencent News",
                matches: |u| {
                    u.contains("qq.com/") && (u.contains("/omn/") || u.contains("/rain/"))
                },
                extractor: Some(&Tencent),
                publisher: None,
            },
            Entry {
                platform: Platform::Netease,
                name: "NetEase News",
                matches: |u| u.contains("163.com"),
                extractor: Some(&Netease),
                publisher: None,
            },
            Entry {
                platform: Platform::Chinadaily,
                name: "China Daily",
                matches: |u| u.contains("chinadaily.com.cn") || u.contains("chinadaily.cn"),
                extractor: Some(&ChinaDaily),
                publisher: None,
            },
            Entry {
                platform: Platform::Toutiao,
                name: "Toutiao",
                matches: |u| u.contains("toutiao.com"),
                extractor: Some(&Toutiao),
                publisher: Some(&TOUTIAO_EDITOR),
            },
            Entry {
                platform: Platform::Weixin,
                name: "WeChat Official Account",
                matches: |u| u.contains("mp.weixin.qq.com"),
                extractor: None,
                publisher: Some(&WEIXIN_EDITOR),
            },
        ];
        Self { entries }
    }

    /// Matches a URL against the entries in declared order.
    pub fn detect(&self, url: &str) -> PlatformInfo {
        for entry in &self.entries {
            if (entry.matches)(url) {
                return PlatformInfo {
                    platform: entry.platform,
                    platform_name: entry.name.to_string(),
                };
            }
        }
        PlatformInfo::unknown()
    }

    fn entry(&self, platform: Platform) -> Option<&Entry> {
        self.entries.iter().find(|e| e.platform == platform)
    }

    /// Detects the page's platform and runs its extractor.
    pub fn crawl_article(&self, page: &Page) -> Result<(PlatformInfo, Article), ExtractError> {
        let info = self.detect(page.url());
        if info.platform == Platform::Unknown {
            return Err(ExtractError::unknown_platform(page.url(), "crawl_article"));
        }
        let extractor = self
            .entry(info.platform)
            .and_then(|e| e.extractor)
            .ok_or_else(|| {
                ExtractError::unsupported(
                    info.platform.as_str(),
                    "crawl_article",
                    Some(anyhow!("no crawler implemented for this platform")),
                )
            })?;
        let article = extractor.crawl_article(page)?;
        Ok((info, article))
    }

    /// Builds the editor fill payload for a platform's publisher.
    pub fn publish(&self, platform: Platform, article: &Article) -> Result<EditorFill, ExtractError> {
        let publisher = self
            .entry(platform)
            .and_then(|e| e.publisher)
            .ok_or_else(|| {
                ExtractError::unsupported(
                    platform.as_str(),
                    "publish",
                    Some(anyhow!("auto-publish not supported for this platform")),
                )
            })?;
        publisher.publish(article)
    }
}
