// ABOUTME: Host bridge message types and the synchronous action dispatcher.
// ABOUTME: Mirrors the action-tagged messaging contract plus the backend submit payload.

//! Host bridge.
//!
//! The host process talks to the extraction core through action-tagged JSON
//! messages: detect the platform of a page, crawl it, or build a publish
//! payload. Responses are plain success/failure envelopes; extraction
//! errors are flattened to their display string so the host never needs the
//! Rust error types.

use serde::{Deserialize, Serialize};

use crate::article::Article;
use crate::page::Page;
use crate::publish::EditorFill;
use crate::registry::{Platform, Registry};

/// Where the host submits accepted articles.
pub const SUBMIT_ENDPOINT: &str = "/api/articles";

/// An incoming bridge message, tagged by `action`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum BridgeRequest {
    #[serde(rename = "detectPlatform")]
    DetectPlatform,
    #[serde(rename = "crawlArticle")]
    CrawlArticle,
    /// `platform` may be `"auto"`, which defers to detection on the page.
    #[serde(rename = "publishArticle")]
    PublishArticle { platform: Platform, article: Article },
}

/// Detection result: the platform key and its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub platform: Platform,
    pub platform_name: String,
}

impl PlatformInfo {
    pub fn unknown() -> Self {
        Self {
            platform: Platform::Unknown,
            platform_name: "Unknown Platform".to_string(),
        }
    }
}

/// An outgoing bridge message, serialized untagged to match the host
/// contract.
///
/// Variant order matters for deserialization: untagged matching takes the
/// first variant whose required fields are present and tolerates extras, so
/// wider shapes must come before narrower ones (`Crawled` before `Failed`,
/// `Detected` last).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BridgeResponse {
    Crawled {
        success: bool,
        platform: Platform,
        #[serde(rename = "platformName")]
        platform_name: String,
        article: Article,
    },
    Published {
        success: bool,
        fill: EditorFill,
    },
    Failed {
        success: bool,
        error: String,
    },
    Detected(PlatformInfo),
}

impl BridgeResponse {
    fn failure(error: impl ToString) -> Self {
        BridgeResponse::Failed {
            success: false,
            error: error.to_string(),
        }
    }
}

/// Payload shape for `POST /api/articles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub platform: Platform,
    pub article: Article,
}

/// Dispatches one bridge request against a page.
pub fn handle(registry: &Registry, page: &Page, request: BridgeRequest) -> BridgeResponse {
    match request {
        BridgeRequest::DetectPlatform => BridgeResponse::Detected(registry.detect(page.url())),
        BridgeRequest::CrawlArticle => match registry.crawl_article(page) {
            Ok((info, article)) => BridgeResponse::Crawled {
                success: true,
                platform: info.platform,
                platform_name: info.platform_name,
                article,
            },
            Err(err) => BridgeResponse::failure(err),
        },
        BridgeRequest::PublishArticle { platform, article } => {
            let platform = if platform == Platform::Unknown {
                registry.detect(page.url()).platform
            } else {
                platform
            };
            match registry.publish(platform, &article) {
                Ok(fill) => BridgeResponse::Published {
                    success: true,
                    fill,
                },
                Err(err) => BridgeResponse::failure(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_json_round_trip() {
        let detect: BridgeRequest = serde_json::from_str(r#"{"action":"detectPlatform"}"#).unwrap();
        assert!(matches!(detect, BridgeRequest::DetectPlatform));

        let publish: BridgeRequest = serde_json::from_str(
            r#"{"action":"publishArticle","platform":"auto","article":{
                "url":"https://mp.weixin.qq.com/s/x","title":"t",
                "publishTime":"2024-01-01 00:00:00",
                "author":{"avatar":"","nickname":"n","url":""},
                "contentList":["p"],"imageList":[],"videoList":[],
                "commentCount":0,"commentList":[]}}"#,
        )
        .unwrap();
        match publish {
            BridgeRequest::PublishArticle { platform, article } => {
                assert_eq!(platform, Platform::Unknown);
                assert_eq!(article.title, "t");
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn detect_response_shape() {
        let registry = Registry::builtin();
        let page = Page::new("<html></html>", "https://www.163.com/news/article/A.html");
        let response = handle(&registry, &page, BridgeRequest::DetectPlatform);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["platform"], "netease");
        assert_eq!(json["platformName"], "NetEase News");
    }

    #[test]
    fn crawl_failure_reports_error_string() {
        let registry = Registry::builtin();
        let page = Page::new("<html></html>", "https://example.com/a");
        let response = handle(&registry, &page, BridgeRequest::CrawlArticle);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("unknown platform"));
    }

    #[test]
    fn publish_auto_detects_from_page() {
        let registry = Registry::builtin();
        let page = Page::new("<html></html>", "https://mp.weixin.qq.com/s/x");
        let mut article = Article::empty();
        article.title = "标题".to_string();
        article.content_list = vec!["正文".to_string()];

        let response = handle(
            &registry,
            &page,
            BridgeRequest::PublishArticle {
                platform: Platform::Unknown,
                article,
            },
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["fill"]["bodyHtml"], "<p>正文</p>");
    }

    #[test]
    fn response_json_round_trips_per_variant() {
        let registry = Registry::builtin();
        let html = r#"
            <html data-ptime="2024-01-15 10:30:00"><body>
            <h1 class="post_title">网易标题</h1>
            <div class="post_info">来源: <a class="post_author" href="/media/x">网易新闻</a></div>
            <div class="post_body"><p>这一段正文内容足够长，超过十个字符。</p></div>
            </body></html>
        "#;
        let page = Page::new(html, "https://www.163.com/news/article/A.html");

        let crawled = handle(&registry, &page, BridgeRequest::CrawlArticle);
        let json = serde_json::to_string(&crawled).unwrap();
        let back: BridgeResponse = serde_json::from_str(&json).unwrap();
        match back {
            BridgeResponse::Crawled { success, article, .. } => {
                assert!(success);
                assert_eq!(article.title, "网易标题");
            }
            other => panic!("crawled response lost its shape: {:?}", other),
        }

        let detected = handle(&registry, &page, BridgeRequest::DetectPlatform);
        let json = serde_json::to_string(&detected).unwrap();
        let back: BridgeResponse = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, BridgeResponse::Detected(_)));

        let json = serde_json::to_string(&BridgeResponse::failure("boom")).unwrap();
        let back: BridgeResponse = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, BridgeResponse::Failed { .. }));
    }

    #[test]
    fn submit_payload_shape() {
        let payload = SubmitPayload {
            platform: Platform::Sohu,
            article: Article::empty(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["platform"], "sohu");
        assert!(json["article"].get("contentList").is_some());
        assert_eq!(SUBMIT_ENDPOINT, "/api/articles");
    }
}
