// ABOUTME: The unified article schema all platform extractors produce.
// ABOUTME: Defines Article, Author, Image, Video, Comment plus the violation-collecting validator.

//! The unified article schema.
//!
//! Every platform extractor emits the same shape regardless of source-site
//! markup: a flat article record with a nested author block, ordered body
//! paragraphs, content media lists, and a (possibly nested) comment tree.
//! Field names serialize in camelCase to match the host messaging contract
//! and the backend submission payload.

use serde::{Deserialize, Serialize};

/// Author/byline information attached to an article.
///
/// Only `nickname` is required for a valid article; avatar and profile URL
/// are best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub avatar: String,
    pub nickname: String,
    pub url: String,
}

/// A content image. `src` is required; alt text and dimensions are
/// best-effort (0 when the markup does not declare them).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub width: u64,
    pub height: u64,
}

/// A content video. `src` is required; poster, duration (seconds), and
/// title are best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub src: String,
    pub poster: String,
    pub duration: u64,
    pub title: String,
}

/// A single comment. `children` holds nested replies; a comment with no
/// children is a leaf. Platforms expose at most one reply level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub avatar: String,
    pub nickname: String,
    pub publish_time: String,
    pub content: String,
    pub children: Vec<Comment>,
}

impl Comment {
    /// Builds a comment, substituting empty defaults for omitted fields.
    pub fn new(
        avatar: impl Into<String>,
        nickname: impl Into<String>,
        publish_time: impl Into<String>,
        content: impl Into<String>,
        children: Vec<Comment>,
    ) -> Self {
        Self {
            avatar: avatar.into(),
            nickname: nickname.into(),
            publish_time: publish_time.into(),
            content: content.into(),
            children,
        }
    }

    /// True when both fields required for inclusion are present.
    pub fn is_complete(&self) -> bool {
        !self.nickname.is_empty() && !self.content.is_empty()
    }
}

/// The result of harvesting comments from a page.
///
/// `count` is the platform-reported total and may exceed `list.len()`,
/// since the DOM only renders a subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentHarvest {
    pub count: u64,
    pub list: Vec<Comment>,
}

/// The canonical extraction result.
///
/// Constructed fresh per extraction call and never mutated after return.
/// All four collection fields are always present, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub url: String,
    pub title: String,
    /// Normalized `"YYYY-MM-DD HH:MM:SS"`; empty if unresolvable.
    pub publish_time: String,
    pub author: Author,
    /// Paragraph texts in document order; empty strings excluded.
    pub content_list: Vec<String>,
    pub image_list: Vec<Image>,
    pub video_list: Vec<Video>,
    /// Platform-reported total; may exceed `comment_list.len()`.
    pub comment_count: u64,
    pub comment_list: Vec<Comment>,
}

/// Validator output: all violations found, not just the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Article {
    /// Creates an empty article with all fields present and collections empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attaches a comment harvest to the article.
    pub fn set_comments(&mut self, harvest: CommentHarvest) {
        self.comment_count = harvest.count;
        self.comment_list = harvest.list;
    }

    /// Checks the required fields, collecting every violation rather than
    /// stopping at the first. Collection presence and comment-count
    /// numeric-ness are guaranteed by the types themselves.
    pub fn validate(&self) -> Validation {
        let mut errors = Vec::new();

        if self.url.is_empty() {
            errors.push("missing required field: url".to_string());
        }
        if self.title.is_empty() {
            errors.push("missing required field: title".to_string());
        }
        if self.publish_time.is_empty() {
            errors.push("missing required field: publishTime".to_string());
        }
        if self.author.nickname.is_empty() {
            errors.push("missing author.nickname".to_string());
        }

        Validation {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_article() -> Article {
        Article {
            url: "https://www.163.com/news/article/ABC.html".to_string(),
            title: "一则新闻".to_string(),
            publish_time: "2024-01-15 10:30:00".to_string(),
            author: Author {
                avatar: String::new(),
                nickname: "网易新闻".to_string(),
                url: String::new(),
            },
            content_list: vec!["第一段".to_string(), "第二段".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn empty_article_has_all_collections() {
        let article = Article::empty();
        assert!(article.content_list.is_empty());
        assert!(article.image_list.is_empty());
        assert!(article.video_list.is_empty());
        assert!(article.comment_list.is_empty());
        assert_eq!(article.comment_count, 0);
    }

    #[test]
    fn validate_accepts_complete_article() {
        let validation = filled_article().validate();
        assert!(validation.valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn validate_collects_all_violations() {
        let article = Article::empty();
        let validation = article.validate();
        assert!(!validation.valid);
        // url, title, publishTime, author.nickname all missing at once
        assert_eq!(validation.errors.len(), 4);
        assert!(validation.errors[0].contains("url"));
        assert!(validation.errors[1].contains("title"));
        assert!(validation.errors[2].contains("publishTime"));
        assert!(validation.errors[3].contains("author.nickname"));
    }

    #[test]
    fn validate_reports_single_missing_field() {
        let mut article = filled_article();
        article.author.nickname.clear();
        let validation = article.validate();
        assert!(!validation.valid);
        assert_eq!(validation.errors, vec!["missing author.nickname".to_string()]);
    }

    #[test]
    fn comment_completeness() {
        let full = Comment::new("", "张三", "2024-01-01 00:00:00", "说得好", vec![]);
        assert!(full.is_complete());
        let no_content = Comment::new("", "张三", "", "", vec![]);
        assert!(!no_content.is_complete());
        let no_nickname = Comment::new("a.png", "", "", "内容", vec![]);
        assert!(!no_nickname.is_complete());
    }

    #[test]
    fn serializes_in_camel_case() {
        let mut article = filled_article();
        article.set_comments(CommentHarvest {
            count: 3,
            list: vec![Comment::new("", "李四", "2024-01-15 11:00:00", "顶", vec![])],
        });
        let json = serde_json::to_value(&article).unwrap();
        assert!(json.get("publishTime").is_some());
        assert!(json.get("contentList").is_some());
        assert!(json.get("imageList").is_some());
        assert!(json.get("videoList").is_some());
        assert_eq!(json["commentCount"], 3);
        assert_eq!(json["commentList"][0]["nickname"], "李四");
        assert!(json["commentList"][0].get("publishTime").is_some());
    }

    #[test]
    fn deserializes_from_contract_json() {
        let json = r#"{
            "url": "https://example.com/a",
            "title": "t",
            "publishTime": "2024-01-01 00:00:00",
            "author": {"avatar": "", "nickname": "n", "url": ""},
            "contentList": ["p1"],
            "imageList": [],
            "videoList": [],
            "commentCount": 0,
            "commentList": []
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "t");
        assert_eq!(article.content_list, vec!["p1".to_string()]);
        assert!(article.validate().valid);
    }
}
