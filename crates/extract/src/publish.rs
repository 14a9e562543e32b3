// ABOUTME: Editor publishing: renders an Article into the payload an editor page gets filled with.
// ABOUTME: Carries per-editor selector chains as data; the DOM-filling host glue is external.

//! Publishing payloads.
//!
//! Publishing targets a platform's article editor. This module builds the
//! fill payload (title plus paragraph HTML) and records, per editor, the
//! selector chains the host-side glue uses to locate the title input and
//! the content editor. Driving the live editor itself is out of scope.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::article::Article;
use crate::error::ExtractError;

/// What gets pushed into an editor: the title and the body rendered as
/// paragraph markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorFill {
    pub title: String,
    pub body_html: String,
}

/// A publishing target.
pub trait Publisher: Send + Sync {
    /// Builds the editor fill payload for this target.
    fn publish(&self, article: &Article) -> Result<EditorFill, ExtractError>;
}

/// A concrete editor described by its selector chains.
pub struct EditorPublisher {
    platform: &'static str,
    /// Chains for the title input field, tried in order by the host glue.
    pub title_selectors: &'static [&'static str],
    /// Chains for the rich-text content editor.
    pub editor_selectors: &'static [&'static str],
}

/// WeChat Official Account editor (UEditor based).
pub static WEIXIN_EDITOR: EditorPublisher = EditorPublisher {
    platform: "weixin",
    title_selectors: &["#title", ".title-input", "input[placeholder*=\"标题\"]"],
    editor_selectors: &["#ueditor_0", ".edui-body-container", ".editor-content"],
};

/// Toutiao creator editor (Quill based).
pub static TOUTIAO_EDITOR: EditorPublisher = EditorPublisher {
    platform: "toutiao",
    title_selectors: &[".title-input", "input[placeholder*=\"标题\"]"],
    editor_selectors: &[".ql-editor", ".editor-container"],
};

/// Last-resort profile for unrecognized editor pages.
pub static GENERIC_EDITOR: EditorPublisher = EditorPublisher {
    platform: "generic",
    title_selectors: &["input[type=\"text\"]", ".title-input"],
    editor_selectors: &[".editor", "[contenteditable=\"true\"]"],
};

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

impl Publisher for EditorPublisher {
    fn publish(&self, article: &Article) -> Result<EditorFill, ExtractError> {
        if article.title.is_empty() && article.content_list.is_empty() {
            return Err(ExtractError::unsupported(
                self.platform,
                "publish",
                Some(anyhow!("article has neither title nor content")),
            ));
        }

        let body_html = article
            .content_list
            .iter()
            .map(|p| format!("<p>{}</p>", escape_html(p)))
            .collect::<String>();

        Ok(EditorFill {
            title: article.title.clone(),
            body_html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article_with(title: &str, paragraphs: &[&str]) -> Article {
        let mut article = Article::empty();
        article.title = title.to_string();
        article.content_list = paragraphs.iter().map(|s| s.to_string()).collect();
        article
    }

    #[test]
    fn paragraphs_rendered_in_order() {
        let article = article_with("标题", &["第一段", "第二段"]);
        let fill = WEIXIN_EDITOR.publish(&article).unwrap();
        assert_eq!(fill.title, "标题");
        assert_eq!(fill.body_html, "<p>第一段</p><p>第二段</p>");
    }

    #[test]
    fn markup_in_paragraphs_escaped() {
        let article = article_with("t", &["a < b & c > d"]);
        let fill = TOUTIAO_EDITOR.publish(&article).unwrap();
        assert_eq!(fill.body_html, "<p>a &lt; b &amp; c &gt; d</p>");
    }

    #[test]
    fn empty_article_rejected() {
        let err = GENERIC_EDITOR.publish(&Article::empty()).unwrap_err();
        assert!(err.is_unsupported());
    }
}
