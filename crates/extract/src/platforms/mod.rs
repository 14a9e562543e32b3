// ABOUTME: The Extractor trait plus shared paragraph/media/comment collection helpers.
// ABOUTME: Per-platform modules hold only selector chains and platform-specific steps.

//! Platform extractors.
//!
//! Each supported news site gets a stateless unit struct implementing
//! [`Extractor`]. The per-platform modules carry ordered selector chains as
//! data; the mechanics of walking paragraphs, filtering media, and
//! harvesting comment items live here and are shared.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use tracing::warn;

use crate::article::{Article, Comment, CommentHarvest};
use crate::error::ExtractError;
use crate::normalize::media::{extract_image, extract_video};
use crate::normalize::time::format_time;
use crate::normalize::url::normalize_url;
use crate::page::Page;
use crate::select;

pub mod baidu;
pub mod chinadaily;
pub mod netease;
pub mod pengpai;
pub mod sohu;
pub mod tencent;
pub mod toutiao;

pub use baidu::Baidu;
pub use chinadaily::ChinaDaily;
pub use netease::Netease;
pub use pengpai::Pengpai;
pub use sohu::Sohu;
pub use tencent::Tencent;
pub use toutiao::Toutiao;

/// A platform-specific article extractor.
///
/// Implementations are stateless; all context comes from the [`Page`].
pub trait Extractor: Send + Sync {
    /// Extracts the full article. Fails on structural misses (title or
    /// content container absent) and on schema violations; partial data
    /// elsewhere degrades to field defaults with a warning.
    fn crawl_article(&self, page: &Page) -> Result<Article, ExtractError>;

    /// Harvests the rendered comment subset. Never fails; an unrecognized
    /// comment area yields an empty harvest.
    fn crawl_comments(&self, page: &Page) -> CommentHarvest;
}

/// Paragraph collection rules for one platform's content container.
pub(crate) struct ParagraphRules {
    /// Fallback chain for paragraph elements inside the container.
    pub selectors: &'static [&'static str],
    /// Paragraphs must exceed this many characters (0 = any non-empty).
    pub min_chars: usize,
    /// Exact class names whose paragraphs are dropped.
    pub skip_classes: &'static [&'static str],
    /// Substrings whose paragraphs are dropped.
    pub skip_markers: &'static [&'static str],
    /// Substrings that end the article body; everything after is dropped.
    pub stop_markers: &'static [&'static str],
    /// Class names that end the article body.
    pub stop_classes: &'static [&'static str],
}

pub(crate) fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Walks the container's paragraphs in document order, applying the rules
/// plus an extra per-platform predicate (return true to drop).
pub(crate) fn collect_paragraphs(
    container: ElementRef<'_>,
    rules: &ParagraphRules,
    skip_extra: impl Fn(ElementRef<'_>, &str) -> bool,
) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut stopped = false;

    for p in select::query_all(container, rules.selectors) {
        let text = select::element_text(p);

        let at_boundary = rules.stop_markers.iter().any(|m| text.contains(m))
            || rules.stop_classes.iter().any(|c| has_class(p, c));
        if at_boundary {
            stopped = true;
        }
        if stopped {
            continue;
        }

        if text.chars().count() <= rules.min_chars {
            continue;
        }
        if rules.skip_classes.iter().any(|c| has_class(p, c)) {
            continue;
        }
        if rules.skip_markers.iter().any(|m| text.contains(m)) {
            continue;
        }
        if skip_extra(p, &text) {
            continue;
        }

        paragraphs.push(text);
    }

    paragraphs
}

/// Candidate source attributes checked when pre-filtering images, a superset
/// of what `extract_image` itself reads (NetEase uses `data-echo`).
const IMAGE_SRC_ATTRS: &[&str] = &["src", "data-src", "data-original", "data-lazy-src", "data-echo"];

fn candidate_src(el: ElementRef<'_>) -> Option<String> {
    for attr in IMAGE_SRC_ATTRS {
        if let Some(v) = el.value().attr(attr) {
            let v = v.trim();
            if !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }
    None
}

/// Collects content images from the container, skipping sources that carry
/// any platform-specific blocklist marker.
pub(crate) fn collect_images(
    container: ElementRef<'_>,
    base: &str,
    selectors: &[&str],
    src_blocklist: &[&str],
) -> Vec<crate::article::Image> {
    let mut images = Vec::new();
    for img in select::query_all(container, selectors) {
        if let Some(src) = candidate_src(img) {
            if src_blocklist.iter().any(|m| src.contains(m)) {
                continue;
            }
        }
        if let Some(image) = extract_image(img, base) {
            images.push(image);
        }
    }
    images
}

/// Collects content videos from the container.
pub(crate) fn collect_videos(
    container: ElementRef<'_>,
    base: &str,
    selectors: &[&str],
) -> Vec<crate::article::Video> {
    let mut videos = Vec::new();
    for el in select::query_all(container, selectors) {
        if let Some(video) = extract_video(el, base) {
            videos.push(video);
        }
    }
    videos
}

/// Per-item selector chains for a platform's comment markup.
pub(crate) struct CommentSelectors {
    pub avatar: &'static [&'static str],
    pub nickname: &'static [&'static str],
    pub content: &'static [&'static str],
    pub time: &'static [&'static str],
}

static BACKGROUND_IMAGE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"url\(['"]?(.+?)['"]?\)"#).unwrap());

/// Resolves a comment avatar. The matched element is usually an `<img>`,
/// but some platforms (Baidu) render avatars as a background image on a div.
pub(crate) fn first_avatar(item: ElementRef<'_>, selectors: &[&str], base: &str) -> String {
    let Some(el) = select::query_first(item, selectors) else {
        return String::new();
    };
    if el.value().name() == "img" {
        return el
            .value()
            .attr("src")
            .map(|src| normalize_url(src, base))
            .unwrap_or_default();
    }
    let style = el.value().attr("style").unwrap_or("");
    BACKGROUND_IMAGE_URL
        .captures(style)
        .map(|caps| normalize_url(&caps[1], base))
        .unwrap_or_default()
}

/// Builds a comment from one item element using the generic chains.
///
/// Returns None (and warns) when nickname or content is missing; the caller
/// drops the item and keeps going.
pub(crate) fn comment_from_item(
    item: ElementRef<'_>,
    sel: &CommentSelectors,
    base: &str,
) -> Option<Comment> {
    let avatar = first_avatar(item, sel.avatar, base);
    let nickname = select::first_text(item, sel.nickname).unwrap_or_default();
    let content = select::first_text(item, sel.content).unwrap_or_default();
    let publish_time = select::first_text(item, sel.time)
        .map(|t| format_time(&t))
        .unwrap_or_default();

    if nickname.is_empty() || content.is_empty() {
        warn!("dropping incomplete comment item");
        return None;
    }
    Some(Comment::new(avatar, nickname, publish_time, content, Vec::new()))
}

/// Finishes an article: attaches the comment harvest and runs validation,
/// turning any violation into a fatal schema error.
pub(crate) fn finish_article(
    mut article: Article,
    comments: CommentHarvest,
    platform: &str,
) -> Result<Article, ExtractError> {
    article.set_comments(comments);
    let validation = article.validate();
    if !validation.valid {
        return Err(ExtractError::schema_violation(
            platform,
            "crawl_article",
            &validation.errors,
        ));
    }
    Ok(article)
}
