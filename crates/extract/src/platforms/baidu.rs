// ABOUTME: Baidu (baijiahao) article and comment extraction.
// ABOUTME: Leans on data-testid hooks; paragraphs are span.bjh-p, not p tags.

use anyhow::anyhow;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::article::{Article, CommentHarvest};
use crate::error::ExtractError;
use crate::normalize::{format_time, normalize_url};
use crate::page::Page;
use crate::platforms::{self, CommentSelectors, Extractor, ParagraphRules};
use crate::select;

const PLATFORM: &str = "baidu";

// Hashed class names change per deploy; data-testid hooks are stable.
const TITLE: &[&str] = &[".sKHSJ", "h1[class*=\"title\"]", ".article-title", "h1"];
const AUTHOR_LINK: &[&str] = &[
    "a[href*=\"author.baidu.com\"]",
    "a[href*=\"baijiahao\"]",
    "[class*=\"author\"] a",
];
const AUTHOR_NAME: &[&str] = &[
    "p[data-testid=\"author-name\"]",
    "p._2gGWi",
    "[class*=\"author-name\"]",
    "[class*=\"author\"] [class*=\"name\"]",
];
const AUTHOR_AVATAR: &[&str] = &[
    "[class*=\"author\"] img",
    "img[class*=\"avatar\"]",
    "[class*=\"author-info\"] img",
];
const TIME: &[&str] = &[
    "._2sjh9[data-testid=\"updatetime\"]",
    "[data-testid=\"updatetime\"]",
    "[class*=\"time\"]",
    "time",
];
const CONTENT: &[&str] = &[
    "._18p7x[data-testid=\"article\"]",
    "[data-testid=\"article\"]",
    "article",
    ".article-content",
];
const IMAGES: &[&str] = &["img:not([class*=\"avatar\"])", "img"];
const VIDEOS: &[&str] = &["video", "iframe[src*=\"video\"]", "iframe[src*=\"player\"]"];

static PARAGRAPHS: ParagraphRules = ParagraphRules {
    selectors: &["span.bjh-p", "span[class*=\"bjh-\"]", "p"],
    min_chars: 10,
    skip_classes: &[],
    skip_markers: &[],
    stop_markers: &[],
    stop_classes: &[],
};

const COMMENT_COUNT: &[&str] = &[
    ".xcp-publish-title[data-testid=\"xcp-publish-new-title\"]",
    "[data-testid*=\"title\"]",
    "[class*=\"comment\"] [class*=\"title\"]",
];
const COMMENT_ITEMS: &[&str] = &[".xcp-item", "[class*=\"comment-item\"]"];
static COMMENT_FIELDS: CommentSelectors = CommentSelectors {
    avatar: &[".x-avatar-img", "img[class*=\"avatar\"]", "[class*=\"avatar\"]"],
    nickname: &[".user-bar-uname", "[class*=\"uname\"]", "[class*=\"nickname\"]"],
    content: &[".x-interact-rich-text", "[class*=\"rich-text\"]", "[class*=\"content\"]"],
    time: &[".time", "[class*=\"time\"]"],
};

static COMMENT_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"评论\s*(\d+)|(\d+)\s*条").unwrap());

pub struct Baidu;

impl Extractor for Baidu {
    fn crawl_article(&self, page: &Page) -> Result<Article, ExtractError> {
        let root = page.root();
        let mut article = Article::empty();
        article.url = page.url().to_string();

        article.title = select::first_text(root, TITLE).ok_or_else(|| {
            ExtractError::structural_miss(PLATFORM, "crawl_article", Some(anyhow!("title not found")))
        })?;

        if let Some(href) = select::first_attr(root, AUTHOR_LINK, "href") {
            article.author.url = normalize_url(&href, page.url());
        }
        match select::first_text(root, AUTHOR_NAME) {
            Some(name) => article.author.nickname = name,
            None => warn!("author name not found"),
        }
        if let Some(src) = select::first_attr(root, AUTHOR_AVATAR, "src") {
            article.author.avatar = normalize_url(&src, page.url());
        }

        if let Some(time_raw) = select::first_text(root, TIME) {
            article.publish_time = format_time(&time_raw);
        } else {
            warn!("publish time not found");
        }

        let container = select::query_first(root, CONTENT).ok_or_else(|| {
            ExtractError::structural_miss(
                PLATFORM,
                "crawl_article",
                Some(anyhow!("content container not found")),
            )
        })?;

        article.content_list = platforms::collect_paragraphs(container, &PARAGRAPHS, |_, _| false);
        article.image_list = platforms::collect_images(container, page.url(), IMAGES, &[]);
        article.video_list = platforms::collect_videos(container, page.url(), VIDEOS);
        debug!(
            paragraphs = article.content_list.len(),
            images = article.image_list.len(),
            "baidu article extracted"
        );

        let comments = self.crawl_comments(page);
        platforms::finish_article(article, comments, PLATFORM)
    }

    fn crawl_comments(&self, page: &Page) -> CommentHarvest {
        let root = page.root();
        let mut harvest = CommentHarvest::default();

        // Count is rendered as "评论 N" or "N 条" in the section title.
        if let Some(count_text) = select::first_text(root, COMMENT_COUNT) {
            if let Some(caps) = COMMENT_COUNT_RE.captures(&count_text) {
                harvest.count = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0);
            }
        } else {
            warn!("comment count element not found");
        }

        for item in select::query_all(root, COMMENT_ITEMS) {
            if let Some(comment) = platforms::comment_from_item(item, &COMMENT_FIELDS, page.url())
            {
                harvest.list.push(comment);
            }
        }
        harvest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comment_count_parsed_from_section_title() {
        let html = r#"
            <html><body>
            <div class="comment-area">
                <div class="xcp-publish-title" data-testid="xcp-publish-new-title">评论 128</div>
            </div>
            </body></html>
        "#;
        let page = Page::new(html, "https://baijiahao.baidu.com/s?id=1");
        let harvest = Baidu.crawl_comments(&page);
        assert_eq!(harvest.count, 128);
        assert!(harvest.list.is_empty());
    }

    #[test]
    fn background_image_avatar_resolved() {
        let html = r#"
            <html><body>
            <div class="xcp-item">
                <div class="x-avatar-img" style="background-image: url('https://img.example.com/u.png')"></div>
                <span class="user-bar-uname">评论者甲</span>
                <div class="x-interact-rich-text">这条评论写得很有道理。</div>
                <span class="time">3分钟前</span>
            </div>
            </body></html>
        "#;
        let page = Page::new(html, "https://baijiahao.baidu.com/s?id=1");
        let harvest = Baidu.crawl_comments(&page);
        assert_eq!(harvest.list.len(), 1);
        assert_eq!(harvest.list[0].avatar, "https://img.example.com/u.png");
        assert_eq!(harvest.list[0].nickname, "评论者甲");
    }
}
