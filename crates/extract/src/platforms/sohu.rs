// ABOUTME: Sohu (sohu.com) article and comment extraction.
// ABOUTME: The source line doubles as the byline; "返回搜狐" back-link paragraphs are dropped.

use anyhow::anyhow;
use tracing::{debug, warn};

use crate::article::{Article, CommentHarvest};
use crate::error::ExtractError;
use crate::normalize::{clean_text, format_time, normalize_url, parse_number};
use crate::page::Page;
use crate::platforms::{self, CommentSelectors, Extractor, ParagraphRules};
use crate::select;

const PLATFORM: &str = "sohu";

const TITLE: &[&str] = &[".text-title h1", "h1[class*=\"title\"]", "h1.title", "h1"];
const TIME: &[&str] = &["#news-time", ".time", "[class*=\"time\"]", "time"];
const SOURCE: &[&str] = &["[data-role=\"original-link\"]", "[class*=\"source\"]"];
const CONTENT: &[&str] = &[
    "#mp-editor",
    "article.article",
    ".article-content",
    "[class*=\"content\"]",
];
const IMAGES: &[&str] = &[
    "img:not([src*=\"preload.png\"]):not([src*=\"icon_\"]):not([src*=\"logo_sohu\"])",
    "img",
];
const IMAGE_SRC_BLOCKLIST: &[&str] = &["data:image", "preload.png", "icon_", "logo_sohu"];
const VIDEOS: &[&str] = &["video", "iframe[src*=\"video\"]", "[class*=\"video\"]"];

static PARAGRAPHS: ParagraphRules = ParagraphRules {
    selectors: &["p:not([data-role=\"editor-name\"])", "p"],
    min_chars: 10,
    skip_classes: &[],
    skip_markers: &[],
    stop_markers: &[],
    stop_classes: &[],
};

const COMMENT_COUNT: &[&str] = &[".comment-count", "[class*=\"comment-count\"]", "[class*=\"count\"]"];
const COMMENT_ITEMS: &[&str] = &[
    ".comment-item[data-v-586d6cf8]",
    ".comment-item",
    "[class*=\"comment-item\"]",
];
static COMMENT_FIELDS: CommentSelectors = CommentSelectors {
    avatar: &[".left img", "img[class*=\"avatar\"]", ".avatar img", "img"],
    nickname: &[".author-area.name span", "[class*=\"author\"] span", "[class*=\"name\"]"],
    content: &[".comment-content-text", "[class*=\"content-text\"]", "[class*=\"content\"]"],
    // First tag is the timestamp, later tags carry the location.
    time: &[".comment-tag .plain-tag", "[class*=\"tag\"]"],
};

pub struct Sohu;

impl Extractor for Sohu {
    fn crawl_article(&self, page: &Page) -> Result<Article, ExtractError> {
        let root = page.root();
        let mut article = Article::empty();
        article.url = page.url().to_string();

        article.title = select::first_text(root, TITLE).ok_or_else(|| {
            ExtractError::structural_miss(PLATFORM, "crawl_article", Some(anyhow!("title not found")))
        })?;

        if let Some(time_raw) = select::first_text(root, TIME) {
            article.publish_time = format_time(&time_raw);
        } else {
            warn!("publish time not found");
        }

        // The source line stands in for a byline; some pages omit it.
        if let Some(source_el) = select::query_first(root, SOURCE) {
            let raw = select::element_text(source_el);
            article.author.nickname = clean_text(&raw.replace("来源:", "").replace("来源：", ""));
            if source_el.value().name() == "a" {
                if let Some(href) = source_el.value().attr("href") {
                    article.author.url = normalize_url(href, page.url());
                }
            }
        } else {
            warn!("source element not found, defaulting byline");
            article.author.nickname = "Sohu".to_string();
        }

        let container = select::query_first(root, CONTENT).ok_or_else(|| {
            ExtractError::structural_miss(
                PLATFORM,
                "crawl_article",
                Some(anyhow!("content container not found")),
            )
        })?;

        article.content_list = platforms::collect_paragraphs(container, &PARAGRAPHS, |p, _| {
            // Trailing "返回搜狐，查看更多" paragraph carries this anchor.
            select::query_first(p, &["#backsohucom"]).is_some()
        });
        article.image_list =
            platforms::collect_images(container, page.url(), IMAGES, IMAGE_SRC_BLOCKLIST);
        article.video_list = platforms::collect_videos(container, page.url(), VIDEOS);
        debug!(
            paragraphs = article.content_list.len(),
            images = article.image_list.len(),
            "sohu article extracted"
        );

        let comments = self.crawl_comments(page);
        platforms::finish_article(article, comments, PLATFORM)
    }

    fn crawl_comments(&self, page: &Page) -> CommentHarvest {
        let root = page.root();
        let mut harvest = CommentHarvest::default();

        if let Some(count_text) = select::first_text(root, COMMENT_COUNT) {
            harvest.count = parse_number(&count_text);
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
