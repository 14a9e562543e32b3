// ABOUTME: China Daily (chinadaily.com.cn) article and comment extraction.
// ABOUTME: Meta tags carry time/author on most pages; the site name is the byline fallback.

use anyhow::anyhow;
use tracing::{debug, warn};

use crate::article::{Article, CommentHarvest};
use crate::error::ExtractError;
use crate::normalize::{format_time, normalize_url, parse_number};
use crate::page::Page;
use crate::platforms::{self, CommentSelectors, Extractor, ParagraphRules};
use crate::select;

const PLATFORM: &str = "chinadaily";

// .Artical_Title itself wraps ad slots; only its h1 is the headline.
const TITLE: &[&str] = &[
    ".Artical_Title h1",
    "h1",
    ".article-title",
    ".title",
    "h1[class*=\"title\"]",
];
const TIME_META: &[&str] = &[
    "meta[name=\"publishdate\"]",
    "meta[property=\"article:published_time\"]",
];
const DATE: &[&str] = &[
    ".Artical_Share_Date",
    "[class*=\"Date\"]",
    "[class*=\"date\"]",
    "[class*=\"time\"]",
    "time",
];
const INFO: &[&str] = &[".info", ".article-info", ".Artical_Info", "[class*=\"info\"]"];
const INFO_TIME: &[&str] = &["[class*=\"time\"]", ".date", "time", "span"];
const AUTHOR_META: &[&str] = &["meta[name=\"author\"]"];
const INFO_AUTHOR: &[&str] = &["[class*=\"author\"]", "[class*=\"source\"]", "a", "span"];
const CONTENT: &[&str] = &[
    "#Content",
    ".Artical_Content",
    ".Artical_Body_Left",
    "article",
    "[class*=\"article-content\"]",
    "[class*=\"content\"]",
];
const IMAGES: &[&str] = &["img"];
const VIDEOS: &[&str] = &["video", "iframe[src*=\"video\"]", "[class*=\"video\"]"];

static PARAGRAPHS: ParagraphRules = ParagraphRules {
    selectors: &["p:not(.source)", "p"],
    min_chars: 10,
    skip_classes: &["source"],
    skip_markers: &[],
    stop_markers: &[],
    stop_classes: &[],
};

const COMMENT_CONTAINER: &[&str] = &["#comment", "[class*=\"comment\"]", "[id*=\"comment\"]"];
const COMMENT_COUNT: &[&str] = &["[class*=\"count\"]", "[class*=\"total\"]", "[class*=\"num\"]"];
const COMMENT_ITEMS: &[&str] = &["[class*=\"item\"]", "li", "[class*=\"comment\"]"];
static COMMENT_FIELDS: CommentSelectors = CommentSelectors {
    avatar: &["img[class*=\"avatar\"]", ".avatar img", "img"],
    nickname: &["[class*=\"name\"]", "[class*=\"user\"]", "[class*=\"author\"]"],
    content: &["[class*=\"content\"]", "[class*=\"text\"]", "p"],
    time: &["[class*=\"time\"]", ".time", "time"],
};

pub struct ChinaDaily;

impl Extractor for ChinaDaily {
    fn crawl_article(&self, page: &Page) -> Result<Article, ExtractError> {
        let root = page.root();
        let mut article = Article::empty();
        article.url = page.url().to_string();

        article.title = select::first_text(root, TITLE).ok_or_else(|| {
            ExtractError::structural_miss(PLATFORM, "crawl_article", Some(anyhow!("title not found")))
        })?;

        let time_raw = select::first_text(root, TIME_META)
            .or_else(|| select::first_text(root, DATE))
            .or_else(|| {
                select::query_first(root, INFO)
                    .and_then(|info| select::first_text(info, INFO_TIME))
            });
        match time_raw {
            Some(t) => article.publish_time = format_time(&t),
            None => warn!("publish time not found"),
        }

        if let Some(name) = select::first_text(root, AUTHOR_META) {
            article.author.nickname = name;
        } else if let Some(info) = select::query_first(root, INFO) {
            if let Some(author_el) = select::query_first(info, INFO_AUTHOR) {
                article.author.nickname = select::element_text(author_el);
                if author_el.value().name() == "a" {
                    if let Some(href) = author_el.value().attr("href") {
                        article.author.url = normalize_url(href, page.url());
                    }
                }
            }
        }
        if article.author.nickname.is_empty() {
            article.author.nickname = "China Daily".to_string();
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
            "chinadaily article extracted"
        );

        let comments = self.crawl_comments(page);
        platforms::finish_article(article, comments, PLATFORM)
    }

    fn crawl_comments(&self, page: &Page) -> CommentHarvest {
        let root = page.root();
        let mut harvest = CommentHarvest::default();

        let Some(container) = select::query_first(root, COMMENT_CONTAINER) else {
            warn!("comment container not found");
            return harvest;
        };

        if let Some(count_text) = select::first_text(container, COMMENT_COUNT) {
            harvest.count = parse_number(&count_text);
        }

        for item in select::query_all(container, COMMENT_ITEMS) {
            if let Some(comment) = platforms::comment_from_item(item, &COMMENT_FIELDS, page.url())
            {
                harvest.list.push(comment);
            }
        }
        harvest
    }
}
