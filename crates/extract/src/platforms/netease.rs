// ABOUTME: NetEase (163.com) article and comment extraction.
// ABOUTME: Publish time comes from data-ptime carriers; body truncates at disclaimer markers.

use anyhow::anyhow;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::article::{Article, CommentHarvest};
use crate::error::ExtractError;
use crate::normalize::{format_time, normalize_url, parse_number};
use crate::page::Page;
use crate::platforms::{self, CommentSelectors, Extractor, ParagraphRules};
use crate::select;

const PLATFORM: &str = "netease";

const TITLE: &[&str] = &["h1", ".post_title", ".title", "h1[class*=\"title\"]"];
const TIME_META: &[&str] = &[
    "meta[property=\"article:published_time\"]",
    "meta[name=\"publishdate\"]",
];
const PTIME_CARRIERS: &[&str] = &["#contain[data-ptime]", "[data-ptime]", ".wrapper[data-ptime]"];
const INFO: &[&str] = &[".post_info", ".post-info", ".article-info", "[class*=\"info\"]"];
const INFO_TIME: &[&str] = &[".post_time", "[class*=\"time\"]", "time", "span:first-child"];
const INFO_AUTHOR: &[&str] = &[".post_author", "[class*=\"author\"]", "a"];
// .post_body first: .post_main also spans the recommendation block.
const CONTENT: &[&str] = &[
    ".post_body",
    ".post_text",
    ".post_main",
    "#content",
    "article",
    "[class*=\"content\"]",
];
const IMAGES: &[&str] = &["img:not([src*=\"blank.gif\"])", "img"];
const VIDEOS: &[&str] = &["video", "[class*=\"video\"]", "iframe[src*=\"video\"]"];

static PARAGRAPHS: ParagraphRules = ParagraphRules {
    selectors: &["p:not(.ep-source)", "p"],
    min_chars: 10,
    skip_classes: &["ep-source"],
    skip_markers: &["跟贴", "参与"],
    stop_markers: &[
        "特别声明",
        "Notice: The content above",
        "网友评论仅供",
        "仅提供信息存储服务",
    ],
    stop_classes: &["tie-reminder"],
};

static DATE_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());

const COMMENT_CONTAINER: &[&str] = &["#comment", ".comment-list", "[class*=\"comment\"]"];
const COMMENT_COUNT: &[&str] = &["[class*=\"count\"]", "[class*=\"total\"]", ".title span"];
const COMMENT_ITEMS: &[&str] = &["[class*=\"item\"]", "li", "[class*=\"comment\"]"];
static COMMENT_FIELDS: CommentSelectors = CommentSelectors {
    avatar: &["img[class*=\"avatar\"]", ".avatar img", "img"],
    nickname: &["[class*=\"name\"]", "[class*=\"user\"]", ".nick"],
    content: &["[class*=\"content\"]", "[class*=\"text\"]", ".txt"],
    time: &["[class*=\"time\"]", ".time", "time"],
};

pub struct Netease;

impl Extractor for Netease {
    fn crawl_article(&self, page: &Page) -> Result<Article, ExtractError> {
        let root = page.root();
        let mut article = Article::empty();
        article.url = page.url().to_string();

        article.title = select::first_text(root, TITLE).ok_or_else(|| {
            ExtractError::structural_miss(PLATFORM, "crawl_article", Some(anyhow!("title not found")))
        })?;

        // Time carriers, most reliable first: html/body data attributes,
        // meta tags, data-ptime wrappers, then the visible info line.
        let time_raw = root
            .value()
            .attr("data-publishtime")
            .or_else(|| root.value().attr("data-ptime"))
            .map(str::to_string)
            .or_else(|| {
                select::query_first(root, &["body"])
                    .and_then(|b| b.value().attr("data-ptime").map(str::to_string))
            })
            .or_else(|| select::first_text(root, TIME_META))
            .or_else(|| select::first_attr(root, PTIME_CARRIERS, "data-ptime"))
            .or_else(|| {
                select::query_first(root, INFO)
                    .and_then(|info| select::first_text(info, INFO_TIME))
            });
        match time_raw {
            Some(t) => article.publish_time = format_time(&t),
            None => warn!("publish time not found"),
        }

        if let Some(info) = select::query_first(root, INFO) {
            if let Some(author_el) = select::query_first(info, INFO_AUTHOR) {
                article.author.nickname = select::element_text(author_el);
                if author_el.value().name() == "a" {
                    if let Some(href) = author_el.value().attr("href") {
                        article.author.url = normalize_url(href, page.url());
                    }
                }
            }
        } else {
            warn!("author info block not found");
        }

        let container = select::query_first(root, CONTENT).ok_or_else(|| {
            ExtractError::structural_miss(
                PLATFORM,
                "crawl_article",
                Some(anyhow!("content container not found")),
            )
        })?;

        article.content_list =
            platforms::collect_paragraphs(container, &PARAGRAPHS, |_, text| {
                DATE_LEAD.is_match(text)
            });
        article.image_list =
            platforms::collect_images(container, page.url(), IMAGES, &["blank.gif"]);
        article.video_list = platforms::collect_videos(container, page.url(), VIDEOS);
        debug!(
            paragraphs = article.content_list.len(),
            images = article.image_list.len(),
            videos = article.video_list.len(),
            "netease article extracted"
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
