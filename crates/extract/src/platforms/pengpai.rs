// ABOUTME: Pengpai / The Paper (thepaper.cn) article and comment extraction.
// ABOUTME: Ant-design comment markup; comment time shares its line with a location, split on ∙.

use anyhow::anyhow;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::article::{Article, Comment, CommentHarvest};
use crate::error::ExtractError;
use crate::normalize::{format_time, normalize_url};
use crate::page::Page;
use crate::platforms::{self, Extractor, ParagraphRules};
use crate::select;

const PLATFORM: &str = "pengpai";

const TITLE: &[&str] = &["h1.index_title__B8mhI", "h1[class*=\"title\"]", "h1.title", "h1"];
const AUTHOR: &[&str] = &[
    ".index_left__LfzyH > div:first-child",
    "[class*=\"author\"]",
    "[class*=\"left\"] > div:first-child",
];
const TIME: &[&str] = &[
    ".ant-space-item span",
    "[class*=\"space-item\"] span",
    "[class*=\"time\"]",
    "time",
];
const CONTENT: &[&str] = &[
    ".index_cententWrap__Jv8jK",
    "[class*=\"contentWrap\"]",
    "[class*=\"content\"]",
    "article",
];
const IMAGES: &[&str] = &["img[data-imageid]", "img"];
const VIDEOS: &[&str] = &["video", "iframe[src*=\"video\"]", "[class*=\"video\"]"];

// Image captions render as paragraphs too; any other non-empty text counts.
static PARAGRAPHS: ParagraphRules = ParagraphRules {
    selectors: &["p:not(.image_desc)", "p"],
    min_chars: 0,
    skip_classes: &["image_desc"],
    skip_markers: &[],
    stop_markers: &[],
    stop_classes: &[],
};

const COMMENT_COUNT: &[&str] = &[
    ".index_commentNumSpan__jE6dy",
    "[class*=\"commentNumSpan\"]",
    "[class*=\"comment-count\"]",
];
const COMMENT_ITEMS: &[&str] = &[
    ".ant-comment.index_costomComment__b6gaa",
    ".ant-comment",
    "[class*=\"comment\"]",
];
const USER_LINK: &[&str] = &["a[href*=\"/user_\"]", "[class*=\"avatar\"] a", "a"];
const USER_AVATAR: &[&str] = &[".ant-avatar img", "img[class*=\"avatar\"]", "img"];
const NICKNAME: &[&str] = &[
    ".ant-comment-content-author-name a",
    "[class*=\"author-name\"] a",
    "[class*=\"nickname\"]",
];
const COMMENT_CONTENT: &[&str] = &[
    ".index_content__g237N",
    "[class*=\"content\"]",
    ".ant-comment-content-detail",
];
const COMMENT_TIME: &[&str] = &[
    ".ant-space-item div",
    "[class*=\"space-item\"] div",
    "[class*=\"time\"]",
];

static COMMENT_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((\d+)\)").unwrap());

pub struct Pengpai;

fn comment_from_item(item: scraper::ElementRef<'_>, base: &str) -> Option<Comment> {
    let avatar = select::query_first(item, USER_LINK)
        .and_then(|link| select::first_attr(link, USER_AVATAR, "src"))
        .map(|src| normalize_url(&src, base))
        .unwrap_or_default();

    let nickname = select::first_text(item, NICKNAME).unwrap_or_default();
    let content = select::first_text(item, COMMENT_CONTENT).unwrap_or_default();

    // "08-12 10:30 ∙ 上海" style line: time first, location after the dot.
    let publish_time = select::first_text(item, COMMENT_TIME)
        .map(|line| format_time(line.split(" ∙ ").next().unwrap_or("").trim()))
        .unwrap_or_default();

    if nickname.is_empty() || content.is_empty() {
        warn!("dropping incomplete comment item");
        return None;
    }
    Some(Comment::new(avatar, nickname, publish_time, content, Vec::new()))
}

impl Extractor for Pengpai {
    fn crawl_article(&self, page: &Page) -> Result<Article, ExtractError> {
        let root = page.root();
        let mut article = Article::empty();
        article.url = page.url().to_string();

        article.title = select::first_text(root, TITLE).ok_or_else(|| {
            ExtractError::structural_miss(PLATFORM, "crawl_article", Some(anyhow!("title not found")))
        })?;

        match select::first_text(root, AUTHOR) {
            Some(name) => article.author.nickname = name,
            None => warn!("author not found"),
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
            "pengpai article extracted"
        );

        let comments = self.crawl_comments(page);
        platforms::finish_article(article, comments, PLATFORM)
    }

    fn crawl_comments(&self, page: &Page) -> CommentHarvest {
        let root = page.root();
        let mut harvest = CommentHarvest::default();

        if let Some(count_text) = select::first_text(root, COMMENT_COUNT) {
            if let Some(caps) = COMMENT_COUNT_RE.captures(&count_text) {
                harvest.count = caps[1].parse().unwrap_or(0);
            }
        } else {
            warn!("comment count element not found");
        }

        for item in select::query_all(root, COMMENT_ITEMS) {
            if let Some(comment) = comment_from_item(item, page.url()) {
                harvest.list.push(comment);
            }
        }
        harvest
    }
}
