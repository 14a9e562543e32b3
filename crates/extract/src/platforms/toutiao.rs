// ABOUTME: Toutiao (toutiao.com) article and comment extraction.
// ABOUTME: Meta block carries time/author/avatar; comments carry one reply level per item.

use anyhow::anyhow;
use tracing::{debug, warn};

use crate::article::{Article, Comment, CommentHarvest};
use crate::error::ExtractError;
use crate::normalize::{format_time, normalize_url, parse_number};
use crate::page::Page;
use crate::platforms::{self, CommentSelectors, Extractor, ParagraphRules};
use crate::select;

const PLATFORM: &str = "toutiao";

const TITLE: &[&str] = &["article h1", ".article-content h1", "h1.title", "h1"];
const META: &[&str] = &[".article-meta", ".article-info", "[class*=\"meta\"]"];
const META_TIME: &[&str] = &[
    "span[class*=\"time\"]",
    "time",
    "span:first-child",
    "[class*=\"date\"]",
];
const META_AUTHOR: &[&str] = &["a[class*=\"name\"]", ".name a", "a[class*=\"author\"]"];
const META_AVATAR: &[&str] = &["img[class*=\"avatar\"]", ".avatar img", "img"];
const CONTENT: &[&str] = &[
    "article.syl-article-base",
    "article[class*=\"article\"]",
    ".article-content",
    "article",
];
const IMAGES: &[&str] = &["img:not([class*=\"avatar\"])", "img"];
const VIDEOS: &[&str] = &[
    "video",
    "iframe[src*=\"video\"]",
    "iframe[src*=\"player\"]",
    "[class*=\"video\"]",
];

static PARAGRAPHS: ParagraphRules = ParagraphRules {
    selectors: &["p:not([class*=\"page-br\"]):not([class*=\"copyright\"])", "p"],
    min_chars: 0,
    skip_classes: &[],
    skip_markers: &[],
    stop_markers: &[],
    stop_classes: &[],
};

const COMMENT_COUNT: &[&str] = &[
    "[class*=\"comment\"] [class*=\"title\"] span",
    ".ttp-comment-wrapper .title span",
    "[class*=\"comment-count\"]",
];
const COMMENT_ITEMS: &[&str] = &[
    ".comment-list > li",
    "[class*=\"comment-list\"] > li",
    "[class*=\"comment-item\"]",
];
static COMMENT_FIELDS: CommentSelectors = CommentSelectors {
    avatar: &["img[class*=\"avatar\"]", ".ttp-avatar img", ".user-avatar img", "img"],
    nickname: &[
        "[class*=\"user-name\"] [class*=\"name\"]",
        ".user-name .name",
        "[class*=\"nickname\"]",
        "a[class*=\"name\"]",
    ],
    content: &[
        "[class*=\"body\"] [class*=\"content\"]",
        ".body .content",
        ".comment-content",
        "[class*=\"comment-text\"]",
    ],
    time: &["[class*=\"footer\"] [class*=\"time\"]", ".footer .time", "time", "[class*=\"time\"]"],
};
const REPLY_ITEMS: &[&str] = &[
    "[class*=\"reply-list\"] > li",
    ".reply-list > li",
    "[class*=\"sub-comment\"]",
];
static REPLY_FIELDS: CommentSelectors = CommentSelectors {
    avatar: &["img[class*=\"avatar\"]", "img"],
    nickname: &["[class*=\"name\"]"],
    content: &["[class*=\"content\"]"],
    time: &["[class*=\"time\"]", "time"],
};

pub struct Toutiao;

impl Extractor for Toutiao {
    fn crawl_article(&self, page: &Page) -> Result<Article, ExtractError> {
        let root = page.root();
        let mut article = Article::empty();
        article.url = page.url().to_string();

        article.title = select::first_text(root, TITLE).ok_or_else(|| {
            ExtractError::structural_miss(PLATFORM, "crawl_article", Some(anyhow!("title not found")))
        })?;

        if let Some(meta) = select::query_first(root, META) {
            if let Some(time_raw) = select::first_text(meta, META_TIME) {
                article.publish_time = format_time(&time_raw);
            }
            if let Some(author_el) = select::query_first(meta, META_AUTHOR) {
                article.author.nickname = select::element_text(author_el);
                if let Some(href) = author_el.value().attr("href") {
                    article.author.url = normalize_url(href, page.url());
                }
            }
            if let Some(src) = select::first_attr(meta, META_AVATAR, "src") {
                article.author.avatar = normalize_url(&src, page.url());
            }
        } else {
            warn!("article meta block not found");
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
            "toutiao article extracted"
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
            let Some(mut comment) =
                platforms::comment_from_item(item, &COMMENT_FIELDS, page.url())
            else {
                continue;
            };
            let replies: Vec<Comment> = select::query_all(item, REPLY_ITEMS)
                .into_iter()
                .filter_map(|reply| {
                    platforms::comment_from_item(reply, &REPLY_FIELDS, page.url())
                })
                .collect();
            comment.children = replies;
            harvest.list.push(comment);
        }
        harvest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replies_attached_to_parent_comment() {
        let html = r#"
            <html><body>
            <div class="ttp-comment-wrapper"><div class="title">评论 <span>88</span></div></div>
            <ul class="comment-list">
                <li>
                    <img class="user-avatar-img avatar" src="https://p.example.com/u1.png">
                    <div class="user-name"><span class="name">头条用户甲</span></div>
                    <div class="body"><div class="content">主评论内容在这里。</div></div>
                    <div class="footer"><span class="time">2小时前</span></div>
                    <ul class="reply-list">
                        <li>
                            <span class="name">头条用户乙</span>
                            <div class="content">回复的内容在这里。</div>
                        </li>
                    </ul>
                </li>
            </ul>
            </body></html>
        "#;
        let page = Page::new(html, "https://www.toutiao.com/article/1234567890/");
        let harvest = Toutiao.crawl_comments(&page);
        assert_eq!(harvest.count, 88);
        assert_eq!(harvest.list.len(), 1);
        assert_eq!(harvest.list[0].nickname, "头条用户甲");
        assert_eq!(harvest.list[0].children.len(), 1);
        assert_eq!(harvest.list[0].children[0].nickname, "头条用户乙");
    }
}
