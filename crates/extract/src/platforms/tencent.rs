// ABOUTME: Tencent News (qq.com /omn/ and /rain/) article and comment extraction.
// ABOUTME: Comments form a tree: top-level items carry one level of replies in a sub container.

use anyhow::anyhow;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use tracing::{debug, warn};

use crate::article::{Article, Comment, CommentHarvest};
use crate::error::ExtractError;
use crate::normalize::{format_time, normalize_url, parse_number};
use crate::page::Page;
use crate::platforms::{self, Extractor, ParagraphRules};
use crate::select;

const PLATFORM: &str = "tencent";

const TITLE: &[&str] = &[".content-article h1", "h1[class*=\"title\"]", "h1.title", "h1"];
const AUTHOR_INFO: &[&str] = &[
    "#article-author",
    "[class*=\"author-info\"]",
    "[class*=\"article-info\"]",
];
const AUTHOR_NAME: &[&str] = &[".media-name", "[class*=\"media-name\"]", "[class*=\"author-name\"]"];
const AUTHOR_AVATAR: &[&str] = &["img[class*=\"avatar\"]", ".avatar img", "img"];
const MEDIA_META: &[&str] = &[".media-meta", "[class*=\"meta\"]"];
const META_TIME: &[&str] = &["span:first-child", "span", "[class*=\"time\"]"];
const CONTENT: &[&str] = &[
    "#article-content",
    "[class*=\"article-content\"]",
    ".content-article",
    "article",
];
const IMAGES: &[&str] = &[
    "img.qnt-img-img",
    "img.qnr-img-lazy-load-img",
    "img:not([class*=\"loading\"])",
];
const IMAGE_SRC_BLOCKLIST: &[&str] = &["newsapp_bt/0/", "loading"];
const VIDEO_CONTAINERS: &[&str] = &[".videoPlayer", "[class*=\"video-player\"]", "[class*=\"video\"]"];
const VIDEO_POSTER: &[&str] = &["img.txp_poster_img", "img[class*=\"poster\"]", "img"];

static PARAGRAPHS: ParagraphRules = ParagraphRules {
    selectors: &["p"],
    min_chars: 10,
    skip_classes: &[],
    skip_markers: &[],
    stop_markers: &[],
    stop_classes: &[],
};

const COMMENT_CONTAINER: &[&str] = &[
    "#qqcom-comment",
    "[class*=\"qqcom-comment\"]",
    "[class*=\"comment\"]",
];
const COMMENT_COUNT: &[&str] = &[
    ".qqcom-comment-count span",
    "[class*=\"comment-count\"] span",
    "[class*=\"count\"]",
];
const COMMENT_BODY: &[&str] = &[".qnc-comment", "[class*=\"comment\"]"];
const SUB_COMMENTS: &[&str] = &[".qqcom-sub-comment", "[class*=\"sub-comment\"]"];
const COMMENT_AVATAR: &[&str] = &[
    ".qnt-author-info-author-img",
    "img[class*=\"avatar\"]",
    ".avatar img",
    "img",
];
const COMMENT_NICKNAME: &[&str] = &[
    ".qnc-comment__nickname",
    "[class*=\"nickname\"]",
    "[class*=\"name\"]",
];
const COMMENT_CONTENT: &[&str] = &[
    ".qnc-emoji-text-parser.qnc-comment__content",
    ".qnc-comment__content",
    "[class*=\"content\"]",
];
const COMMENT_TIME: &[&str] = &[
    ".qnc-comment__time-location",
    "[class*=\"time-location\"]",
    "[class*=\"time\"]",
];

static TIME_LOCATION_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[•·]").unwrap());

pub struct Tencent;

fn in_video_player(p: ElementRef<'_>) -> bool {
    p.ancestors().filter_map(ElementRef::wrap).any(|a| {
        platforms::has_class(a, "videoPlayer") || platforms::has_class(a, "txp_controls")
    })
}

/// Reads one comment body (main or reply). Nickname and content are
/// required; the location part of the time line is discarded.
fn comment_fields(body: ElementRef<'_>, base: &str) -> Option<Comment> {
    let avatar = platforms::first_avatar(body, COMMENT_AVATAR, base);
    let nickname = select::first_text(body, COMMENT_NICKNAME).unwrap_or_default();
    let content = select::first_text(body, COMMENT_CONTENT).unwrap_or_default();
    let publish_time = select::first_text(body, COMMENT_TIME)
        .map(|line| {
            let last = TIME_LOCATION_SPLIT
                .split(&line)
                .last()
                .unwrap_or("")
                .trim()
                .to_string();
            format_time(&last)
        })
        .unwrap_or_default();

    if nickname.is_empty() || content.is_empty() {
        warn!("dropping incomplete comment item");
        return None;
    }
    Some(Comment::new(avatar, nickname, publish_time, content, Vec::new()))
}

/// Direct children of the comment container that are comment items.
/// Scoping to direct children keeps reply items from being double-counted.
fn top_level_items<'a>(container: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().classes().any(|c| c.contains("comment-item")))
        .collect()
}

impl Extractor for Tencent {
    fn crawl_article(&self, page: &Page) -> Result<Article, ExtractError> {
        let root = page.root();
        let mut article = Article::empty();
        article.url = page.url().to_string();

        article.title = select::first_text(root, TITLE).ok_or_else(|| {
            ExtractError::structural_miss(PLATFORM, "crawl_article", Some(anyhow!("title not found")))
        })?;

        if let Some(info) = select::query_first(root, AUTHOR_INFO) {
            match select::first_text(info, AUTHOR_NAME) {
                Some(name) => article.author.nickname = name,
                None => warn!("author name not found"),
            }
            if let Some(src) = select::first_attr(info, AUTHOR_AVATAR, "src") {
                article.author.avatar = normalize_url(&src, page.url());
            }
            if let Some(meta) = select::query_first(info, MEDIA_META) {
                if let Some(time_raw) = select::first_text(meta, META_TIME) {
                    article.publish_time = format_time(&time_raw);
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
            platforms::collect_paragraphs(container, &PARAGRAPHS, |p, _| in_video_player(p));
        article.image_list =
            platforms::collect_images(container, page.url(), IMAGES, IMAGE_SRC_BLOCKLIST);

        // Videos sit inside player containers; the poster is a sibling img
        // of the video element, not an attribute on it.
        for player in select::query_all(container, VIDEO_CONTAINERS) {
            let Some(el) = select::query_first(player, &["video", "iframe"]) else {
                continue;
            };
            if let Some(mut video) = crate::normalize::extract_video(el, page.url()) {
                if video.poster.is_empty() {
                    if let Some(src) = select::first_attr(player, VIDEO_POSTER, "src") {
                        video.poster = normalize_url(&src, page.url());
                    }
                }
                article.video_list.push(video);
            }
        }
        debug!(
            paragraphs = article.content_list.len(),
            images = article.image_list.len(),
            videos = article.video_list.len(),
            "tencent article extracted"
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

        for item in top_level_items(container) {
            let Some(body) = select::query_first(item, COMMENT_BODY) else {
                warn!("comment item without a body element");
                continue;
            };
            let Some(mut comment) = comment_fields(body, page.url()) else {
                continue;
            };

            if let Some(sub) = select::query_first(item, SUB_COMMENTS) {
                for reply_body in select::query_all(sub, COMMENT_BODY) {
                    if let Some(reply) = comment_fields(reply_body, page.url()) {
                        comment.children.push(reply);
                    }
                }
            }
            harvest.list.push(comment);
        }
        harvest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COMMENTS_HTML: &str = r#"
        <html><body>
        <div id="qqcom-comment">
            <div class="qqcom-comment-count">评论 <span>2.1万</span></div>
            <div class="qqcom-comment-item">
                <div class="qnc-comment">
                    <img class="qnt-author-info-author-img" src="https://img.example.com/a.png">
                    <span class="qnc-comment__nickname">用户甲</span>
                    <div class="qnc-emoji-text-parser qnc-comment__content">这是第一条主评论。</div>
                    <div class="qnc-comment__time-location">广东 • 2小时前</div>
                </div>
                <div class="qqcom-sub-comment">
                    <div class="qqcom-comment-item">
                        <div class="qnc-comment">
                            <span class="qnc-comment__nickname">用户乙</span>
                            <div class="qnc-comment__content">这是第一条回复。</div>
                        </div>
                    </div>
                    <div class="qqcom-comment-item">
                        <div class="qnc-comment">
                            <span class="qnc-comment__nickname">用户丙</span>
                            <div class="qnc-comment__content">这是第二条回复。</div>
                        </div>
                    </div>
                </div>
            </div>
            <div class="qqcom-comment-item">
                <div class="qnc-comment">
                    <span class="qnc-comment__nickname">用户丁</span>
                    <div class="qnc-comment__content">这是第二条主评论。</div>
                </div>
            </div>
        </div>
        </body></html>
    "#;

    #[test]
    fn comment_tree_keeps_reply_order() {
        let page = Page::new(COMMENTS_HTML, "https://news.qq.com/rain/a/20240115A01");
        let harvest = Tencent.crawl_comments(&page);
        assert_eq!(harvest.count, 21000);
        assert_eq!(harvest.list.len(), 2);
        assert_eq!(harvest.list[0].nickname, "用户甲");
        let replies: Vec<&str> = harvest.list[0]
            .children
            .iter()
            .map(|c| c.nickname.as_str())
            .collect();
        assert_eq!(replies, vec!["用户乙", "用户丙"]);
        assert!(harvest.list[1].children.is_empty());
    }

    #[test]
    fn time_taken_after_location_separator() {
        let page = Page::new(COMMENTS_HTML, "https://news.qq.com/rain/a/20240115A01");
        let harvest = Tencent.crawl_comments(&page);
        // "广东 • 2小时前" resolves the part after the separator
        assert!(harvest.list[0].publish_time.len() == 19);
        assert_eq!(harvest.list[0].avatar, "https://img.example.com/a.png");
    }

    #[test]
    fn player_paragraphs_excluded() {
        let html = r#"
            <html><body>
            <div class="content-article"><h1>腾讯测试标题</h1></div>
            <div id="article-author">
                <span class="media-name">腾讯新闻</span>
                <div class="media-meta"><span>2024-01-15 10:30</span></div>
            </div>
            <div id="article-content">
                <p>这是一段正常的正文内容，长度超过十个字符。</p>
                <div class="videoPlayer"><p>视频加载失败，请刷新页面后重试。</p></div>
            </div>
            </body></html>
        "#;
        let page = Page::new(html, "https://news.qq.com/rain/a/20240115A01");
        let article = Tencent.crawl_article(&page).unwrap();
        assert_eq!(
            article.content_list,
            vec!["这是一段正常的正文内容，长度超过十个字符。".to_string()]
        );
    }
}
