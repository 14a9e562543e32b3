// ABOUTME: Content-media filtering: turns img/video/iframe elements into Image/Video records.
// ABOUTME: Rejects UI chrome, tiny images, placeholders, and non-video iframes.

//! Content-media extraction.
//!
//! Body markup mixes real content media with UI chrome: avatars, logos,
//! lazy-load placeholders, ad slots. These helpers accept an element and
//! either produce a normalized record or reject it as non-content.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use scraper::ElementRef;

use crate::article::{Image, Video};
use crate::normalize::text::clean_text;
use crate::normalize::url::normalize_url;
use crate::select;

/// Class names marking an image as UI chrome rather than content.
/// Matched against individual class names exactly, not as substrings.
const IMAGE_SKIP_CLASSES: &[&str] = &[
    "avatar",
    "logo",
    "icon",
    "emoji",
    "qrcode",
    "ad",
    "banner",
    "placeholder",
    "blank",
    "button",
    "nav",
];

/// Class names marking a video slot as an ad.
const VIDEO_SKIP_CLASSES: &[&str] = &["ad", "advertisement", "banner", "promo"];

/// Lazy-load attributes tried after `src`, in priority order.
const LAZY_SRC_ATTRS: &[&str] = &["src", "data-src", "data-original", "data-lazy-src"];

static PLACEHOLDER_SRC: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["blank.gif", "placeholder", "loading.gif", "data:image/svg"]).unwrap()
});

/// Substrings identifying an iframe as a video embed. Anything else is
/// assumed to be a widget or ad frame.
static VIDEO_IFRAME_MARKERS: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["video", "player", "v.qq.com", "youtube", "youku", "bilibili"]).unwrap()
});

fn has_skip_class(el: ElementRef<'_>, skip: &[&str]) -> bool {
    el.value()
        .classes()
        .any(|c| skip.contains(&c.to_ascii_lowercase().as_str()))
}

fn first_src_attr(el: ElementRef<'_>) -> Option<String> {
    for attr in LAZY_SRC_ATTRS {
        if let Some(v) = el.value().attr(attr) {
            let v = v.trim();
            if !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }
    None
}

fn parse_dimension(value: Option<&str>) -> u64 {
    value
        .map(|v| {
            v.trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

/// Turns an `<img>` element into an [`Image`], or rejects it as non-content.
///
/// Rejection reasons: a UI-chrome class, both dimensions declared with either
/// under 50px, no usable source attribute, or a known placeholder source.
pub fn extract_image(el: ElementRef<'_>, base: &str) -> Option<Image> {
    if has_skip_class(el, IMAGE_SKIP_CLASSES) {
        return None;
    }

    let width = parse_dimension(el.value().attr("width"));
    let height = parse_dimension(el.value().attr("height"));
    // Undeclared dimensions are kept; only a known-small image is chrome.
    if width > 0 && height > 0 && (width < 50 || height < 50) {
        return None;
    }

    let src = first_src_attr(el)?;
    if PLACEHOLDER_SRC.is_match(&src) {
        return None;
    }

    let alt = el
        .value()
        .attr("alt")
        .filter(|v| !v.trim().is_empty())
        .or_else(|| el.value().attr("title"))
        .unwrap_or("");

    Some(Image {
        src: normalize_url(&src, base),
        alt: clean_text(alt),
        width,
        height,
    })
}

/// Turns a `<video>`, `<iframe>`, or wrapper element into a [`Video`], or
/// rejects it as an ad slot or non-video frame.
///
/// Wrapper elements are searched for an inner `<video>` first, then an inner
/// `<source>`. Iframes must carry a recognized video-host marker in their
/// source URL.
pub fn extract_video(el: ElementRef<'_>, base: &str) -> Option<Video> {
    if has_skip_class(el, VIDEO_SKIP_CLASSES) {
        return None;
    }

    let mut poster = String::new();
    let mut duration = 0;
    let mut title = String::new();
    let src;

    match el.value().name() {
        "video" => {
            src = first_src_attr(el)?;
            poster = el.value().attr("poster").unwrap_or("").to_string();
            duration = parse_dimension(el.value().attr("duration"));
            title = el.value().attr("title").unwrap_or("").to_string();
        }
        "iframe" => {
            src = el.value().attr("src").filter(|v| !v.is_empty())?.to_string();
            title = el.value().attr("title").unwrap_or("").to_string();
            if !VIDEO_IFRAME_MARKERS.is_match(&src) {
                return None;
            }
        }
        _ => {
            if let Some(inner) = select::query_first(el, &["video"]) {
                return extract_video(inner, base);
            }
            let source = select::query_first(el, &["source"])?;
            src = first_src_attr(source)?;
        }
    }

    if src.is_empty() {
        return None;
    }

    Some(Video {
        src: normalize_url(&src, base),
        poster: normalize_url(&poster, base),
        duration,
        title: clean_text(&title),
    })
}
