// ABOUTME: Fallback-chain selector helpers over a cached compiled-selector table.
// ABOUTME: Selectors are tried in order; invalid or non-matching ones are skipped silently.

//! Fallback-chain query helpers.
//!
//! Every extractor locates fields through an ordered list of CSS selectors,
//! tried most-specific-first. This module provides the shared mechanism:
//! the first selector that yields a match (or a non-empty value) wins, and
//! invalid selectors are skipped without error. Selector compilation is
//! cached process-wide since the chains are static per platform.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use crate::normalize::text::clean_text;

/// Thread-safe cache of compiled CSS selectors.
///
/// Invalid selectors are cached as `None` so they are rejected once, not
/// re-parsed on every query.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `Some(Selector)` if the selector is valid, `None` if invalid.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap();
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// Returns the first element matching any selector in the chain, trying
/// selectors in order against the descendants of `root`.
pub fn query_first<'a>(root: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    for &css in selectors {
        let selector = match get_or_compile(css) {
            Some(s) => s,
            None => continue,
        };
        if let Some(el) = root.select(&selector).next() {
            return Some(el);
        }
    }
    None
}

/// Returns all elements from the first selector in the chain that matches
/// at least one element. Later selectors are only consulted when earlier
/// ones match nothing at all.
pub fn query_all<'a>(root: ElementRef<'a>, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    for &css in selectors {
        let selector = match get_or_compile(css) {
            Some(s) => s,
            None => continue,
        };
        let matches: Vec<ElementRef<'a>> = root.select(&selector).collect();
        if !matches.is_empty() {
            return matches;
        }
    }
    Vec::new()
}

/// Returns the cleaned inner text of the first chain match that yields a
/// non-empty value.
///
/// Selectors targeting meta tags (prefixed `meta[`) read the `content`
/// attribute instead of inner text, since meta elements have no text.
pub fn first_text(root: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for &css in selectors {
        let selector = match get_or_compile(css) {
            Some(s) => s,
            None => continue,
        };
        for el in root.select(&selector) {
            let value = if css.starts_with("meta[") {
                el.value().attr("content").map(clean_text).unwrap_or_default()
            } else {
                clean_text(&el.text().collect::<Vec<_>>().join(" "))
            };
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

/// Returns the trimmed value of `attr` from the first chain match that
/// carries a non-empty value for it.
pub fn first_attr(root: ElementRef<'_>, selectors: &[&str], attr: &str) -> Option<String> {
    for &css in selectors {
        let selector = match get_or_compile(css) {
            Some(s) => s,
            None => continue,
        };
        for el in root.select(&selector) {
            if let Some(value) = el.value().attr(attr) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

/// Reads the inner text of a single element, cleaned.
pub fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <meta name="author" content="  Jane Doe  ">
            <title>Test Page</title>
        </head>
        <body>
            <h1>  Main   Title  </h1>
            <h2>Subtitle</h2>
            <div class="empty"></div>
            <p class="intro">Hello world</p>
            <ul class="items">
                <li>Item One</li>
                <li>Item Two</li>
            </ul>
            <img class="hero" src="/images/hero.jpg" alt="Hero">
            <img class="thumb" src="">
        </body>
        </html>
    "#;

    fn doc() -> Html {
        Html::parse_document(SAMPLE_HTML)
    }

    #[test]
    fn first_match_wins_in_declared_order() {
        let doc = doc();
        let root = doc.root_element();
        let el = query_first(root, &["h1", "h2"]).unwrap();
        assert_eq!(element_text(el), "Main Title");
    }

    #[test]
    fn falls_back_past_missing_and_invalid_selectors() {
        let doc = doc();
        let root = doc.root_element();
        let text = first_text(root, &["[[[broken", ".nonexistent", "p.intro"]);
        assert_eq!(text.as_deref(), Some("Hello world"));
    }

    #[test]
    fn first_text_skips_empty_elements() {
        let doc = doc();
        let root = doc.root_element();
        let text = first_text(root, &["div.empty", "p.intro"]);
        assert_eq!(text.as_deref(), Some("Hello world"));
    }

    #[test]
    fn first_text_reads_meta_content() {
        let doc = doc();
        let root = doc.root_element();
        let text = first_text(root, &["meta[name=\"author\"]", "p.intro"]);
        assert_eq!(text.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn query_all_returns_matches_of_winning_selector_only() {
        let doc = doc();
        let root = doc.root_element();
        let items = query_all(root, &["ul.items li", "p"]);
        assert_eq!(items.len(), 2);
        assert_eq!(element_text(items[0]), "Item One");
        assert_eq!(element_text(items[1]), "Item Two");
    }

    #[test]
    fn query_all_empty_when_nothing_matches() {
        let doc = doc();
        let root = doc.root_element();
        assert!(query_all(root, &["article", "section"]).is_empty());
    }

    #[test]
    fn first_attr_skips_empty_values() {
        let doc = doc();
        let root = doc.root_element();
        // img.thumb has an empty src; chain should move on to img.hero
        let src = first_attr(root, &["img.thumb", "img.hero"], "src");
        assert_eq!(src.as_deref(), Some("/images/hero.jpg"));
    }

    #[test]
    fn invalid_selector_is_cached_as_none() {
        assert!(get_or_compile("[[[invalid").is_none());
        assert!(get_or_compile("[[[invalid").is_none());
        assert!(get_or_compile("div.container").is_some());
    }
}
