// ABOUTME: Main library entry point for the newsclip article extraction core.
// ABOUTME: Re-exports the public API: Page, Article, Registry, Extractor, ExtractError, bridge types.

//! newsclip - article extraction and normalization for Chinese news platforms.
//!
//! This crate turns the rendered DOM of a supported news page into a single
//! normalized [`Article`]: title, byline, publish time, body paragraphs,
//! content images/videos, and the rendered comment subset. Eight platforms
//! are supported through per-platform selector fallback chains; a
//! [`Registry`] detects which platform owns a URL and dispatches extraction
//! and publish-payload calls.
//!
//! # Example
//!
//! ```no_run
//! use newsclip_extract::{Page, Registry};
//!
//! let html = std::fs::read_to_string("article.html").unwrap();
//! let page = Page::new(&html, "https://www.163.com/news/article/ABC123.html");
//! let registry = Registry::builtin();
//! let (info, article) = registry.crawl_article(&page).unwrap();
//! println!("{}: {}", info.platform_name, article.title);
//! ```

pub mod article;
pub mod bridge;
pub mod error;
pub mod normalize;
pub mod page;
pub mod platforms;
pub mod publish;
pub mod registry;
pub mod select;

pub use crate::article::{Article, Author, Comment, CommentHarvest, Image, Validation, Video};
pub use crate::bridge::{handle, BridgeRequest, BridgeResponse, PlatformInfo, SubmitPayload};
pub use crate::error::{ErrorCode, ExtractError};
pub use crate::page::Page;
pub use crate::platforms::Extractor;
pub use crate::publish::{EditorFill, Publisher};
pub use crate::registry::{Platform, Registry};
