// ABOUTME: Normalization utilities shared by all platform extractors.
// ABOUTME: Text cleanup, time formatting, URL resolution, count parsing, and media filtering.

//! Shared normalization utilities.
//!
//! Platform extractors never emit raw DOM values; everything passes through
//! these helpers so that titles, timestamps, URLs, counts, and media records
//! come out in one canonical shape regardless of source-site conventions.

pub mod media;
pub mod number;
pub mod text;
pub mod time;
pub mod url;

pub use media::{extract_image, extract_video};
pub use number::parse_number;
pub use text::clean_text;
pub use time::{format_date, format_time, format_time_at};
pub use url::normalize_url;
