// ABOUTME: Publish-time normalization to the canonical "YYYY-MM-DD HH:MM:SS" form.
// ABOUTME: Resolves relative phrases, CJK date glyphs, and loose absolute formats.

//! Publish-time normalization.
//!
//! News sites render timestamps in wildly different shapes: relative phrases
//! ("3分钟前", "刚刚"), CJK-glyph dates ("2024年1月15日 10时30分"), slashed
//! dates, and ISO variants. Everything resolves to local wall-clock time in
//! the canonical `YYYY-MM-DD HH:MM:SS` form. Relative phrases are matched
//! against the raw input before glyph cleanup, since cleanup rewrites the
//! 分 glyph that "X分钟前" depends on.

use chrono::{DateTime, Duration, Local, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_JUST_NOW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)刚刚|just\s*now").unwrap());
static RE_MINUTES_AGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*分钟前|(\d+)\s*minutes?\s*ago").unwrap());
static RE_HOURS_AGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*小时前|(\d+)\s*hours?\s*ago").unwrap());
static RE_DAYS_AGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*天前|(\d+)\s*days?\s*ago").unwrap());
static RE_YESTERDAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)昨天|yesterday").unwrap());
static RE_TODAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)今天|today").unwrap());
static RE_CLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2}):(\d{2})").unwrap());
static RE_ISO_VARIANT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})[/-](\d{1,2})[/-](\d{1,2})(?:\s+(\d{1,2}):(\d{2})(?::(\d{2}))?)?").unwrap()
});

/// Formats a datetime in the canonical form.
pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Normalizes a raw timestamp string relative to the current local time.
///
/// Returns the empty string for empty input, and the glyph-cleaned input
/// unchanged when no interpretation succeeds.
pub fn format_time(raw: &str) -> String {
    format_time_at(raw, Local::now().naive_local())
}

/// [`format_time`] with an explicit "now", for relative-phrase resolution.
pub fn format_time_at(raw: &str, now: NaiveDateTime) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if let Some(resolved) = resolve_relative(raw, now) {
        return resolved;
    }

    // CJK date glyphs become separators; the canonical form is all-numeric.
    let cleaned = raw
        .replace('年', "-")
        .replace('月', "-")
        .replace('日', " ")
        .replace('时', ":")
        .replace('分', ":")
        .replace('秒', "")
        .trim()
        .to_string();

    // Fast path: RFC3339/ISO8601 with offset.
    if let Ok(dt) = DateTime::parse_from_rfc3339(&cleaned) {
        return format_date(&dt.with_timezone(&Local).naive_local());
    }

    const NAIVE_PATTERNS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for pat in NAIVE_PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, pat) {
            return format_date(&dt);
        }
    }

    // ISO variants with single-digit fields or a missing time component.
    if let Some(caps) = RE_ISO_VARIANT.captures(&cleaned) {
        let num = |i: usize| {
            caps.get(i)
                .map(|m| m.as_str().parse::<u32>().unwrap_or(0))
                .unwrap_or(0)
        };
        return format!(
            "{}-{:02}-{:02} {:02}:{:02}:{:02}",
            &caps[1],
            num(2),
            num(3),
            num(4),
            num(5),
            num(6)
        );
    }

    // Last resort for natural/loose formats.
    if let Ok(dt) = dateparser::parse_with_timezone(&cleaned, &Local) {
        return format_date(&dt.with_timezone(&Local).naive_local());
    }

    cleaned
}

fn resolve_relative(raw: &str, now: NaiveDateTime) -> Option<String> {
    if RE_JUST_NOW.is_match(raw) {
        return Some(format_date(&now));
    }

    if let Some(n) = captured_count(&RE_MINUTES_AGO, raw) {
        return Some(format_date(&(now - Duration::minutes(n))));
    }
    if let Some(n) = captured_count(&RE_HOURS_AGO, raw) {
        return Some(format_date(&(now - Duration::hours(n))));
    }
    if let Some(n) = captured_count(&RE_DAYS_AGO, raw) {
        return Some(format_date(&(now - Duration::days(n))));
    }

    if RE_YESTERDAY.is_match(raw) {
        if let Some((hour, minute)) = clock_of(raw) {
            let yesterday = (now - Duration::days(1)).date();
            if let Some(dt) = yesterday.and_hms_opt(hour, minute, 0) {
                return Some(format_date(&dt));
            }
        }
    }
    if RE_TODAY.is_match(raw) {
        if let Some((hour, minute)) = clock_of(raw) {
            if let Some(dt) = now.date().and_hms_opt(hour, minute, 0) {
                return Some(format_date(&dt));
            }
        }
    }

    None
}

fn captured_count(re: &Regex, raw: &str) -> Option<i64> {
    let caps = re.captures(raw)?;
    let m = caps.get(1).or_else(|| caps.get(2))?;
    m.as_str().parse().ok()
}

fn clock_of(raw: &str) -> Option<(u32, u32)> {
    let caps = RE_CLOCK.captures(raw)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(format_time_at("", fixed_now()), "");
        assert_eq!(format_time_at("   ", fixed_now()), "");
    }

    #[test]
    fn just_now_resolves_to_now() {
        assert_eq!(format_time_at("刚刚", fixed_now()), "2024-01-15 12:00:00");
        assert_eq!(format_time_at("just now", fixed_now()), "2024-01-15 12:00:00");
    }

    #[test]
    fn minutes_ago() {
        assert_eq!(format_time_at("3分钟前", fixed_now()), "2024-01-15 11:57:00");
        assert_eq!(
            format_time_at("5 minutes ago", fixed_now()),
            "2024-01-15 11:55:00"
        );
    }

    #[test]
    fn hours_ago() {
        assert_eq!(format_time_at("2小时前", fixed_now()), "2024-01-15 10:00:00");
        assert_eq!(format_time_at("1 hour ago", fixed_now()), "2024-01-15 11:00:00");
    }

    #[test]
    fn days_ago() {
        assert_eq!(format_time_at("3天前", fixed_now()), "2024-01-12 12:00:00");
        assert_eq!(format_time_at("2 days ago", fixed_now()), "2024-01-13 12:00:00");
    }

    #[test]
    fn yesterday_and_today_with_clock() {
        assert_eq!(
            format_time_at("昨天 08:30", fixed_now()),
            "2024-01-14 08:30:00"
        );
        assert_eq!(
            format_time_at("今天 09:05", fixed_now()),
            "2024-01-15 09:05:00"
        );
    }

    #[test]
    fn cjk_glyph_dates() {
        assert_eq!(
            format_time_at("2024年1月15日 10时30分", fixed_now()),
            "2024-01-15 10:30:00"
        );
        assert_eq!(
            format_time_at("2024年01月15日 10时30分45秒", fixed_now()),
            "2024-01-15 10:30:45"
        );
    }

    #[test]
    fn iso_variants_pad_fields() {
        assert_eq!(
            format_time_at("2024/1/5 8:30", fixed_now()),
            "2024-01-05 08:30:00"
        );
        assert_eq!(format_time_at("2024-01-15", fixed_now()), "2024-01-15 00:00:00");
    }

    #[test]
    fn already_canonical_is_stable() {
        assert_eq!(
            format_time_at("2024-01-15 10:30:00", fixed_now()),
            "2024-01-15 10:30:00"
        );
    }

    #[test]
    fn unparseable_returns_cleaned_input() {
        assert_eq!(format_time_at("未知时间", fixed_now()), "未知时间");
    }
}
