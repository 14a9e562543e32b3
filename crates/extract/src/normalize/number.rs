// ABOUTME: Count parsing for comment/interaction tallies rendered as text.
// ABOUTME: Handles CJK magnitude suffixes like 1.2万 and falls back to 0.

/// Parses a rendered count such as `"1234"`, `"1.2万"`, or `"评论 56"`.
///
/// Non-numeric characters are stripped before parsing; the first magnitude
/// suffix present (万, 千, 百) scales the value, and the result is floored.
/// Unparseable input yields 0.
pub fn parse_number(text: &str) -> u64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let num: f64 = match cleaned.parse() {
        Ok(n) => n,
        Err(_) => return 0,
    };

    let scaled = if text.contains('万') {
        num * 10_000.0
    } else if text.contains('千') {
        num * 1_000.0
    } else if text.contains('百') {
        num * 100.0
    } else {
        num
    };

    if scaled.is_finite() && scaled >= 0.0 {
        scaled.floor() as u64
    } else {
        0
    }
}
