// ABOUTME: Text cleanup for extracted DOM strings.
// ABOUTME: Collapses whitespace runs (including non-breaking spaces) and trims.

/// Cleans a raw DOM text value: every whitespace run, including non-breaking
/// spaces, collapses to a single ASCII space, and the result is trimmed.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(clean_text("  hello \t\n  world  "), "hello world");
    }

    #[test]
    fn replaces_non_breaking_spaces() {
        assert_eq!(clean_text("正文\u{00A0}\u{00A0}内容"), "正文 内容");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   \n\t  "), "");
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(clean_text("已经干净"), "已经干净");
    }

    #[test]
    fn idempotent() {
        let once = clean_text("  a \u{00A0} b\n c ");
        assert_eq!(clean_text(&once), once);
    }
}
