// ABOUTME: URL normalization to absolute form.
// ABOUTME: Handles protocol-relative prefixes and resolves relative paths against a base.

use url::Url;

/// Normalizes a possibly-relative URL to absolute form.
///
/// Absolute URLs pass through untouched, protocol-relative URLs (`//host/x`)
/// get an `https:` scheme, and anything else is resolved against `base`.
/// When resolution fails or no base is given, the input comes back unchanged.
pub fn normalize_url(url: &str, base: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }

    if url.starts_with("//") {
        return format!("https:{}", url);
    }

    if !base.is_empty() {
        if let Ok(resolved) = Url::parse(base).and_then(|b| b.join(url)) {
            return resolved.to_string();
        }
    }

    url.to_string()
}
