// ABOUTME: The Page snapshot extractors operate on: parsed DOM plus the page URL.
// ABOUTME: Byte input is charset-decoded (meta charset, then chardetng) before parsing.

//! Page snapshots.
//!
//! Extraction operates on a rendered-HTML snapshot paired with the page URL.
//! The URL matters twice: platform detection matches against it, and
//! relative media URLs resolve against it. Pages fetched as raw bytes go
//! through charset decoding first, since several supported sites still
//! serve GBK.

use scraper::{ElementRef, Html};

/// A parsed page snapshot.
pub struct Page {
    doc: Html,
    url: String,
}

impl Page {
    /// Parses an HTML string into a page snapshot.
    pub fn new(html: &str, url: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
            url: url.to_string(),
        }
    }

    /// Decodes raw HTML bytes and parses them.
    ///
    /// Decoding order: a `<meta charset>` / http-equiv declaration found in
    /// the byte stream, then chardetng detection over the whole body.
    pub fn from_bytes(bytes: &[u8], url: &str) -> Self {
        Self::new(&decode_html(bytes), url)
    }

    /// The page URL extraction resolves relative links against.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The document root, the element all selector chains start from.
    pub fn root(&self) -> ElementRef<'_> {
        self.doc.root_element()
    }
}

/// Decodes an HTML byte stream to a string.
fn decode_html(bytes: &[u8]) -> String {
    if let Some(charset) = sniff_meta_charset(bytes) {
        if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
            let (decoded, _, _) = encoding.decode(bytes);
            return decoded.into_owned();
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// Sniffs a charset declaration out of the head of the byte stream.
///
/// Charset names are ASCII, so scanning a lossy-decoded prefix is safe even
/// when the body itself is not UTF-8.
fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(2048)];
    let text = String::from_utf8_lossy(head).to_lowercase();

    let idx = text.find("charset=")?;
    let rest = &text[idx + "charset=".len()..];
    let charset: String = rest
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if charset.is_empty() {
        None
    } else {
        Some(charset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select;

    #[test]
    fn utf8_page_parses() {
        let page = Page::new(
            "<html><body><h1>标题</h1></body></html>",
            "https://www.example.com/a.html",
        );
        assert_eq!(page.url(), "https://www.example.com/a.html");
        let title = select::first_text(page.root(), &["h1"]);
        assert_eq!(title.as_deref(), Some("标题"));
    }

    #[test]
    fn gbk_bytes_decode_via_meta_charset() {
        let html = "<html><head><meta charset=\"gbk\"></head><body><h1>中文标题</h1></body></html>";
        let (encoded, _, _) = encoding_rs::GBK.encode(html);
        let page = Page::from_bytes(&encoded, "https://www.example.com/a.html");
        let title = select::first_text(page.root(), &["h1"]);
        assert_eq!(title.as_deref(), Some("中文标题"));
    }

    #[test]
    fn gbk_bytes_decode_via_detection_without_declaration() {
        let html = "<html><body><p>没有声明编码的中文正文内容，足够长以便检测。</p></body></html>";
        let (encoded, _, _) = encoding_rs::GBK.encode(html);
        let page = Page::from_bytes(&encoded, "https://www.example.com/a.html");
        let text = select::first_text(page.root(), &["p"]);
        assert_eq!(
            text.as_deref(),
            Some("没有声明编码的中文正文内容，足够长以便检测。")
        );
    }

    #[test]
    fn sniffs_http_equiv_declaration() {
        let bytes =
            b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=gb2312\">";
        assert_eq!(sniff_meta_charset(bytes).as_deref(), Some("gb2312"));
    }
}
