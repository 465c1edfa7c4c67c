//! Display helpers for chat output.

use std::sync::LazyLock;

use regex::Regex;

/// Ellipsis appended by [`truncate`].
pub const ELLIPSIS: char = '…';

static IMAGE_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.*?\]\(.*?\)").expect("valid image markup regex"));

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));

/// Limit `text` to `n` characters.
///
/// Text of at most `n` characters is returned unchanged; longer text keeps
/// its first `n - 1` characters followed by [`ELLIPSIS`]. Lengths count
/// Unicode scalar values, not bytes. `n == 0` yields an empty string.
pub fn truncate(text: &str, n: usize) -> String {
    match text.char_indices().nth(n) {
        None => text.to_string(),
        Some(_) if n == 0 => String::new(),
        Some(_) => {
            let cut = text
                .char_indices()
                .nth(n - 1)
                .map_or(text.len(), |(idx, _)| idx);
            let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
            out.push_str(&text[..cut]);
            out.push(ELLIPSIS);
            out
        }
    }
}

/// Strip markdown images and bare URLs, then trim surrounding whitespace.
pub fn clean_text_summary(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_images = IMAGE_MARKUP.replace_all(text, "");
    let without_urls = BARE_URL.replace_all(&without_images, "");
    without_urls.trim().to_string()
}
