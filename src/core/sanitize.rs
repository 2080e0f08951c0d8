// src/core/sanitize.rs
use sanitize_filename::{sanitize_with_options, Options};
use url::Url;

use crate::rich_text;

/// Collapse runs of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Make `name` safe as a single path component on every platform.
/// Covers separators, `? * " < > | :`, control characters, Windows
/// reserved names and trailing dots/spaces; truncates to 255 bytes.
pub fn safe_file_name(name: &str) -> String {
    sanitize_with_options(name, Options { windows: true, truncate: true, replacement: "" })
}

/// Local file name for a downloaded image: the URL's last non-empty path
/// segment, made filesystem-safe. `None` when the URL has no such segment.
pub fn url_basename(url: &Url) -> Option<String> {
    let last = url.path_segments()?.rev().find(|seg| !seg.is_empty())?;
    let name = safe_file_name(last);
    if name.is_empty() { None } else { Some(name) }
}

/// Longest single path component most filesystems accept, in bytes.
const MAX_NAME_BYTES: usize = 255;

/// Name of the editable copy of an image: `"<index> <text>"` with emphasis
/// markers dropped, `:` shown as `,`, and everything else unsafe removed.
/// The stem is cut short so the name with its extension fits in 255 bytes.
pub fn editable_image_name(index: usize, raw_text: &str, ext: Option<&str>) -> String {
    let text = rich_text::plain_text(raw_text).replace(':', ",");
    // Removing unsafe characters can leave double spaces behind.
    let stem = normalize_ws(&safe_file_name(&format!("{index} {text}")));
    match ext {
        Some(ext) if !ext.is_empty() => {
            let budget = MAX_NAME_BYTES.saturating_sub(ext.len() + 1);
            format!("{}.{ext}", truncate_stem(&stem, budget))
        }
        _ => stem,
    }
}

/// At most `max` bytes of `s`, cut on a char boundary, without the trailing
/// spaces or dots Windows refuses.
fn truncate_stem(s: &str, max: usize) -> &str {
    let mut end = s.len().min(max);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].trim_end_matches([' ', '.'])
}
