// src/rich_text.rs
//! Inline emphasis markup → styled text runs.
//!
//! Scraped cell text is plain text with `<em>…</em>` left in place (every
//! other tag is stripped by the extractor). This module turns that string
//! into an ordered list of [`TextSegment`]s that the document writer emits
//! as plain text and styled spans.
//!
//! ## Rules
//! - The tag vocabulary is closed: only [`InlineTag`] names are tags.
//!   Anything else that looks like markup (`<b>`, `a < b`, `<em/>`) is text.
//! - Tag names match ASCII case-insensitively; an opening tag may carry
//!   attributes (`<em class="x">`), a closing tag may not.
//! - Open/close tags are paired with a stack. A tag without a partner is
//!   kept verbatim as literal text, in place.
//! - Text inside at least one matched pair is emphasized. Nested pairs do
//!   not stack up; emphasis is on/off.
//! - Adjacent segments of the same kind are merged and empty ones dropped,
//!   so the output never alternates needlessly.
//! - Literal text escapes `&` as `&amp;` and `<` as `&lt;` (see
//!   [`escape_text`]); segments hold the unescaped text. Any other `&` is
//!   left as it is.
//! - Concatenating every segment's content gives the input minus the
//!   matched tags, unescaped.
//! - With nothing to split, the result is one `Plain` segment equal to the
//!   unescaped input. An input that strips down to nothing gives one empty `Plain`.

use std::borrow::Cow;

/// Inline tags the converter understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InlineTag {
    Em,
}

impl InlineTag {
    pub const ALL: [InlineTag; 1] = [InlineTag::Em];

    pub fn name(self) -> &'static str {
        match self {
            InlineTag::Em => "em",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

/// Lexical unit of the input. Tag tokens keep their raw source so an
/// unmatched tag can be restored exactly as written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Open(InlineTag, &'a str),
    Close(InlineTag, &'a str),
}

/// A run of text, emphasized or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextSegment {
    Plain(String),
    Emphasized(String),
}

impl TextSegment {
    pub fn content(&self) -> &str {
        match self {
            TextSegment::Plain(s) | TextSegment::Emphasized(s) => s,
        }
    }

    pub fn is_emphasized(&self) -> bool {
        matches!(self, TextSegment::Emphasized(_))
    }

    fn new(content: String, emphasized: bool) -> Self {
        if emphasized { TextSegment::Emphasized(content) } else { TextSegment::Plain(content) }
    }
}

/// Split `input` into text and recognised tag tokens.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0usize;
    let mut i = 0usize;

    while let Some(rel) = input[i..].find('<') {
        let lt = i + rel;
        match parse_tag(&input[lt..]) {
            Some((closing, tag, len)) => {
                if lt > text_start {
                    tokens.push(Token::Text(&input[text_start..lt]));
                }
                let raw = &input[lt..lt + len];
                tokens.push(if closing { Token::Close(tag, raw) } else { Token::Open(tag, raw) });
                i = lt + len;
                text_start = i;
            }
            None => i = lt + 1,
        }
    }
    if text_start < input.len() {
        tokens.push(Token::Text(&input[text_start..]));
    }
    tokens
}

/// `s` starts at a `<`. Returns (is_closing, tag, byte length of the tag).
fn parse_tag(s: &str) -> Option<(bool, InlineTag, usize)> {
    let bytes = s.as_bytes();
    let mut pos = 1;
    let closing = bytes.get(pos) == Some(&b'/');
    if closing {
        pos += 1;
    }
    let name_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_alphanumeric() {
        pos += 1;
    }
    let tag = InlineTag::from_name(&s[name_start..pos])?;

    match *bytes.get(pos)? {
        b'>' => Some((closing, tag, pos + 1)),
        b if b.is_ascii_whitespace() => {
            let rest = &s[pos..];
            let gt = rest.find('>')?;
            let attrs = &rest[..gt];
            if attrs.contains('<') || (closing && !attrs.trim().is_empty()) {
                return None;
            }
            Some((closing, tag, pos + gt + 1))
        }
        _ => None,
    }
}

/// Convert marked-up text into ordered segments. See the module docs.
pub fn to_segments(input: &str) -> Vec<TextSegment> {
    let tokens = tokenize(input);

    let mut matched = vec![false; tokens.len()];
    let mut open: Vec<(usize, InlineTag)> = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        match *tok {
            Token::Open(tag, _) => open.push((i, tag)),
            Token::Close(tag, _) => {
                if let Some(&(o, top)) = open.last() {
                    if top == tag {
                        open.pop();
                        matched[o] = true;
                        matched[i] = true;
                    }
                }
            }
            Token::Text(_) => {}
        }
    }

    let mut out = SegmentBuf::default();
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate() {
        match *tok {
            Token::Text(t) => out.push(&unescape_text(t), depth > 0),
            Token::Open(_, raw) | Token::Close(_, raw) if !matched[i] => out.push(raw, depth > 0),
            Token::Open(..) => depth += 1,
            Token::Close(..) => depth = depth.saturating_sub(1),
        }
    }

    let segments = out.finish();
    if segments.is_empty() {
        // Empty input, or nothing but matched empty pairs.
        vec![TextSegment::Plain(s!())]
    } else {
        segments
    }
}

/// The input with matched emphasis tags removed.
pub fn plain_text(input: &str) -> String {
    to_segments(input).iter().map(TextSegment::content).collect()
}

/// Escape literal text so none of it can be read back as a tag.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_text(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        if let Some(after) = tail.strip_prefix("&amp;") {
            out.push('&');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("&lt;") {
            out.push('<');
            rest = after;
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[derive(Default)]
struct SegmentBuf {
    done: Vec<TextSegment>,
    current: String,
    emphasized: bool,
}

impl SegmentBuf {
    fn push(&mut self, text: &str, emphasized: bool) {
        if text.is_empty() {
            return;
        }
        if emphasized != self.emphasized {
            self.flush();
            self.emphasized = emphasized;
        }
        self.current.push_str(text);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let content = std::mem::take(&mut self.current);
            self.done.push(TextSegment::new(content, self.emphasized));
        }
    }

    fn finish(mut self) -> Vec<TextSegment> {
        self.flush();
        self.done
    }
}
