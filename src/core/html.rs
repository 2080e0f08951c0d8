// src/core/html.rs
// DOM helpers on top of `scraper`. Tag names are compared ASCII case-insensitively.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::rich_text;

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("BUG: hardcoded selector 'table' is invalid"));
static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("BUG: hardcoded selector 'tr' is invalid"));
static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("BUG: hardcoded selector 'img' is invalid"));

/// First `<table>` in document order, if any.
pub fn first_table(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&TABLE).next()
}

/// Every `<tr>` below `table`, in document order.
pub fn rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    table.select(&ROW)
}

/// Direct `<td>` children of a row. Header `<th>` cells are not counted.
pub fn data_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name().eq_ignore_ascii_case("td"))
        .collect()
}

/// `src` of the first `<img>` inside `cell`.
pub fn first_img_src<'a>(cell: ElementRef<'a>) -> Option<&'a str> {
    cell.select(&IMG).next()?.value().attr("src")
}

/// Flatten the inner markup of `el` to text, dropping every tag except the
/// ones named in `keep`, which are re-emitted bare (`<em>…</em>`).
/// Text nodes come out decoded and then re-escaped with
/// [`rich_text::escape_text`], so a literal `<em>` in the page stays text.
pub fn inner_text_keeping(el: ElementRef<'_>, keep: &[&str]) -> String {
    let mut out = s!();
    push_flat(el, keep, &mut out);
    out
}

fn push_flat(el: ElementRef<'_>, keep: &[&str], out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(&rich_text::escape_text(text));
            continue;
        }
        let Some(child_el) = ElementRef::wrap(child) else { continue };
        let name = child_el.value().name();
        let kept = keep.iter().find(|k| k.eq_ignore_ascii_case(name));
        if let Some(tag) = kept {
            out.push('<');
            out.push_str(tag);
            out.push('>');
        }
        push_flat(child_el, keep, out);
        if let Some(tag) = kept {
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}
