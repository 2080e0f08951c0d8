// src/specs/kama_sona.rs
//! Scraping spec for the kama sona word table.
//!
//! Row shape: `<tr><td><img src="…svg"></td><td>text with <em>word</em></td>…</tr>`.
//! Only the first `<table>` on the page is read.

use scraper::Html;
use url::Url;

use crate::core::html::{data_cells, first_img_src, first_table, inner_text_keeping, rows};
use crate::core::net::Fetch;
use crate::core::sanitize::normalize_ws;
use crate::error::Result;
use crate::rich_text::InlineTag;

/// One qualifying table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapedRecord {
    /// Position among the extracted records, starting at 0.
    pub index: usize,
    pub image_url: Url,
    /// Cell text with every tag removed except the inline emphasis tags.
    /// Literal `&` and `<` are escaped; read it through [`crate::rich_text`].
    pub raw_text: String,
}

/// GET `base_url` and extract its records.
pub fn fetch(fetcher: &dyn Fetch, base_url: &str) -> Result<Vec<ScrapedRecord>> {
    let base = Url::parse(base_url)?;
    let html_doc = fetcher.get_text(base.as_str())?;
    let records = extract_records(&html_doc, &base);
    logf!("Extracted {} records from {}", records.len(), base);
    Ok(records)
}

/// Read every row of the first table that has at least two `<td>` cells.
pub fn extract_records(html_doc: &str, base_url: &Url) -> Vec<ScrapedRecord> {
    let doc = Html::parse_document(html_doc);
    let Some(table) = first_table(&doc) else {
        logw!("No <table> found on {base_url}");
        return Vec::new();
    };

    let keep: Vec<&str> = InlineTag::ALL.iter().map(|t| t.name()).collect();
    let mut out = Vec::new();

    for (row_no, row) in rows(table).enumerate() {
        let cells = data_cells(row);
        if cells.len() < 2 {
            continue;
        }

        let Some(src) = first_img_src(cells[0]) else {
            logw!("Row {row_no}: no <img src> in first cell, skipped");
            continue;
        };
        let image_url = match base_url.join(src.trim()) {
            Ok(u) => u,
            Err(e) => {
                logw!("Row {row_no}: bad image src {src:?} ({e}), skipped");
                continue;
            }
        };

        let raw_text = normalize_ws(&inner_text_keeping(cells[1], &keep));
        logd!("Row {row_no}: {image_url} | {raw_text}");

        out.push(ScrapedRecord { index: out.len(), image_url, raw_text });
    }

    out
}
