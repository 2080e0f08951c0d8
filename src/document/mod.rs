// src/document/mod.rs
//! Spreadsheet assembly.
//!
//! Two documents come out of the pipeline:
//! - the *records* sheet (`scrape`): image URL + styled text per record,
//!   which the downloader later reads back;
//! - the *image* sheet (`assemble`): downloaded image embedded next to the
//!   styled text.
//!
//! Both go through [`ods::write_sheet`] with the same [`EmphasisStyle`].

pub mod image;
pub mod ods;

use std::fs;
use std::path::{Path, PathBuf};

pub use image::{EmbeddedImage, ImageSize};
pub use ods::{Cell, Sheet};

use crate::config::consts::*;
use crate::config::options::AssembleOptions;
use crate::core::sanitize::{editable_image_name, url_basename};
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::rich_text::{self, TextSegment};
use crate::specs::kama_sona::ScrapedRecord;

/// The text style applied to every emphasized run of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmphasisStyle {
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
}

impl Default for EmphasisStyle {
    fn default() -> Self {
        Self { name: s!(EMPHASIS_STYLE_NAME), color: s!(EMPHASIS_COLOR) }
    }
}

/// One data row of the image sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputRow {
    pub image: EmbeddedImage,
    pub text: Vec<TextSegment>,
}

pub struct AssembleSummary {
    pub document: PathBuf,
    pub rows: usize,
    pub editable_copies: Vec<PathBuf>,
}

/// Where the downloaded image for `record` is expected.
pub fn local_image_path(images_dir: &Path, record: &ScrapedRecord) -> Result<PathBuf> {
    let name = url_basename(&record.image_url)
        .ok_or_else(|| Error::NoFileName(record.image_url.to_string()))?;
    Ok(images_dir.join(name))
}

/// Pair every record with its local image. A missing file is fatal.
pub fn build_rows(records: &[ScrapedRecord], opts: &AssembleOptions) -> Result<Vec<OutputRow>> {
    records
        .iter()
        .map(|record| {
            let path = local_image_path(&opts.images_dir, record)?;
            if !path.is_file() {
                return Err(Error::MissingImage(path));
            }
            Ok(OutputRow {
                image: EmbeddedImage::new(path, opts.size),
                text: rich_text::to_segments(&record.raw_text),
            })
        })
        .collect()
}

/// Header row, then `[image, text]` per output row, in order.
pub fn image_sheet(rows: &[OutputRow]) -> Sheet {
    let mut sheet = Sheet::with_header(DOCUMENT_TABLE_NAME, &DOCUMENT_HEADERS);
    for row in rows {
        sheet.rows.push(vec![Cell::Image(row.image.clone()), Cell::Rich(row.text.clone())]);
    }
    sheet
}

/// Header row, then `[image URL, text]` per record, in order.
pub fn records_sheet(records: &[ScrapedRecord]) -> Sheet {
    let mut sheet = Sheet::with_header(RECORDS_TABLE_NAME, &RECORDS_HEADERS);
    for record in records {
        sheet.rows.push(vec![
            Cell::Text(record.image_url.to_string()),
            Cell::Rich(rich_text::to_segments(&record.raw_text)),
        ]);
    }
    sheet
}

/// Build the image sheet for `records` and write it to `opts.out_path`.
/// Also copies each image into the editable directory when one is set.
pub fn assemble(
    records: &[ScrapedRecord],
    opts: &AssembleOptions,
    style: &EmphasisStyle,
    mut progress: Option<&mut dyn Progress>,
) -> Result<AssembleSummary> {
    let rows = build_rows(records, opts)?;

    let mut editable_copies = Vec::new();
    if let Some(dir) = &opts.editable_dir {
        fs::create_dir_all(dir)?;
        for (record, row) in records.iter().zip(&rows) {
            let ext = row.image.source.extension().and_then(|e| e.to_str());
            let target = dir.join(editable_image_name(record.index, &record.raw_text, ext));
            fs::copy(&row.image.source, &target)?;
            logd!("Copied {} -> {}", row.image.source.display(), target.display());
            if let Some(p) = progress.as_deref_mut() {
                p.log(&format!("Copied: {} -> {}", row.image.source.display(), target.display()));
            }
            editable_copies.push(target);
        }
    }

    ods::write_sheet(&opts.out_path, &image_sheet(&rows), style)?;
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Spreadsheet written: {}", opts.out_path.display()));
    }

    Ok(AssembleSummary { document: opts.out_path.clone(), rows: rows.len(), editable_copies })
}
