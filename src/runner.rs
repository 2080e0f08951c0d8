// src/runner.rs
use std::path::PathBuf;

use crate::config::options::AppOptions;
use crate::core::net::Fetch;
use crate::document::{self, ods};
use crate::download::{self, DownloadSummary};
use crate::error::Result;
use crate::progress::Progress;
use crate::specs::kama_sona::{self, ScrapedRecord};

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    /// Per-item download failures; empty for the other stages.
    pub failed: Vec<download::DownloadFailure>,
}

impl From<DownloadSummary> for RunSummary {
    fn from(s: DownloadSummary) -> Self {
        Self { files_written: s.written, failed: s.failed }
    }
}

fn fetch_records(
    opts: &AppOptions,
    fetcher: &dyn Fetch,
    progress: &mut Option<&mut dyn Progress>,
) -> Result<Vec<ScrapedRecord>> {
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Fetching {}", opts.scrape.base_url));
    }
    let records = kama_sona::fetch(fetcher, &opts.scrape.base_url)?;
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Found {} rows", records.len()));
    }
    Ok(records)
}

/// Scrape the page and write the records spreadsheet.
pub fn scrape_records(
    opts: &AppOptions,
    fetcher: &dyn Fetch,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let records = fetch_records(opts, fetcher, &mut progress)?;
    let out = &opts.scrape.records_path;
    ods::write_sheet(out, &document::records_sheet(&records), &opts.style)?;
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Records written: {}", out.display()));
    }
    Ok(RunSummary { files_written: vec![out.clone()], ..Default::default() })
}

/// Read image URLs from the records spreadsheet and download them.
pub fn download_from_records(
    opts: &AppOptions,
    fetcher: &dyn Fetch,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let urls = ods::read_first_column(&opts.scrape.records_path)?;
    logf!("{} image URLs in {}", urls.len(), opts.scrape.records_path.display());
    let summary = download::download_images(fetcher, &urls, &opts.download.images_dir, progress)?;
    Ok(summary.into())
}

/// Scrape the page again and build the image spreadsheet from the local images.
pub fn assemble_document(
    opts: &AppOptions,
    fetcher: &dyn Fetch,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let records = fetch_records(opts, fetcher, &mut progress)?;
    let summary = document::assemble(&records, &opts.assemble, &opts.style, progress)?;
    let mut files_written = vec![summary.document];
    files_written.extend(summary.editable_copies);
    Ok(RunSummary { files_written, ..Default::default() })
}

/// scrape → download → assemble.
pub fn run_all(
    opts: &AppOptions,
    fetcher: &dyn Fetch,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    // Shorten the trait object lifetime so each stage gets its own reborrow.
    let mut total =
        scrape_records(opts, fetcher, progress.as_deref_mut().map(|p| p as &mut dyn Progress))?;
    let downloaded =
        download_from_records(opts, fetcher, progress.as_deref_mut().map(|p| p as &mut dyn Progress))?;
    total.files_written.extend(downloaded.files_written);
    total.failed.extend(downloaded.failed);
    let assembled = assemble_document(opts, fetcher, progress)?;
    total.files_written.extend(assembled.files_written);
    Ok(total)
}
