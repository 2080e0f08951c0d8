// src/download.rs
//! Image downloader: one GET per URL, body saved under the URL basename.
//!
//! Each URL stands alone. A bad status, a transport error or a URL without a
//! file name is reported for that URL and the loop moves on; only failing to
//! create the output directory or to write a file aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::core::net::Fetch;
use crate::core::sanitize::url_basename;
use crate::error::{Error, Result};
use crate::progress::Progress;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadFailure {
    pub url: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<DownloadFailure>,
}

/// Download every URL in order into `dir`, creating it if needed.
pub fn download_images<S: AsRef<str>>(
    fetcher: &dyn Fetch,
    urls: &[S],
    dir: &Path,
    mut progress: Option<&mut dyn Progress>,
) -> Result<DownloadSummary> {
    fs::create_dir_all(dir)?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(urls.len());
    }

    let mut summary = DownloadSummary::default();
    for (index, url) in urls.iter().enumerate() {
        let url = url.as_ref();
        match download_one(fetcher, url, dir) {
            Ok(path) => {
                logf!("Downloaded: {url} -> {}", path.display());
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(index, url, &path);
                }
                summary.written.push(path);
            }
            Err(Skip(reason)) => {
                logw!("Failed to download: {url} ({reason})");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(index, url, &reason);
                }
                summary.failed.push(DownloadFailure { url: s!(url), reason });
            }
            Err(Fatal(e)) => {
                if let Some(p) = progress.as_deref_mut() {
                    p.finish();
                }
                return Err(e);
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(summary)
}

/// Outcome of a failed item: skip it, or stop the whole run.
enum ItemError {
    Skip(String),
    Fatal(Error),
}
use ItemError::{Fatal, Skip};

fn download_one(fetcher: &dyn Fetch, url: &str, dir: &Path) -> std::result::Result<PathBuf, ItemError> {
    let parsed = Url::parse(url).map_err(|e| Skip(format!("invalid URL: {e}")))?;
    let name = url_basename(&parsed).ok_or_else(|| Skip(s!("URL has no file name")))?;

    let resp = fetcher.get(parsed.as_str()).map_err(|e| Skip(e.to_string()))?;
    if !resp.is_success() {
        return Err(Skip(format!("HTTP status {}", resp.status)));
    }

    let path = dir.join(name);
    fs::write(&path, &resp.body).map_err(|e| Fatal(Error::Io(e)))?;
    Ok(path)
}
