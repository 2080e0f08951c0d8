// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;
use crate::document::{EmphasisStyle, ImageSize};

#[derive(Clone, Debug, PartialEq, Default)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub download: DownloadOptions,
    pub assemble: AssembleOptions,
    pub style: EmphasisStyle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Page holding the word table. Relative image paths resolve against it.
    pub base_url: String,
    /// Records spreadsheet written by `scrape` and read by `download`.
    pub records_path: PathBuf,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            records_path: PathBuf::from(DEFAULT_RECORDS_FILE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadOptions {
    pub images_dir: PathBuf,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self { images_dir: PathBuf::from(DEFAULT_IMAGES_DIR) }
    }
}

/// How the assembler decides the displayed size of an embedded image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizePolicy {
    /// Every image gets the same frame.
    Fixed(ImageSize),
    /// Read the size from the image itself, using `fallback` when that fails.
    Detect { fallback: ImageSize },
}

impl Default for SizePolicy {
    fn default() -> Self {
        SizePolicy::Fixed(ImageSize::square(FALLBACK_IMAGE_PX))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssembleOptions {
    /// Where the downloaded images are looked up by URL basename.
    pub images_dir: PathBuf,
    pub out_path: PathBuf,
    /// `None` skips the editable copies.
    pub editable_dir: Option<PathBuf>,
    pub size: SizePolicy,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            out_path: PathBuf::from(DEFAULT_DOCUMENT_FILE),
            editable_dir: Some(PathBuf::from(DEFAULT_EDITABLE_DIR)),
            size: SizePolicy::default(),
        }
    }
}
