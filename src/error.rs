// src/error.rs
//! Error type shared by every pipeline stage.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The request never produced a response (DNS, TLS, connection reset, …).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response arrived with a non-success status.
    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(String),

    /// The URL has no path segment to name a local file after.
    #[error("URL has no file name: {0}")]
    NoFileName(String),

    /// The assembler needs the downloaded image on disk.
    #[error("Image not found: {}", .0.display())]
    MissingImage(PathBuf),

    /// The spreadsheet exists but does not look like what we wrote.
    #[error("Malformed document: {0}")]
    Document(String),
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::Xml(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(e.to_string())
    }
}
