// src/specs/mod.rs
//! # Page scrapers
//!
//! Page-specific extraction. Each module knows *where the data lives in the HTML*
//! of one page and how to read it tolerantly; it does not decide where the
//! result is written or whether images get downloaded.
//!
//! ## Conventions
//! - Pure parsing is split from fetching so it can be tested offline against
//!   captured markup.
//! - Missing pieces inside one row skip that row (with a log line); a page
//!   without the expected table yields an empty result, not an error.
//! - Only the page fetch itself can fail.
//!
//! ## Pages
//! - `kama_sona` – the word table: one image + one description per row.
pub mod kama_sona;
