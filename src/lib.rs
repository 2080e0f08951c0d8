// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod document;
pub mod download;
pub mod error;
pub mod log;
pub mod progress;
pub mod rich_text;
pub mod runner;
pub mod specs;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
