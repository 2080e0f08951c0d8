// src/cli.rs
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::WrapErr;

use crate::config::options::{AppOptions, SizePolicy};
use crate::core::net::HttpFetcher;
use crate::document::ImageSize;
use crate::progress::Progress;
use crate::runner::{self, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "kama_sona_scrape", version, about = "Scrape the kama sona word table into spreadsheets")]
pub struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the page and write the records spreadsheet
    Scrape(ScrapeArgs),
    /// Download every image listed in the records spreadsheet
    Download(DownloadArgs),
    /// Fetch the page and build the spreadsheet with embedded images
    Assemble(AssembleArgs),
    /// scrape, download, then assemble
    All(AllArgs),
}

#[derive(Args, Debug, Default)]
pub struct ScrapeArgs {
    /// Page holding the word table
    #[arg(long)]
    pub url: Option<String>,
    /// Records spreadsheet path
    #[arg(long)]
    pub records: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct DownloadArgs {
    #[arg(long)]
    pub records: Option<PathBuf>,
    /// Directory the images are saved into
    #[arg(long)]
    pub images: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct AssembleArgs {
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub images: Option<PathBuf>,
    /// Output spreadsheet path
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Directory for the renamed image copies
    #[arg(long, conflicts_with = "no_editable")]
    pub editable: Option<PathBuf>,
    /// Skip the renamed image copies
    #[arg(long)]
    pub no_editable: bool,
    /// Size each image from its own dimensions
    #[arg(long)]
    pub detect_size: bool,
    /// Frame size in px, `N` or `WxH`; the fallback when --detect-size is set
    #[arg(long, value_parser = parse_size)]
    pub size: Option<ImageSize>,
}

#[derive(Args, Debug, Default)]
pub struct AllArgs {
    #[arg(long)]
    pub records: Option<PathBuf>,
    #[command(flatten)]
    pub assemble: AssembleArgs,
}

impl ScrapeArgs {
    fn apply(&self, opts: &mut AppOptions) {
        if let Some(url) = &self.url {
            opts.scrape.base_url = url.clone();
        }
        if let Some(p) = &self.records {
            opts.scrape.records_path = p.clone();
        }
    }
}

impl DownloadArgs {
    fn apply(&self, opts: &mut AppOptions) {
        if let Some(p) = &self.records {
            opts.scrape.records_path = p.clone();
        }
        if let Some(p) = &self.images {
            opts.download.images_dir = p.clone();
        }
    }
}

impl AssembleArgs {
    fn apply(&self, opts: &mut AppOptions) {
        if let Some(url) = &self.url {
            opts.scrape.base_url = url.clone();
        }
        if let Some(p) = &self.images {
            opts.download.images_dir = p.clone();
            opts.assemble.images_dir = p.clone();
        }
        if let Some(p) = &self.out {
            opts.assemble.out_path = p.clone();
        }
        if self.no_editable {
            opts.assemble.editable_dir = None;
        } else if let Some(p) = &self.editable {
            opts.assemble.editable_dir = Some(p.clone());
        }
        let fixed = match opts.assemble.size {
            SizePolicy::Fixed(s) | SizePolicy::Detect { fallback: s } => self.size.unwrap_or(s),
        };
        opts.assemble.size = if self.detect_size {
            SizePolicy::Detect { fallback: fixed }
        } else {
            SizePolicy::Fixed(fixed)
        };
    }
}

impl Command {
    /// Layer the flags over the defaults.
    pub fn options(&self) -> AppOptions {
        let mut opts = AppOptions::default();
        match self {
            Command::Scrape(a) => a.apply(&mut opts),
            Command::Download(a) => a.apply(&mut opts),
            Command::Assemble(a) => a.apply(&mut opts),
            Command::All(a) => {
                a.assemble.apply(&mut opts);
                if let Some(p) = &a.records {
                    opts.scrape.records_path = p.clone();
                }
            }
        }
        opts
    }
}

/// `50` or `64x32`, in pixels.
pub fn parse_size(s: &str) -> Result<ImageSize, String> {
    let num = |v: &str| -> Result<f64, String> {
        let n: f64 = v.trim().parse().map_err(|_| format!("not a number: {v:?}"))?;
        if n.is_finite() && n > 0.0 { Ok(n) } else { Err(format!("size must be positive: {v:?}")) }
    };
    match s.split_once(['x', 'X']) {
        Some((w, h)) => Ok(ImageSize { width: num(w)?, height: num(h)? }),
        None => num(s).map(ImageSize::square),
    }
}

/// Prints one line per item to stdout.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
    failed: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        self.failed = 0;
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, _index: usize, source: &str, path: &Path) {
        self.done += 1;
        println!("Downloaded: {source} -> {}", path.display());
    }

    fn item_failed(&mut self, _index: usize, source: &str, reason: &str) {
        self.failed += 1;
        println!("Failed to download: {source} ({reason})");
    }

    fn finish(&mut self) {
        println!("{}", self.completion_line());
    }
}

impl ConsoleProgress {
    /// Printed once per download run, also when there was nothing to fetch.
    pub fn completion_line(&self) -> String {
        format!(
            "Downloaded all images: {} of {} saved, {} failed",
            self.done, self.total, self.failed
        )
    }
}

pub fn run(cli: &Cli) -> color_eyre::Result<RunSummary> {
    let opts = cli.command.options();
    let fetcher = HttpFetcher::new().wrap_err("Failed to set up the HTTP client")?;
    let mut progress = ConsoleProgress::default();
    let progress: Option<&mut dyn Progress> = Some(&mut progress);

    let summary = match &cli.command {
        Command::Scrape(_) => runner::scrape_records(&opts, &fetcher, progress)
            .wrap_err_with(|| format!("Failed to retrieve the webpage {}", opts.scrape.base_url))?,
        Command::Download(_) => runner::download_from_records(&opts, &fetcher, progress)
            .wrap_err_with(|| format!("Failed to download from {}", opts.scrape.records_path.display()))?,
        Command::Assemble(_) => runner::assemble_document(&opts, &fetcher, progress)
            .wrap_err_with(|| format!("Failed to assemble {}", opts.assemble.out_path.display()))?,
        Command::All(_) => runner::run_all(&opts, &fetcher, progress).wrap_err("Pipeline stopped")?,
    };
    logf!("{} files written, {} downloads failed", summary.files_written.len(), summary.failed.len());
    Ok(summary)
}
