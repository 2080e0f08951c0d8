// src/log.rs
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use ::log::LevelFilter;

/// Target used by the crate's `logf!`/`logd!`/`logw!`/`loge!` macros.
pub const TARGET: &str = "kama_sona_scrape";

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Map `-v` repetitions to a level. Zero keeps the quiet default.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Install the stderr logger. `RUST_LOG` wins over `verbosity` when set.
/// Calling it twice is harmless; the second call is ignored.
pub fn init(verbosity: u8) {
    start();
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .format(|buf, record| {
            let elapsed = fmt_elapsed(start().elapsed().as_millis());
            writeln!(buf, "[{elapsed}][{}] {}", record.level(), record.args())
        });
    let _ = builder.try_init();
}
