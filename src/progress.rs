// src/progress.rs
use std::path::Path;

/// Progress reporting for the pipeline stages.
/// The CLI implements this to print one line per item.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One download produced a file.
    fn item_done(&mut self, _index: usize, _source: &str, _path: &Path) {}

    /// One download was skipped; the loop carries on.
    fn item_failed(&mut self, _index: usize, _source: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
