//! Counters collected over one batch run

use std::fmt;

/// What happened to every URL-bearing line of input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines that held no URL-shaped token
    pub lines_without_url: u64,

    /// Rows written straight from the resume cache
    pub cache_hits: u64,

    /// Rows produced by worker tasks
    pub fetched: u64,

    /// Worker tasks that finished without a row (fetch failure, empty body)
    pub skipped: u64,

    /// Worker tasks that panicked or were cancelled
    pub task_failures: u64,

    /// Repeated URLs ignored within this run
    pub duplicates: u64,
}

impl RunSummary {
    /// Rows in the output file, excluding the header
    pub fn rows_written(&self) -> u64 {
        self.cache_hits + self.fetched
    }

    /// Tasks handed to the worker pool
    pub fn dispatched(&self) -> u64 {
        self.fetched + self.skipped + self.task_failures
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows written ({} from cache, {} fetched), {} skipped, {} failed tasks, {} duplicates, {} lines without a URL",
            self.rows_written(),
            self.cache_hits,
            self.fetched,
            self.skipped,
            self.task_failures,
            self.duplicates,
            self.lines_without_url
        )
    }
}
