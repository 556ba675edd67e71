//! Resume cache built from a previous run's output file

use crate::output::row::Row;
use std::collections::HashMap;
use std::path::Path;

/// Cached fields for one source URL
#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheEntry {
    end_url: String,
    page_title: String,
    article_title: String,
}

/// Previously resolved rows keyed by source URL
///
/// Loaded once before dispatch starts and read-only afterwards. Loading is
/// fail-open: a missing, empty or unreadable file simply yields an empty cache.
#[derive(Debug, Clone, Default)]
pub struct ResumeCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResumeCache {
    /// An empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the complete rows of a previous output file
    ///
    /// Rows that fail to parse or that are missing either title are dropped so
    /// the URL gets fetched again.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No previous output at {}, nothing to resume", path.display());
            return Self::new();
        }

        let mut reader = match csv::ReaderBuilder::new().flexible(true).from_path(path) {
            Ok(reader) => reader,
            Err(e) => {
                tracing::warn!(
                    "Failed to open previous output {}: {}. Starting fresh.",
                    path.display(),
                    e
                );
                return Self::new();
            }
        };

        let mut cache = Self::new();
        let mut dropped = 0usize;

        for record in reader.deserialize::<Row>() {
            match record {
                Ok(row) if row.is_complete() => cache.insert(row),
                Ok(_) => dropped += 1,
                Err(e) => {
                    tracing::debug!("Skipping unreadable row in {}: {}", path.display(), e);
                    dropped += 1;
                }
            }
        }

        tracing::info!(
            "Resume cache: {} complete rows loaded from {}, {} dropped",
            cache.len(),
            path.display(),
            dropped
        );

        cache
    }

    /// Adds a row, replacing any earlier entry for the same URL
    pub fn insert(&mut self, row: Row) {
        self.entries.insert(
            row.source_url,
            CacheEntry {
                end_url: row.end_url,
                page_title: row.page_title,
                article_title: row.article_title,
            },
        );
    }

    /// Rebuilds the cached row for a source URL
    pub fn get(&self, url: &str) -> Option<Row> {
        self.entries.get(url).map(|entry| Row {
            source_url: url.to_string(),
            end_url: entry.end_url.clone(),
            page_title: entry.page_title.clone(),
            article_title: entry.article_title.clone(),
        })
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
