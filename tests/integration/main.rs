//! Integration tests for the title grabber
//!
//! These tests use wiremock to create mock HTTP servers and run whole batches
//! end-to-end against temporary input and output files.

mod crawl_tests;
mod resume_tests;

use std::path::{Path, PathBuf};
use std::time::Duration;
use title_grabber::config::{Config, FetchPolicy};
use title_grabber::crawler::InputSource;

/// Creates a test configuration writing to the given output file
pub fn create_test_config(output_path: &Path) -> Config {
    Config {
        output_path: output_path.to_path_buf(),
        fetch: FetchPolicy {
            connect_timeout: Duration::from_millis(500),
            read_timeout: Duration::from_millis(500),
            max_redirects: 3,
            max_retries: 2,
            retry_backoff: Duration::from_millis(10),
        },
        max_threads: 4,
        debug: false,
    }
}

/// Writes an input file with the given lines into `dir`
pub fn write_input(dir: &Path, name: &str, lines: &[String]) -> InputSource {
    let path: PathBuf = dir.join(name);
    std::fs::write(&path, lines.join("\n") + "\n").expect("Failed to write input file");
    InputSource::File(path)
}

/// A page with both a `<title>` and an article heading
pub fn html_page(title: &str, heading: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><article><h1>{}</h1></article></body></html>",
        title, heading
    )
}

/// Reads the output file back as (url, end_url, page_title, article_title)
pub fn read_rows(path: &Path) -> Vec<[String; 4]> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open output");
    let headers = reader.headers().expect("Missing header").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["url", "end_url", "page_title", "article_title"]
    );

    reader
        .records()
        .map(|r| {
            let r = r.expect("Malformed row");
            [
                r[0].to_string(),
                r[1].to_string(),
                r[2].to_string(),
                r[3].to_string(),
            ]
        })
        .collect()
}

/// Files left next to the output, other than inputs and the output itself
pub fn leftover_temp_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("Failed to list output dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(".tmp"))
        .collect()
}
