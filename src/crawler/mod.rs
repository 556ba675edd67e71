//! Crawler module for fetching pages and building rows
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching with timeout retries and a redirect cap
//! - Permalink destination resolution for the social-media host
//! - Title extraction
//! - Per-URL row resolution
//! - Overall batch coordination

mod coordinator;
mod fetcher;
mod input;
mod parser;
mod permalink;
mod resolver;

pub use coordinator::{run_batch, Coordinator};
pub use fetcher::{FetchError, FetchedPage, Fetcher};
pub use input::InputSource;
pub use parser::{clean_up_whitespace, extract_titles, parse_page, ParsedPage, Titles};
pub use permalink::{collect_permalink_links, PermalinkResolver};
pub use resolver::{RowError, RowResolver};
