use serde::{Deserialize, Serialize};

/// CSV header, in column order
pub const HEADERS: [&str; 4] = ["url", "end_url", "page_title", "article_title"];

/// Separator used when a page resolves to several destination URLs
pub const END_URL_SEPARATOR: &str = ",";

/// One line of output
///
/// Title fields are empty strings, never absent, when nothing could be
/// extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// The URL as it appeared in the input
    #[serde(rename = "url")]
    pub source_url: String,

    /// Final URL after redirects, or the comma-joined destinations of a
    /// permalink page
    pub end_url: String,

    pub page_title: String,

    pub article_title: String,
}

impl Row {
    /// Returns true if both titles were extracted
    ///
    /// Only complete rows are trusted when resuming; anything else is fetched
    /// again.
    pub fn is_complete(&self) -> bool {
        !self.page_title.is_empty() && !self.article_title.is_empty()
    }
}
