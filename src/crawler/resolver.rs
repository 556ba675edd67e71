//! Row resolution for a single URL
//!
//! Fetch, resolve permalink destinations, extract titles. Every failure stays
//! inside this module and becomes "no row".

use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::parser::parse_page;
use crate::crawler::permalink::PermalinkResolver;
use crate::output::Row;
use crate::url::SocialHost;
use thiserror::Error;

/// Why a URL produced no row
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("GET {url} returned an empty body")]
    EmptyBody { url: String },
}

/// Produces one output row per URL
///
/// Shared by every worker task behind an `Arc`; it holds no mutable state.
#[derive(Debug, Clone)]
pub struct RowResolver {
    fetcher: Fetcher,
    permalinks: PermalinkResolver,
}

impl RowResolver {
    /// Creates a resolver that special-cases twitter.com permalink pages
    pub fn new(fetcher: Fetcher) -> Self {
        Self::with_social_host(fetcher, SocialHost::twitter())
    }

    pub fn with_social_host(fetcher: Fetcher, host: SocialHost) -> Self {
        let permalinks = PermalinkResolver::new(fetcher.clone(), host);
        Self {
            fetcher,
            permalinks,
        }
    }

    /// Resolves a URL into a row, reporting why it could not
    pub async fn try_resolve(&self, url: &str) -> Result<Row, RowError> {
        let page = self.fetcher.fetch(url).await?;

        if page.body.is_empty() {
            return Err(RowError::EmptyBody {
                url: url.to_string(),
            });
        }

        let parsed = parse_page(&page.body);

        let end_url = self
            .permalinks
            .resolve(&parsed.permalink_links)
            .await
            .unwrap_or(page.final_url);

        Ok(Row {
            source_url: url.to_string(),
            end_url,
            page_title: parsed.titles.page_title,
            article_title: parsed.titles.article_title,
        })
    }

    /// Resolves a URL into a row, logging and swallowing any failure
    pub async fn resolve(&self, url: &str) -> Option<Row> {
        match self.try_resolve(url).await {
            Ok(row) => Some(row),
            Err(e) => {
                tracing::info!("No row for {}: {}", url, e);
                None
            }
        }
    }
}
