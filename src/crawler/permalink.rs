//! Destination resolution for social-media permalink pages
//!
//! A permalink page's own URL is rarely where its content points. The links
//! embedded in the post body are the real destinations, once short links are
//! followed and on-site navigation is discarded.

use crate::crawler::fetcher::Fetcher;
use crate::output::END_URL_SEPARATOR;
use crate::url::{is_url_shaped, SocialHost};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Links inside the post text or a quoted post of a permalink widget
const PERMALINK_LINK_SELECTORS: [&str; 2] = [
    ".tweet.permalink-tweet .tweet-text a[href]",
    ".tweet.permalink-tweet .QuoteTweet a[href]",
];

/// Collects the hrefs of every link inside a permalink widget
///
/// Returns an empty set for ordinary pages.
pub fn collect_permalink_links(document: &Html) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    for selector in PERMALINK_LINK_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if !href.is_empty() {
                    links.insert(href.to_string());
                }
            }
        }
    }

    links
}

/// Turns permalink-widget links into the row's destination URLs
#[derive(Debug, Clone)]
pub struct PermalinkResolver {
    fetcher: Fetcher,
    host: SocialHost,
}

impl PermalinkResolver {
    pub fn new(fetcher: Fetcher, host: SocialHost) -> Self {
        Self { fetcher, host }
    }

    /// Resolves candidate links into a sorted, comma-joined destination list
    ///
    /// # Resolution Steps
    ///
    /// 1. Full URLs are fetched; the final URL replaces the candidate unless
    ///    it lands on a non-post page of the social host
    /// 2. Path-only links are expanded against the social host
    /// 3. Own-host navigation links (deep paths that are not posts) are dropped
    /// 4. The rest is sorted and joined
    ///
    /// # Returns
    ///
    /// * `Some(String)` - One or more destinations
    /// * `None` - Nothing left; the caller keeps the page's own final URL
    pub async fn resolve(&self, links: &BTreeSet<String>) -> Option<String> {
        let mut destinations = BTreeSet::new();

        for candidate in links {
            let followed = self.follow(candidate).await;
            let expanded = self.host.expand(&followed);

            if self.host.is_noise(&expanded) {
                tracing::debug!("Dropping navigation link {}", expanded);
                continue;
            }

            destinations.insert(expanded);
        }

        if destinations.is_empty() {
            return None;
        }

        Some(
            destinations
                .into_iter()
                .collect::<Vec<_>>()
                .join(END_URL_SEPARATOR),
        )
    }

    /// Follows a full-URL candidate through its redirects
    ///
    /// Relative candidates, failed fetches and results that land on a bare
    /// social-host page all keep the original candidate.
    async fn follow(&self, candidate: &str) -> String {
        if !is_url_shaped(candidate) {
            return candidate.to_string();
        }

        match self.fetcher.fetch(candidate).await {
            Ok(page) => match Url::parse(&page.final_url) {
                Ok(final_url) if self.host.is_non_post_page(&final_url) => {
                    tracing::debug!(
                        "{} resolved to non-post page {}, keeping original",
                        candidate,
                        final_url
                    );
                    candidate.to_string()
                }
                _ => page.final_url,
            },
            Err(e) => {
                tracing::debug!("Keeping unresolved link {}: {}", candidate, e);
                candidate.to_string()
            }
        }
    }
}
