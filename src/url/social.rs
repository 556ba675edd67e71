use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Host whose permalink pages get their embedded links resolved
pub const TWITTER_HOST: &str = "twitter.com";

fn status_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/status/\d+$").expect("status pattern is a valid regex"))
}

/// The social-media site whose permalink widgets are special-cased
///
/// Links inside those widgets often point back at the site itself (profiles,
/// hashtags, home) or go through a shortener; only single-post permalinks and
/// off-site destinations are treated as real destinations.
#[derive(Debug, Clone)]
pub struct SocialHost {
    host: String,
    base_url: Url,
}

impl SocialHost {
    /// Creates a social host from its base URL (scheme + host)
    ///
    /// Returns None if the URL has no host.
    pub fn new(base_url: Url) -> Option<Self> {
        let host = base_url.host_str()?.to_lowercase();
        Some(Self { host, base_url })
    }

    /// `https://twitter.com`
    pub fn twitter() -> Self {
        Self {
            host: TWITTER_HOST.to_string(),
            base_url: Url::parse(&format!("https://{}", TWITTER_HOST))
                .expect("static base URL is valid"),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if the URL lives on this host
    pub fn is_own(&self, url: &Url) -> bool {
        url.host_str()
            .map(|h| h.eq_ignore_ascii_case(&self.host))
            .unwrap_or(false)
    }

    /// Expands a path-only href (`/user/status/1`) against the base URL
    ///
    /// Anything that does not start with `/` is returned unchanged.
    pub fn expand(&self, candidate: &str) -> String {
        if !candidate.starts_with('/') {
            return candidate.to_string();
        }

        match self.base_url.join(candidate) {
            Ok(url) => url.to_string(),
            Err(_) => candidate.to_string(),
        }
    }

    /// Returns true for own-host URLs that are not a single post, e.g. a bare
    /// profile page
    pub fn is_non_post_page(&self, url: &Url) -> bool {
        self.is_own(url) && !is_status_permalink(url.path())
    }

    /// Returns true for own-host links that are navigation noise: more than
    /// one path segment and not a single-post permalink
    ///
    /// Candidates that do not parse as URLs are never noise.
    pub fn is_noise(&self, candidate: &str) -> bool {
        match Url::parse(candidate) {
            Ok(url) => {
                self.is_own(&url)
                    && path_depth(url.path()) > 1
                    && !is_status_permalink(url.path())
            }
            Err(_) => false,
        }
    }
}

impl Default for SocialHost {
    fn default() -> Self {
        Self::twitter()
    }
}

/// Returns true if the path ends in `/status/<digits>`
pub fn is_status_permalink(path: &str) -> bool {
    status_regex().is_match(path)
}

/// Number of `/` separators in a path
pub fn path_depth(path: &str) -> usize {
    path.matches('/').count()
}
