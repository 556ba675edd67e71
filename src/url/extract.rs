use regex::Regex;
use std::sync::OnceLock;

/// Anything that starts with an http(s) scheme and runs until whitespace
const URL_PATTERN: &str = r"(?i)https?://\S+";

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern is a valid regex"))
}

fn anchored_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!("^(?:{})", URL_PATTERN)).expect("URL pattern is a valid regex")
    })
}

/// Returns the first URL-shaped token in a line of input
///
/// Lines are free-form text (CSV rows, log lines, notes); only the first match
/// counts, so a line contributes at most one URL.
///
/// # Examples
///
/// ```
/// use title_grabber::url::extract_url;
///
/// assert_eq!(extract_url("see https://example.com/a b"), Some("https://example.com/a"));
/// assert_eq!(extract_url("no links here"), None);
/// ```
pub fn extract_url(line: &str) -> Option<&str> {
    url_regex().find(line).map(|m| m.as_str())
}

/// Returns true if the string itself starts like a full URL
///
/// Used to decide whether an embedded link is worth fetching; relative hrefs
/// such as `/status/123` are not.
pub fn is_url_shaped(candidate: &str) -> bool {
    anchored_url_regex().is_match(candidate)
}
