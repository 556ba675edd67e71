//! HTML parser for extracting titles and permalink links
//!
//! Parsing happens in one synchronous step that returns owned data, so no
//! parsed document is ever held across an `.await`.

use crate::crawler::permalink::collect_permalink_links;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Titles extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Titles {
    /// Text of `<title>`, or empty
    pub page_title: String,

    /// Text of the first `<h1>` inside an `<article>`, else the first `<h1>`
    /// anywhere, else empty
    pub article_title: String,
}

/// Everything the row resolver needs from a page body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub titles: Titles,

    /// Deduplicated hrefs found inside permalink widgets
    pub permalink_links: BTreeSet<String>,
}

/// Parses a page body into titles and permalink links
///
/// # Example
///
/// ```
/// use title_grabber::crawler::parse_page;
///
/// let parsed = parse_page("<title>Example</title><h1>Hello</h1>");
/// assert_eq!(parsed.titles.page_title, "Example");
/// assert_eq!(parsed.titles.article_title, "Hello");
/// assert!(parsed.permalink_links.is_empty());
/// ```
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        titles: extract_titles(&document),
        permalink_links: collect_permalink_links(&document),
    }
}

/// Extracts the page title and the most specific article heading
pub fn extract_titles(document: &Html) -> Titles {
    let page_title = select_first(document, "title")
        .map(element_text)
        .map(|t| clean_up_whitespace(&t))
        .unwrap_or_default();

    let article_title = select_first(document, "article h1")
        .or_else(|| select_first(document, "h1"))
        .map(element_text)
        .map(|t| clean_up_whitespace(&t))
        .unwrap_or_default();

    Titles {
        page_title,
        article_title,
    }
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// The element's own text node when it is the only child, otherwise all
/// descendant text
fn element_text(element: ElementRef) -> String {
    let mut children = element.children();

    if let (Some(only), None) = (children.next(), children.next()) {
        if let Some(text) = only.value().as_text() {
            return text.to_string();
        }
    }

    element.text().collect()
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("whitespace pattern is a valid regex"))
}

/// Trims, turns newlines into spaces and collapses whitespace runs
///
/// Applying it twice gives the same result as applying it once.
///
/// # Example
///
/// ```
/// use title_grabber::crawler::clean_up_whitespace;
///
/// assert_eq!(clean_up_whitespace("  Breaking\n   News  "), "Breaking News");
/// ```
pub fn clean_up_whitespace(text: &str) -> String {
    let text = text.trim().replace('\n', " ");
    whitespace_regex().replace_all(&text, " ").into_owned()
}
