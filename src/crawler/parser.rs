//! Link extraction from HTML documents
//!
//! Every `<a>` element becomes one `Link` in document order. Anchors without
//! a child node or an `href`, or with an href that does not parse, are
//! reported as errors but do not stop extraction of the rest.

use crate::url::resolve_href;
use crate::{CrawlError, LinkError};
use scraper::node::Node as HtmlNode;
use scraper::{ElementRef, Html};
use url::Url;

/// An anchor found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Untrimmed text of the anchor's first child
    pub text: String,

    /// Resolved absolute URL
    pub href: Url,
}

impl Link {
    /// A zero link carries no usable target and is skipped by the crawler
    pub fn is_zero(&self) -> bool {
        self.text.is_empty()
            || self.href.scheme().is_empty()
            || self.href.host_str().map_or(true, str::is_empty)
    }
}

/// Links and per-anchor errors collected from one document
#[derive(Debug, Default)]
pub struct Extraction {
    pub links: Vec<Link>,
    pub errors: Vec<LinkError>,
}

impl Extraction {
    /// Combines all per-anchor errors into a single error, if there were any
    pub fn rejection(&self, url: &Url) -> Option<CrawlError> {
        if self.errors.is_empty() {
            return None;
        }

        Some(CrawlError::ParseFailed {
            url: url.to_string(),
            count: self.errors.len(),
            summary: self
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        })
    }

    /// Splits the extraction into its links and the combined error
    pub fn into_result(self, url: &Url) -> (Vec<Link>, Option<CrawlError>) {
        let rejected = self.rejection(url);
        (self.links, rejected)
    }
}

/// Lazy iterator over the anchors of a parsed document
///
/// Yields one result per `<a>` element, in document order.
pub struct LinkIter<'a> {
    source: &'a Url,
    anchors: Box<dyn Iterator<Item = ElementRef<'a>> + 'a>,
}

impl<'a> Iterator for LinkIter<'a> {
    type Item = Result<Link, LinkError>;

    fn next(&mut self) -> Option<Self::Item> {
        let anchor = self.anchors.next()?;
        Some(link_from_anchor(self.source, anchor))
    }
}

/// Walks the anchors of `document`, resolving hrefs against `source`
pub fn iter_links<'a>(document: &'a Html, source: &'a Url) -> LinkIter<'a> {
    let anchors = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "a");

    LinkIter {
        source,
        anchors: Box::new(anchors),
    }
}

/// Parses an HTML document and collects its links
///
/// # Example
///
/// ```
/// use site_graph::crawler::extract_links;
/// use url::Url;
///
/// let source = Url::parse("https://a.test/").unwrap();
/// let html = r#"<html><body><a href="https://b.test/x">B</a></body></html>"#;
/// let extraction = extract_links(&source, html);
/// assert_eq!(extraction.links.len(), 1);
/// assert_eq!(extraction.links[0].href.as_str(), "https://b.test/x");
/// ```
pub fn extract_links(source: &Url, html: &str) -> Extraction {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    for result in iter_links(&document, source) {
        match result {
            Ok(link) => extraction.links.push(link),
            Err(e) => extraction.errors.push(e),
        }
    }

    extraction
}

fn link_from_anchor(source: &Url, anchor: ElementRef<'_>) -> Result<Link, LinkError> {
    // Raw text of the first child; whitespace from pretty-printed markup
    // still counts as text
    let first = anchor.first_child().ok_or(LinkError::MissingText)?;
    let text = match first.value() {
        HtmlNode::Text(text) => String::from(&**text),
        HtmlNode::Element(_) => ElementRef::wrap(first)
            .map(|element| element.text().collect::<String>())
            .unwrap_or_default(),
        _ => String::new(),
    };

    let raw = anchor.value().attr("href").ok_or(LinkError::MissingHref)?;
    let href = resolve_href(source, raw).map_err(|source| LinkError::InvalidHref {
        href: raw.to_string(),
        source,
    })?;

    Ok(Link { text, href })
}
