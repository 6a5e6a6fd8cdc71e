use url::{ParseError, Url};

/// Resolves an anchor href against the page it was found on
///
/// Absolute hrefs with a host are returned as parsed. Anything without a host
/// takes the source's scheme and host and the href's own path; the source
/// path is never merged in, because the crawl only tracks host-level
/// connectivity. Protocol-relative hrefs (`//host/path`) inherit the
/// source scheme.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_graph::url::resolve_href;
///
/// let source = Url::parse("https://a.test/docs/index.html").unwrap();
/// let resolved = resolve_href(&source, "guide/intro").unwrap();
/// assert_eq!(resolved.as_str(), "https://a.test/guide/intro");
/// ```
pub fn resolve_href(source: &Url, href: &str) -> Result<Url, ParseError> {
    let href = href.trim();

    match Url::parse(href) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        // mailto:, javascript: and friends point nowhere new
        Ok(_) => Ok(with_path(source, "")),
        Err(ParseError::RelativeUrlWithoutBase) => {
            if href.starts_with("//") {
                return source.join(href);
            }
            let path = href
                .split(|c| c == '?' || c == '#')
                .next()
                .unwrap_or_default();
            Ok(with_path(source, path))
        }
        Err(e) => Err(e),
    }
}

fn with_path(source: &Url, path: &str) -> Url {
    let mut url = source.clone();
    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);
    url
}
