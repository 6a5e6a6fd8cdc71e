use crate::UrlError;
use url::Url;

/// Parses and validates a seed URL supplied by a client
///
/// The seed must be an absolute `http` or `https` URL with a host. Its path
/// and query are kept, because the first page fetched is the one the client
/// asked for.
///
/// # Examples
///
/// ```
/// use site_graph::url::parse_seed;
///
/// let url = parse_seed("https://example.com/start?x=1").unwrap();
/// assert_eq!(url.path(), "/start");
/// assert!(parse_seed("ftp://example.com/").is_err());
/// assert!(parse_seed("/relative").is_err());
/// ```
pub fn parse_seed(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw.trim())?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}

/// Reduces a URL to host-level identity
///
/// Path, query, fragment and credentials are discarded; scheme, host and
/// port are kept. Two URLs are the same node exactly when their `node_url`
/// values are equal.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_graph::url::node_url;
///
/// let url = Url::parse("https://B.test/page?x=1#top").unwrap();
/// assert_eq!(node_url(&url).as_str(), "https://b.test/");
/// ```
pub fn node_url(url: &Url) -> Url {
    let mut node = url.clone();
    node.set_path("");
    node.set_query(None);
    node.set_fragment(None);
    // Only fails for URLs that cannot carry credentials, which have none.
    let _ = node.set_username("");
    let _ = node.set_password(None);
    node
}

/// Returns the wire identifier of a node URL: `scheme://host[:port]`
pub fn node_id(url: &Url) -> String {
    url.origin().ascii_serialization()
}
