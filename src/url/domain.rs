use crate::{UrlError, UrlResult};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use url::Url;

/// Parses a bookmark URL, requiring both a scheme and a host
///
/// Bookmarklets (`javascript:`), `mailto:` links, `file:` URLs and bare words
/// all fail here.
///
/// # Examples
///
/// ```
/// use bookmark_notes::url::parse_candidate;
///
/// assert!(parse_candidate("https://example.com/page").is_ok());
/// assert!(parse_candidate("javascript:alert(1)").is_err());
/// assert!(parse_candidate("invalid-url").is_err());
/// ```
pub fn parse_candidate(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme().is_empty() {
        return Err(UrlError::MissingScheme);
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}

/// Extracts the host from a URL, lowercased and without port
///
/// # Examples
///
/// ```
/// use url::Url;
/// use bookmark_notes::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the URL path with percent-escapes decoded
///
/// `Url` stores non-ASCII characters and spaces escaped; path keywords are
/// written the way the path reads.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use bookmark_notes::url::decoded_path;
///
/// let url = Url::parse("https://example.jp/記事/my page").unwrap();
/// assert_eq!(decoded_path(&url), "/記事/my page");
/// ```
pub fn decoded_path(url: &Url) -> Cow<'_, str> {
    percent_decode_str(url.path()).decode_utf8_lossy()
}

/// Returns true if the URL points at a site's home page
///
/// A URL is a domain root when its path is empty after stripping slashes and
/// it carries neither a query nor a fragment. An empty `?` or `#` counts as
/// absent.
pub fn is_domain_root(url: &Url) -> bool {
    url.path().trim_matches('/').is_empty()
        && url.query().map_or(true, str::is_empty)
        && url.fragment().map_or(true, str::is_empty)
}
