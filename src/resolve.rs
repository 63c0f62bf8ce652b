//! Endpoint resolution against the configured base URL.
//!
//! Every URL produced here carries the base URL's scheme, host and port. A
//! foreign host named by an endpoint contributes only its path and query, so
//! a request can never be dispatched to a third-party host.

use crate::Result;
use url::{ParseError, Url};

/// Resolves `endpoint` against `base_url` into the absolute URL to dispatch.
///
/// - Absolute endpoints keep only their path (default `/`) and query.
/// - Protocol-relative endpoints (`//host/path`) are treated the same way.
/// - Everything else is resolved as a relative reference against the base
///   URL, which is treated as a directory (it gains a trailing `/`).
///
/// Fragments are always dropped. Queries are re-serialized by [`Url`], so
/// characters such as spaces and quotes come out percent-encoded.
///
/// An endpoint of the form `scheme://authority/...` whose authority does not
/// parse (a bad port, an unclosed IPv6 literal) is still re-rooted: the
/// authority is discarded and its path and query are kept.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if the endpoint
/// cannot be parsed at all.
///
/// # Examples
///
/// ```
/// use homebound::resolve::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://api.example.com/").unwrap();
///
/// let url = resolve(&base, "https://evil.com/x?y=1").unwrap();
/// assert_eq!(url.as_str(), "https://api.example.com/x?y=1");
///
/// let url = resolve(&base, "v2/scrape").unwrap();
/// assert_eq!(url.as_str(), "https://api.example.com/v2/scrape");
/// ```
pub fn resolve(base_url: &Url, endpoint: &str) -> Result<Url> {
    if endpoint.starts_with("//") {
        let parsed = Url::parse(&format!("{}:{}", base_url.scheme(), endpoint))?;
        return Ok(rebase(base_url, parsed.path(), parsed.query()));
    }

    match Url::parse(endpoint) {
        Ok(parsed) if has_network_location(&parsed) => {
            Ok(rebase(base_url, parsed.path(), parsed.query()))
        }
        // A scheme with no host (`v2:scrape`) is a path segment here.
        Ok(_) => join(base_url, &format!("./{}", endpoint)),
        Err(ParseError::RelativeUrlWithoutBase) => join(base_url, endpoint),
        Err(e) => match strip_authority(endpoint) {
            Some(rest) => {
                tracing::debug!(
                    endpoint = %endpoint,
                    error = %e,
                    "Endpoint authority is malformed, re-rooting its path"
                );
                let (rest, _) = rest.split_once('#').unwrap_or((rest, ""));
                let (path, query) = match rest.split_once('?') {
                    Some((path, query)) => (path, Some(query)),
                    None => (rest, None),
                };
                Ok(rebase(base_url, path, query))
            }
            None => Err(e.into()),
        },
    }
}

/// Returns what follows the authority of a `scheme://authority...` string.
fn strip_authority(endpoint: &str) -> Option<&str> {
    let (scheme, rest) = endpoint.trim_start().split_once("://")?;
    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return None;
    }

    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    Some(&rest[end..])
}

fn has_network_location(url: &Url) -> bool {
    url.host_str().is_some_and(|host| !host.is_empty())
}

/// Standard relative resolution against the base treated as a directory.
fn join(base_url: &Url, reference: &str) -> Result<Url> {
    let joined = directory(base_url).join(reference)?;

    if joined.origin() != base_url.origin() {
        // Backslashes and similar quirks can re-root a "relative" reference.
        tracing::debug!(
            endpoint = %reference,
            "Relative endpoint escaped the base origin, re-rooting"
        );
        return Ok(rebase(base_url, joined.path(), joined.query()));
    }

    let mut joined = joined;
    joined.set_fragment(None);
    Ok(joined)
}

/// The base URL with a trailing `/` and without query or fragment.
fn directory(base_url: &Url) -> Url {
    let mut dir = base_url.clone();
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    dir.set_query(None);
    dir.set_fragment(None);
    dir
}

/// Builds a URL on the base's scheme/host/port with the given path and query.
fn rebase(base_url: &Url, path: &str, query: Option<&str>) -> Url {
    let mut url = base_url.clone();
    url.set_path(if path.is_empty() { "/" } else { path });
    url.set_query(query);
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.example.com/").unwrap()
    }

    fn resolved(base: &Url, endpoint: &str) -> String {
        resolve(base, endpoint).unwrap().to_string()
    }

    #[test]
    fn test_foreign_host_keeps_only_path_and_query() {
        assert_eq!(
            resolved(&base(), "https://evil.com/x?y=1"),
            "https://api.example.com/x?y=1"
        );
        assert_eq!(
            resolved(&base(), "http://evil.com:8080/a/b#frag"),
            "https://api.example.com/a/b"
        );
        assert_eq!(
            resolved(&base(), "https://user:pw@evil.com"),
            "https://api.example.com/"
        );
    }

    #[test]
    fn test_same_host_absolute_normalizes_scheme() {
        assert_eq!(
            resolved(&base(), "http://api.example.com/v2/scrape?page=2"),
            "https://api.example.com/v2/scrape?page=2"
        );
    }

    #[test]
    fn test_protocol_relative() {
        assert_eq!(
            resolved(&base(), "//evil.com/v2/crawl?limit=10"),
            "https://api.example.com/v2/crawl?limit=10"
        );
        assert_eq!(resolved(&base(), "//evil.com"), "https://api.example.com/");
    }

    #[test]
    fn test_relative_paths_against_base_directory() {
        let base = Url::parse("https://api.example.com/v1").unwrap();
        assert_eq!(resolved(&base, "jobs/1"), "https://api.example.com/v1/jobs/1");
        assert_eq!(resolved(&base, "/v2/jobs"), "https://api.example.com/v2/jobs");
        assert_eq!(
            resolved(&base, "search?q=rust#top"),
            "https://api.example.com/v1/search?q=rust"
        );
        assert_eq!(resolved(&base, ""), "https://api.example.com/v1/");
    }

    #[test]
    fn test_base_port_is_kept() {
        let base = Url::parse("http://localhost:3002").unwrap();
        assert_eq!(
            resolved(&base, "https://evil.com/v2/scrape"),
            "http://localhost:3002/v2/scrape"
        );
        assert_eq!(resolved(&base, "v2/scrape"), "http://localhost:3002/v2/scrape");
    }

    #[test]
    fn test_scheme_without_host_is_a_path() {
        assert_eq!(
            resolved(&base(), "v2:scrape"),
            "https://api.example.com/v2:scrape"
        );
    }

    #[test]
    fn test_backslash_cannot_escape_base_host() {
        let url = resolve(&base(), "/\\evil.com/x").unwrap();
        assert_eq!(url.host_str(), Some("api.example.com"));
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_malformed_authority_is_rerooted() {
        assert_eq!(
            resolved(&base(), "http://invalid:port:123/v2/scrape"),
            "https://api.example.com/v2/scrape"
        );
        assert_eq!(
            resolved(&base(), "https://[::1/x?y=1#frag"),
            "https://api.example.com/x?y=1"
        );
        assert_eq!(
            resolved(&base(), "http://evil.com:99999"),
            "https://api.example.com/"
        );
    }

    #[test]
    fn test_query_is_percent_encoded() {
        assert_eq!(
            resolved(&base(), "https://evil.com/search?q=a b&c='d'"),
            "https://api.example.com/search?q=a%20b&c=%27d%27"
        );
        assert_eq!(
            resolved(&base(), "search?q=a%20b&page=2"),
            "https://api.example.com/search?q=a%20b&page=2"
        );
    }
}
