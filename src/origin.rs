//! Same-origin checks used to gate credentials.
//!
//! Only the hostname takes part in the comparison. Scheme and port are
//! ignored, and there is deliberately no suffix or prefix matching, so
//! `api.example.com` never matches `sub.api.example.com` or
//! `api.example.com.evil.com`.

use url::Url;

/// Returns `true` if `endpoint` targets the same host as `base_url`.
///
/// Endpoints that do not start with `http://` or `https://` are relative by
/// construction and always count as same-origin. Absolute endpoints that fail
/// to parse, or that carry no host, count as a different origin.
///
/// # Examples
///
/// ```
/// use homebound::origin::same_origin;
/// use url::Url;
///
/// let base = Url::parse("https://api.example.com").unwrap();
///
/// assert!(same_origin(&base, "/v2/scrape"));
/// assert!(same_origin(&base, "https://API.example.com.:8443/v2/scrape"));
/// assert!(!same_origin(&base, "https://api.example.com.evil.com/v2/scrape"));
/// ```
pub fn same_origin(base_url: &Url, endpoint: &str) -> bool {
    if !has_http_scheme(endpoint) {
        return true;
    }

    let target = match Url::parse(endpoint) {
        Ok(url) => url,
        Err(_) => return false,
    };

    match (normalized_host(&target), normalized_host(base_url)) {
        (Some(target_host), Some(base_host)) => target_host == base_host,
        _ => false,
    }
}

/// Checks for an `http://` or `https://` prefix, ignoring ASCII case and
/// leading whitespace.
fn has_http_scheme(endpoint: &str) -> bool {
    let endpoint = endpoint.trim_start().as_bytes();
    ["http://", "https://"].iter().any(|prefix| {
        endpoint.len() >= prefix.len()
            && endpoint[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    })
}

/// Lower-cased host with at most one trailing dot removed.
fn normalized_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_suffix('.').unwrap_or(&host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}
