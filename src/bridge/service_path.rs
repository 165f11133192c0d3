//! Service path resolution.
//!
//! The target service is taken from `X-RPCX-ServicePath` when the caller
//! supplied it. Otherwise the route suffix is normalized and written back onto
//! the request, so anything that reads the request afterwards (the invoker,
//! the failure-path header echo) observes the same value.

use axum::http::{HeaderMap, HeaderValue};

use crate::bridge::headers::X_SERVICE_PATH;

/// Resolve the service path for a request, storing it on the headers if it
/// had to be derived from `suffix`.
///
/// Exactly one leading `/` is stripped from `suffix`. Calling this twice on
/// the same headers returns the same value.
pub fn resolve_service_path(headers: &mut HeaderMap, suffix: &str) -> String {
    if let Some(existing) = header_service_path(headers) {
        return existing;
    }

    let service_path = suffix.strip_prefix('/').unwrap_or(suffix);

    match HeaderValue::from_str(service_path) {
        Ok(value) => {
            headers.insert(X_SERVICE_PATH, value);
        }
        Err(_) => {
            tracing::warn!(
                service_path = %service_path,
                "Service path is not a valid header value, not storing it on the request"
            );
        }
    }

    service_path.to_string()
}

/// Any non-empty header counts as supplied, including non-ASCII bytes.
fn header_service_path(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_SERVICE_PATH)
        .filter(|v| !v.as_bytes().is_empty())
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_wins_over_suffix() {
        let mut headers = HeaderMap::new();
        headers.insert(X_SERVICE_PATH, HeaderValue::from_static("/Arith"));

        assert_eq!(resolve_service_path(&mut headers, "/foo/bar"), "/Arith");
        assert_eq!(headers.get(X_SERVICE_PATH).unwrap(), "/Arith");
    }

    #[test]
    fn test_non_ascii_header_is_kept() {
        let mut headers = HeaderMap::new();
        let utf8 = HeaderValue::from_bytes("Ärith".as_bytes()).unwrap();
        headers.insert(X_SERVICE_PATH, utf8.clone());

        assert_eq!(resolve_service_path(&mut headers, "/fromurl"), "Ärith");
        assert_eq!(headers.get(X_SERVICE_PATH), Some(&utf8));

        let mut headers = HeaderMap::new();
        let latin1 = HeaderValue::from_bytes(b"Ar\xe4th").unwrap();
        headers.insert(X_SERVICE_PATH, latin1.clone());

        assert_eq!(resolve_service_path(&mut headers, "/fromurl"), "Ar\u{fffd}th");
        assert_eq!(headers.get(X_SERVICE_PATH), Some(&latin1));
    }

    #[test]
    fn test_single_leading_separator_stripped() {
        let mut headers = HeaderMap::new();
        assert_eq!(resolve_service_path(&mut headers, "/foo/bar"), "foo/bar");
        assert_eq!(headers.get(X_SERVICE_PATH).unwrap(), "foo/bar");

        let mut headers = HeaderMap::new();
        assert_eq!(resolve_service_path(&mut headers, "//foo"), "/foo");
    }

    #[test]
    fn test_suffix_without_separator_unchanged() {
        let mut headers = HeaderMap::new();
        assert_eq!(resolve_service_path(&mut headers, "foo/bar"), "foo/bar");
    }

    #[test]
    fn test_empty_header_falls_back_to_suffix() {
        let mut headers = HeaderMap::new();
        headers.insert(X_SERVICE_PATH, HeaderValue::from_static(""));
        assert_eq!(resolve_service_path(&mut headers, "/Arith"), "Arith");
    }

    #[test]
    fn test_empty_suffix_passes_through() {
        let mut headers = HeaderMap::new();
        assert_eq!(resolve_service_path(&mut headers, ""), "");
        assert_eq!(resolve_service_path(&mut headers, "/"), "");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut headers = HeaderMap::new();
        let first = resolve_service_path(&mut headers, "//double");
        let second = resolve_service_path(&mut headers, "//double");
        assert_eq!(first, "/double");
        assert_eq!(second, first);
    }
}
