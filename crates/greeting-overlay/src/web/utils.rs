//! Web utility functions

use axum::http::{HeaderMap, header};

const DEFAULT_SCHEME: &str = "http";
const FALLBACK_HOST: &str = "localhost";

/// Origin that composed image URLs are built on.
///
/// A configured base URL always wins. Otherwise the origin is rebuilt from
/// the request: the first `X-Forwarded-Proto` value (default `http`) and
/// the `Host` header.
pub fn request_base_url(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base_url) = configured {
        return base_url.trim_end_matches('/').to_string();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_SCHEME);

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(FALLBACK_HOST);

    format!("{scheme}://{host}")
}

/// Public URL of a file in the uploads directory
pub fn upload_url(base_url: &str, file_name: &str) -> String {
    format!("{base_url}/uploads/{file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_configured_base_url_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:3000"));

        assert_eq!(
            request_base_url(Some("https://img.example.com/"), &headers),
            "https://img.example.com"
        );
    }

    #[test]
    fn test_base_url_from_request_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("img.example.com"));
        assert_eq!(request_base_url(None, &headers), "http://img.example.com");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        assert_eq!(request_base_url(None, &headers), "https://img.example.com");
    }

    #[test]
    fn test_base_url_without_host() {
        assert_eq!(request_base_url(None, &HeaderMap::new()), "http://localhost");
    }

    #[test]
    fn test_upload_url() {
        assert_eq!(
            upload_url("http://localhost:3000", "edited-1-abc.jpg"),
            "http://localhost:3000/uploads/edited-1-abc.jpg"
        );
    }
}
