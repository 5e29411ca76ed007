use thiserror::Error;
use url::Url;

/// Errors from URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
}

/// Parse a URL and require an `http`/`https` scheme with a host.
///
/// ```
/// use steamdash::util::validate_http_url;
///
/// assert!(validate_http_url("https://store.steampowered.com").is_ok());
/// assert!(validate_http_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_http_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

/// Validate a URL before passing it to `open::that`.
///
/// The opener hands its argument to the platform launcher, so anything that
/// is not a plain web URL is refused.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, String> {
    validate_http_url(url_str).map_err(|e| format!("Refusing to open URL: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_http_url("http://127.0.0.1:8080/api").is_ok());
        let url = validate_http_url("  https://store.steampowered.com/app/10/ ").unwrap();
        assert_eq!(url.host_str(), Some("store.steampowered.com"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        for input in ["file:///etc/passwd", "javascript:alert(1)", "ftp://example.com"] {
            assert!(matches!(
                validate_http_url(input),
                Err(UrlValidationError::UnsupportedScheme(_))
            ));
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            validate_http_url("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
        assert!(validate_http_url("").is_err());
    }

    #[test]
    fn test_open_error_is_readable() {
        let err = validate_url_for_open("file:///tmp/x").unwrap_err();
        assert!(err.starts_with("Refusing to open URL"));
        assert!(err.contains("file"));
    }
}
