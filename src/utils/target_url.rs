//! Validation and canonicalization of redirect targets.

use url::Url;

/// Longest target URL accepted for shortening.
pub const MAX_TARGET_URL_LENGTH: usize = 2048;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS URLs can be shortened")]
    UnsupportedScheme,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL exceeds {MAX_TARGET_URL_LENGTH} characters")]
    TooLong,
}

/// Parses a target URL and returns its canonical string form.
///
/// Only absolute `http`/`https` URLs with a host are accepted. The host is
/// lowercased, default ports are dropped, and an empty path becomes `/`
/// (so `https://example.com` is stored as `https://example.com/`). Query and
/// fragment are kept as given.
///
/// # Errors
///
/// See [`TargetUrlError`].
pub fn canonicalize_target(input: &str) -> Result<String, TargetUrlError> {
    let trimmed = input.trim();
    if trimmed.len() > MAX_TARGET_URL_LENGTH {
        return Err(TargetUrlError::TooLong);
    }

    let mut url = Url::parse(trimmed).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(TargetUrlError::UnsupportedScheme);
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(TargetUrlError::MissingHost)?
        .to_ascii_lowercase();
    url.set_host(Some(&host))
        .map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    // Url::port() already reports None for the scheme's default port.
    let canonical = url.to_string();
    if canonical.len() > MAX_TARGET_URL_LENGTH {
        return Err(TargetUrlError::TooLong);
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_gets_root_path() {
        assert_eq!(
            canonicalize_target("https://example.com").unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn test_host_is_lowercased_path_is_not() {
        assert_eq!(
            canonicalize_target("https://EXAMPLE.com/Some/Path").unwrap(),
            "https://example.com/Some/Path"
        );
    }

    #[test]
    fn test_default_port_dropped() {
        assert_eq!(
            canonicalize_target("https://example.com:443/page").unwrap(),
            "https://example.com/page"
        );
        assert_eq!(
            canonicalize_target("http://example.com:80/").unwrap(),
            "http://example.com/"
        );
    }

    #[test]
    fn test_custom_port_and_query_kept() {
        assert_eq!(
            canonicalize_target("http://example.com:8080/search?q=rust&page=2").unwrap(),
            "http://example.com:8080/search?q=rust&page=2"
        );
    }

    #[test]
    fn test_fragment_kept() {
        assert_eq!(
            canonicalize_target("https://example.com/doc#section-2").unwrap(),
            "https://example.com/doc#section-2"
        );
        assert_eq!(
            canonicalize_target("https://example.com:443/app?tab=1#/inbox").unwrap(),
            "https://example.com/app?tab=1#/inbox"
        );
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(
            canonicalize_target("  https://example.com/a  ").unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_rejects_relative_url() {
        assert!(matches!(
            canonicalize_target("example.com/path"),
            Err(TargetUrlError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        for input in [
            "javascript:alert(1)",
            "data:text/html,hi",
            "file:///etc/passwd",
            "ftp://example.com/file",
        ] {
            assert_eq!(
                canonicalize_target(input),
                Err(TargetUrlError::UnsupportedScheme),
                "{input}"
            );
        }
    }

    #[test]
    fn test_rejects_too_long() {
        let long = format!("https://example.com/{}", "a".repeat(MAX_TARGET_URL_LENGTH));
        assert_eq!(canonicalize_target(&long), Err(TargetUrlError::TooLong));
    }
}
