//! URL normalization so that the network and the cache agree on one spelling.

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

fn normalize(mut parsed: url::Url) -> Result<url::Url, UrlError> {
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str().map(str::to_lowercase) {
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);
    Ok(parsed)
}

/// Canonicalize an absolute URL string.
///
/// Trims whitespace, defaults a missing scheme to `https://`, lowercases the
/// host and drops the fragment. The query string is kept as-is.
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let with_scheme = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };
    let parsed = url::Url::parse(&with_scheme).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    normalize(parsed)
}

/// Resolve a possibly relative reference (`/about`, `img/a.png`) against `base`,
/// then canonicalize the result. Absolute inputs ignore `base`.
pub fn resolve(base: &url::Url, input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let joined = base.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    normalize(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_canonicalize_lowercase_host_and_drop_fragment() {
        let url = canonicalize("  https://EXAMPLE.COM/Path?a=1&b=2#top ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/Path?a=1&b=2");
    }

    #[test]
    fn test_canonicalize_rejects_other_schemes() {
        assert!(matches!(canonicalize("file:///etc/passwd"), Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = url::Url::parse("https://example.com/blog/").unwrap();
        let url = resolve(&base, "post-1#comments").unwrap();
        assert_eq!(url.as_str(), "https://example.com/blog/post-1");
    }

    #[test]
    fn test_resolve_root_relative() {
        let base = url::Url::parse("https://example.com/blog/").unwrap();
        assert_eq!(resolve(&base, "/about").unwrap().as_str(), "https://example.com/about");
    }

    #[test]
    fn test_resolve_absolute_ignores_base() {
        let base = url::Url::parse("https://example.com/").unwrap();
        assert_eq!(resolve(&base, "http://Other.org/x").unwrap().as_str(), "http://other.org/x");
    }
}
