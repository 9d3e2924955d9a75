//! Requests that must never be intercepted.

use regex::RegexSet;

use netfirst_core::Request;

/// URL patterns whose requests bypass the cache entirely.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPolicy {
    patterns: Option<RegexSet>,
}

impl ExclusionPolicy {
    /// Compile `patterns` as regular expressions matched against request URLs.
    ///
    /// A pattern set that fails to compile excludes nothing.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(|p| p.as_ref().to_string()).collect();
        if patterns.is_empty() {
            return Self::default();
        }

        match RegexSet::new(&patterns) {
            Ok(set) => Self { patterns: Some(set) },
            Err(e) => {
                tracing::warn!(error = %e, count = patterns.len(), "invalid excluded path patterns, excluding nothing");
                Self::default()
            }
        }
    }

    pub fn is_excluded(&self, request: &Request) -> bool {
        self.patterns
            .as_ref()
            .is_some_and(|set| set.is_match(&request.url))
    }
}
