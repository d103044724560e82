//! Short codes that must never be issued or resolved through the public redirect path.
//!
//! The set is built from the router's own top-level path segments so that a
//! short code can never shadow a system endpoint, plus any extra segments the
//! operator configures (e.g. paths served by a reverse proxy in front of us).

use std::collections::HashSet;

/// Case-sensitive set of codes refused as short codes.
#[derive(Debug, Clone, Default)]
pub struct ReservedCodes {
    codes: HashSet<String>,
}

impl ReservedCodes {
    /// Builds the set from route segments and configured extras.
    ///
    /// Leading and trailing slashes are stripped and empty entries ignored, so
    /// both `"/health"` and `"health"` reserve the same code.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = segments
            .into_iter()
            .map(|s| s.as_ref().trim().trim_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { codes }
    }

    /// The router's own top-level segments plus configured extras.
    pub fn from_routes<I, S>(extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = crate::routes::system_segments().map(str::to_string);
        let extras = extras.into_iter().map(|s| s.as_ref().to_string());

        Self::new(segments.into_iter().chain(extras))
    }

    /// Returns true if `code` is reserved.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
