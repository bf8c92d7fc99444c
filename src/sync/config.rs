//! Run configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::date::Date;
use crate::download::{ARCHIVES_ENDPOINT, DEFAULT_TIMEOUT};

/// Optional date window applied to archive filenames.
///
/// `since` is inclusive, `before` is exclusive. Filenames start with their
/// `YYYY-MM-DD` day, so the bounds are plain string comparisons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateBounds {
    /// Exclude archives earlier than this day.
    pub since: Option<Date>,
    /// Exclude archives on or after this day.
    pub before: Option<Date>,
}

impl DateBounds {
    /// Returns true when `filename` falls outside the window.
    ///
    /// Both bounds are checked independently; matching both still counts as
    /// a single exclusion.
    #[must_use]
    pub fn excludes(&self, filename: &str) -> bool {
        let too_old = self
            .since
            .as_ref()
            .is_some_and(|since| filename < since.as_str());
        let too_new = self
            .before
            .as_ref()
            .is_some_and(|before| filename >= before.as_str());
        too_old || too_new
    }
}

/// Everything one sync run needs, built once at startup.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// API token sent with every request.
    pub token: String,
    /// Directory archives are saved into.
    pub output_dir: PathBuf,
    /// Whole-request timeout for the manifest and every archive.
    pub timeout: Duration,
    /// Date window for eligible archives.
    pub bounds: DateBounds,
    /// Manifest endpoint.
    pub api_url: String,
}

impl SyncConfig {
    /// Creates a configuration with defaults: current directory, 30s timeout,
    /// no date bounds, the public archives endpoint.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            output_dir: PathBuf::from("."),
            timeout: DEFAULT_TIMEOUT,
            bounds: DateBounds::default(),
            api_url: ARCHIVES_ENDPOINT.to_string(),
        }
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets the HTTP timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the date window.
    #[must_use]
    pub fn with_bounds(mut self, bounds: DateBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Overrides the manifest endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// True when a non-blank token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(s: &str) -> Option<Date> {
        Some(Date::parse(s).unwrap())
    }

    #[test]
    fn test_unbounded_excludes_nothing() {
        let bounds = DateBounds::default();
        assert!(bounds.since.is_none() && bounds.before.is_none());
        assert!(!bounds.excludes("2024-01-01.tsv.gz"));
    }

    #[test]
    fn test_since_is_inclusive() {
        let bounds = DateBounds {
            since: day("2024-01-02"),
            before: None,
        };
        assert!(bounds.excludes("2024-01-01.tsv.gz"));
        assert!(!bounds.excludes("2024-01-02.tsv.gz"));
        assert!(!bounds.excludes("2024-01-03.tsv.gz"));
    }

    #[test]
    fn test_before_is_exclusive() {
        let bounds = DateBounds {
            since: None,
            before: day("2024-01-02"),
        };
        assert!(!bounds.excludes("2024-01-01.tsv.gz"));
        assert!(bounds.excludes("2024-01-02.tsv.gz"));
        assert!(bounds.excludes("2024-01-03.tsv.gz"));
    }

    #[test]
    fn test_inverted_window_excludes_everything() {
        let bounds = DateBounds {
            since: day("2024-01-05"),
            before: day("2024-01-02"),
        };
        for name in ["2024-01-01.tsv.gz", "2024-01-03.tsv.gz", "2024-01-06.tsv.gz"] {
            assert!(bounds.excludes(name), "{name} should be excluded");
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = SyncConfig::new("tok");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_url, ARCHIVES_ENDPOINT);
        assert!(config.bounds.since.is_none() && config.bounds.before.is_none());
        assert!(config.has_token());
    }

    #[test]
    fn test_blank_token_is_not_a_token() {
        assert!(!SyncConfig::new("").has_token());
        assert!(!SyncConfig::new("   ").has_token());
    }
}
