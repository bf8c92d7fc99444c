//! Archive manifest entries as returned by the archives API.

use serde::Deserialize;

/// One archive listed in the manifest.
///
/// Only the fields the sync needs are decoded; the API returns more
/// (`start`, `end`, `filesize`, ...) which are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Archive {
    /// Archive filename, prefixed with the day it covers (`2024-01-03.tsv.gz`).
    pub filename: String,
    /// Missing and `null` both decode to `None`.
    #[serde(rename = "_links", default)]
    links: Option<ArchiveLinks>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ArchiveLinks {
    #[serde(default)]
    download: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Link {
    #[serde(default)]
    href: Option<String>,
}

impl Archive {
    /// Creates an entry directly, mainly for tests and tooling.
    #[must_use]
    pub fn new(filename: impl Into<String>, download_url: Option<&str>) -> Self {
        Self {
            filename: filename.into(),
            links: Some(ArchiveLinks {
                download: download_url.map(|href| Link {
                    href: Some(href.to_string()),
                }),
            }),
        }
    }

    /// Download link for this archive, if the manifest provided a non-empty one.
    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.download.as_ref())
            .and_then(|link| link.href.as_deref())
            .filter(|href| !href.is_empty())
    }
}

/// Sorts archives so the most recent filename comes first.
pub fn sort_newest_first(archives: &mut [Archive]) {
    archives.sort_by(|a, b| b.filename.cmp(&a.filename));
}
