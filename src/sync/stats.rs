//! Per-run counters.

use std::fmt;

/// Counters accumulated during one sync run.
///
/// `Display` renders the summary line printed at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    downloaded: usize,
    failed: usize,
    existing: usize,
    skipped: usize,
}

impl SyncStats {
    /// Creates a stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Archives fetched and saved during this run.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.downloaded
    }

    /// Archives whose download failed (or whose filename was refused).
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Archives already present in the output directory.
    #[must_use]
    pub fn existing(&self) -> usize {
        self.existing
    }

    /// Archives excluded by the date bounds.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub(crate) fn record_downloaded(&mut self) {
        self.downloaded += 1;
    }

    pub(crate) fn record_failed(&mut self) {
        self.failed += 1;
    }

    pub(crate) fn record_existing(&mut self) {
        self.existing += 1;
    }

    pub(crate) fn record_skipped(&mut self) {
        self.skipped += 1;
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Done: {} downloaded, {} failed, {} already exist, {} skipped.",
            self.downloaded, self.failed, self.existing, self.skipped
        )
    }
}
