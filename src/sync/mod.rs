//! Archive sync: mirror the manifest into a local directory.
//!
//! A run fetches the manifest, orders it newest first and walks it once:
//!
//! 1. entries without a download link are warned about and ignored;
//! 2. entries outside the date bounds are counted as skipped;
//! 3. entries already on disk are counted as existing;
//! 4. everything else is downloaded.
//!
//! A failed download is counted and the walk continues, so the next run
//! picks it up again. A failure to write to disk aborts the run.

mod config;
mod error;
mod stats;

use std::path::{Component, Path};

use tracing::{debug, info, instrument, warn};

use crate::archive::{Archive, sort_newest_first};
use crate::download::HttpClient;

pub use config::{DateBounds, SyncConfig};
pub use error::SyncError;
pub use stats::SyncStats;

/// A configured sync run.
#[derive(Debug)]
pub struct ArchiveSync {
    config: SyncConfig,
    client: HttpClient,
}

impl ArchiveSync {
    /// Validates the configuration and builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingToken`] before any network activity when
    /// the token is blank, or [`SyncError::Client`] if the client cannot be
    /// built.
    pub fn new(config: SyncConfig) -> Result<Self, SyncError> {
        if !config.has_token() {
            return Err(SyncError::MissingToken);
        }
        let client = HttpClient::new(&config.token, config.timeout).map_err(SyncError::Client)?;
        Ok(Self { config, client })
    }

    /// Runs the full sync: fetch the manifest, then reconcile it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Manifest`] if the manifest cannot be fetched, and
    /// the errors of [`reconcile`](Self::reconcile).
    pub async fn run(&self) -> Result<SyncStats, SyncError> {
        info!("Fetching a list of archives...");
        let mut archives = self
            .client
            .fetch_manifest(&self.config.api_url)
            .await
            .map_err(SyncError::Manifest)?;
        info!(count = archives.len(), "Fetched archive list");

        sort_newest_first(&mut archives);

        let stats = self.reconcile(&archives).await?;
        info!("{stats}");
        Ok(stats)
    }

    /// Walks `archives` in order, downloading every eligible archive that is
    /// missing from the output directory.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::CreateOutputDir`] or [`SyncError::Write`] when the
    /// disk side fails. Network failures on individual archives are counted,
    /// not returned.
    #[instrument(skip(self, archives), fields(count = archives.len(), output_dir = %self.config.output_dir.display()))]
    pub async fn reconcile(&self, archives: &[Archive]) -> Result<SyncStats, SyncError> {
        let output_dir = &self.config.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| SyncError::CreateOutputDir {
                path: output_dir.clone(),
                source,
            })?;

        let mut stats = SyncStats::new();

        for archive in archives {
            let Some(url) = archive.download_url() else {
                warn!(filename = %archive.filename, "Skipping entry with no URL");
                continue;
            };

            if self.config.bounds.excludes(&archive.filename) {
                debug!(filename = %archive.filename, "outside date bounds");
                stats.record_skipped();
                continue;
            }

            let Some(name) = local_file_name(&archive.filename) else {
                warn!(filename = %archive.filename, "Refusing to save archive with unsafe filename");
                stats.record_failed();
                continue;
            };

            let destination = output_dir.join(name);
            if tokio::fs::metadata(&destination).await.is_ok() {
                debug!(filename = %archive.filename, "already exists");
                stats.record_existing();
                continue;
            }

            info!("Downloading {}...", archive.filename);
            match self.client.download_to_path(url, &destination).await {
                Ok(bytes) => {
                    debug!(filename = %archive.filename, bytes, "saved");
                    stats.record_downloaded();
                }
                Err(source) if source.is_write_failure() => {
                    return Err(SyncError::Write {
                        filename: archive.filename.clone(),
                        source,
                    });
                }
                Err(error) => {
                    warn!(filename = %archive.filename, error = %error, "cannot download archive");
                    stats.record_failed();
                }
            }
        }

        Ok(stats)
    }
}

/// Returns the filename as a single relative path component, or `None` if
/// joining it onto the output directory could escape that directory.
fn local_file_name(filename: &str) -> Option<&Path> {
    let path = Path::new(filename);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == path.as_os_str() => Some(path),
        _ => None,
    }
}
