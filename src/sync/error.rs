//! Error types for the sync run.
//!
//! Every variant here is fatal: the run stops and the process exits non-zero.
//! Per-archive download failures are not errors at this level; they are
//! counted in [`SyncStats`](super::SyncStats) and the run continues.

use std::path::PathBuf;

use thiserror::Error;

use crate::download::DownloadError;

/// Fatal errors that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No API token was configured.
    #[error(
        "Papertrail token required (--token <TOKEN> or PAPERTRAIL_API_TOKEN), see https://papertrailapp.com/account/profile"
    )]
    MissingToken,

    /// The HTTP client could not be built from the configuration.
    #[error("cannot set up HTTP client")]
    Client(#[source] DownloadError),

    /// The manifest could not be fetched or decoded.
    #[error("cannot fetch a list of archives")]
    Manifest(#[source] DownloadError),

    /// The output directory is missing and could not be created.
    #[error("cannot create output directory {path}")]
    CreateOutputDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A downloaded archive could not be saved.
    #[error("cannot save {filename}")]
    Write {
        /// Manifest filename of the archive.
        filename: String,
        /// The underlying write error.
        #[source]
        source: DownloadError,
    },
}
