//! Papertrail Archives Core Library
//!
//! This library downloads the log archives listed by the Papertrail HTTP API
//! into a local directory, fetching only the ones that are missing.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`archive`] - Manifest entries and their ordering
//! - [`date`] - Calendar-day values used as date bounds
//! - [`download`] - Authenticated HTTP client with streaming downloads
//! - [`sync`] - The sync run: filter, reconcile against disk, report

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod date;
pub mod download;
pub mod sync;

// Re-export commonly used types
pub use archive::{Archive, sort_newest_first};
pub use date::{Date, DateError};
pub use download::{ARCHIVES_ENDPOINT, DEFAULT_TIMEOUT, DownloadError, HttpClient};
pub use sync::{ArchiveSync, DateBounds, SyncConfig, SyncError, SyncStats};
