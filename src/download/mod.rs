//! Authenticated HTTP access to the archives API.
//!
//! This module fetches the archive manifest and streams individual archives
//! to disk.
//!
//! # Features
//!
//! - One client per run, with the API token attached as a default header
//! - A single whole-request timeout shared by every request
//! - Streaming downloads into a `.part` file, renamed once complete
//! - Structured error types that tell network failures from disk failures
//!
//! # Example
//!
//! ```no_run
//! use papertrail_archives_core::download::{ARCHIVES_ENDPOINT, DEFAULT_TIMEOUT, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new("my-token", DEFAULT_TIMEOUT)?;
//! let archives = client.fetch_manifest(ARCHIVES_ENDPOINT).await?;
//! println!("{} archives available", archives.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;

pub use client::{HttpClient, part_path};
pub use constants::{ARCHIVES_ENDPOINT, DEFAULT_TIMEOUT, PART_SUFFIX, TOKEN_HEADER, USER_AGENT};
pub use error::DownloadError;
