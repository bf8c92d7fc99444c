//! HTTP client wrapper for the archives API.
//!
//! This module provides the `HttpClient` struct which fetches the manifest
//! and streams archives to disk with a single shared timeout.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{PART_SUFFIX, TOKEN_HEADER, USER_AGENT};
use super::error::DownloadError;
use crate::archive::Archive;

/// Authenticated HTTP client for the archives API.
///
/// Created once per run and reused for the manifest and every archive, so
/// connections are pooled. The API token travels as a default header.
///
/// # Example
///
/// ```no_run
/// use papertrail_archives_core::download::HttpClient;
/// use std::path::Path;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new("my-token", Duration::from_secs(30))?;
/// let bytes = client
///     .download_to_path("https://example.com/2024-01-01.tsv.gz", Path::new("./2024-01-01.tsv.gz"))
///     .await?;
/// println!("Downloaded {bytes} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client that sends `token` on every request and gives up on
    /// any request (including reading its body) after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the token is not a valid
    /// header value or the underlying client cannot be built.
    pub fn new(token: &str, timeout: Duration) -> Result<Self, DownloadError> {
        let mut token_value = HeaderValue::from_str(token)
            .map_err(|_| DownloadError::client_build("API token contains invalid characters"))?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let token_header = HeaderName::from_bytes(TOKEN_HEADER.as_bytes())
            .map_err(|e| DownloadError::client_build(e.to_string()))?;
        headers.insert(token_header, token_value);
        debug!(header = TOKEN_HEADER, ?timeout, "building HTTP client");

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DownloadError::client_build(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetches and decodes the archive manifest.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the request fails, the status is not 2xx,
    /// or the body is not a JSON array of archive entries.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_manifest(&self, url: &str) -> Result<Vec<Archive>, DownloadError> {
        let archives: Vec<Archive> = self.fetch_json(url).await?;
        debug!(count = archives.len(), "manifest decoded");
        Ok(archives)
    }

    /// Fetches `url` and decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_manifest`](Self::fetch_manifest).
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DownloadError> {
        let response = self.send_request(url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        serde_json::from_slice(&body).map_err(|e| DownloadError::decode(url, e))
    }

    /// Streams `url` into `destination`, returning the number of bytes written.
    ///
    /// The body is written to `<destination>.part` and renamed over
    /// `destination` only once it has been fully received, flushed and
    /// synced to disk. On any failure the part file is removed.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout) or the status is not 2xx
    /// - Writing or renaming the file fails ([`DownloadError::Io`])
    #[instrument(skip(self), fields(url = %url, path = %destination.display()))]
    pub async fn download_to_path(
        &self,
        url: &str,
        destination: &Path,
    ) -> Result<u64, DownloadError> {
        debug!("starting download");
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.send_request(url).await?;

        let part = part_path(destination);
        let mut file = create_part_file(&part).await?;

        let bytes_written = match stream_to_file(&mut file, response, url, &part).await {
            Ok(bytes) => bytes,
            Err(error) => {
                debug!(path = %part.display(), "cleaning up partial file after error");
                drop(file);
                let _ = tokio::fs::remove_file(&part).await;
                return Err(error);
            }
        };
        commit_part_file(file, &part, destination).await?;

        debug!(bytes = bytes_written, "download complete");
        Ok(bytes_written)
    }

    async fn send_request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

/// Path of the in-progress file used while downloading to `destination`.
#[must_use]
pub fn part_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

async fn create_part_file(path: &Path) -> Result<File, DownloadError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o644);
    options
        .open(path)
        .await
        .map_err(|e| DownloadError::io(path, e))
}

/// Syncs the finished part file to disk and renames it over `destination`.
/// The part file is removed if either step fails.
async fn commit_part_file(
    file: File,
    part: &Path,
    destination: &Path,
) -> Result<(), DownloadError> {
    if let Err(source) = file.sync_all().await {
        drop(file);
        let _ = tokio::fs::remove_file(part).await;
        return Err(DownloadError::io(part, source));
    }
    drop(file);

    if let Err(source) = tokio::fs::rename(part, destination).await {
        let _ = tokio::fs::remove_file(part).await;
        return Err(DownloadError::io(destination, source));
    }
    Ok(())
}

async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}
