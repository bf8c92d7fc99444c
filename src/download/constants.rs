//! Constants for the download module (endpoint, headers, timeouts).

use std::time::Duration;

/// Archives manifest endpoint of the Papertrail HTTP API.
pub const ARCHIVES_ENDPOINT: &str = "https://papertrailapp.com/api/v1/archives.json";

/// Header carrying the API token on every request.
pub const TOKEN_HEADER: &str = "X-Papertrail-Token";

/// Default whole-request HTTP timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Suffix of the in-progress file a download streams into before rename.
pub const PART_SUFFIX: &str = ".part";

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
