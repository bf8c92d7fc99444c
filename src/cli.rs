//! CLI argument definitions using clap derive macros.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use clap::Parser;
use regex::Regex;

use papertrail_archives_core::{ARCHIVES_ENDPOINT, Date, DateBounds, SyncConfig};

/// One or more `<number><unit>` terms: `30s`, `1m30s`, `1.5s`, `300us`, `2h45m`.
#[allow(clippy::expect_used)]
static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|s|m|h))+$")
        .expect("duration regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static DURATION_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d*)(?:\.(\d*))?(ns|us|µs|μs|ms|s|m|h)")
        .expect("duration term regex is valid") // Static pattern, safe to panic
});

/// Long flags that may also be written with a single dash (`-token abc`,
/// `-since=2024-01-01`).
const SINGLE_DASH_LONG_FLAGS: &[&str] = &["token", "timeout", "before", "since"];

/// Fraction digits kept per duration term; anything finer than this is below
/// nanosecond resolution for every unit.
const MAX_FRACTION_DIGITS: usize = 20;

/// Download Papertrail log archives that are missing locally.
///
/// Fetches the archive list from the Papertrail API, newest first, and saves
/// every archive that is not already present in the output directory.
#[derive(Parser)]
#[command(name = "papertrail-archives")]
#[command(author, version, about)]
pub struct Args {
    /// Papertrail HTTP API token from https://papertrailapp.com/account/profile
    #[arg(
        long,
        env = "PAPERTRAIL_API_TOKEN",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub token: String,

    /// Output directory
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Timeout for HTTP operations (e.g. 30s, 1.5s, 1m30s, 500ms; bare numbers are seconds)
    #[arg(long, default_value = "30s", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Only download logs before (NOT including) this date: YYYY-MM-DD, today/tod, yesterday/yest
    #[arg(long)]
    pub before: Option<Date>,

    /// Only download logs on or after this date: YYYY-MM-DD, today/tod, yesterday/yest
    #[arg(long)]
    pub since: Option<Date>,

    /// Suppress progress and summary output (warnings and errors are still shown)
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Archives manifest endpoint
    #[arg(long, default_value = ARCHIVES_ENDPOINT, hide = true)]
    pub api_url: String,
}

impl Args {
    /// Builds the run configuration from the parsed flags.
    pub fn into_config(self) -> SyncConfig {
        SyncConfig::new(self.token)
            .with_output_dir(self.output_dir)
            .with_timeout(self.timeout)
            .with_bounds(DateBounds {
                since: self.since,
                before: self.before,
            })
            .with_api_url(self.api_url)
    }
}

// Hand-written so the token never reaches the logs.
impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("output_dir", &self.output_dir)
            .field("timeout", &self.timeout)
            .field("before", &self.before)
            .field("since", &self.since)
            .field("quiet", &self.quiet)
            .field("verbose", &self.verbose)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Rewrites single-dash spellings of the long flags (`-token`, `-timeout`,
/// `-before`, `-since`, with or without `=value`) to their `--` form.
///
/// The first element (program name) and everything after a bare `--` are
/// left alone.
pub fn normalize_single_dash_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut options_ended = false;
    for (index, arg) in args.into_iter().map(Into::into).enumerate() {
        if index == 0 || options_ended {
            normalized.push(arg);
            continue;
        }
        if arg == "--" {
            options_ended = true;
            normalized.push(arg);
            continue;
        }
        let rewritten = arg.to_str().and_then(single_dash_to_long);
        normalized.push(rewritten.map_or(arg, OsString::from));
    }
    normalized
}

fn single_dash_to_long(arg: &str) -> Option<String> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    SINGLE_DASH_LONG_FLAGS
        .contains(&name)
        .then(|| format!("-{arg}"))
}

/// Parses a timeout in Go duration syntax (`30s`, `1.5s`, `1m30s`, `300us`,
/// `2h45m`); a bare number is taken as seconds.
fn parse_timeout(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let duration = if let Ok(secs) = input.parse::<u64>() {
        Duration::from_secs(secs)
    } else if DURATION_PATTERN.is_match(input) {
        let too_large = || format!("timeout value too large: {input:?}");
        let mut total_nanos: u128 = 0;
        for term in DURATION_TERM.captures_iter(input) {
            let unit_nanos: u128 = match &term[3] {
                "ns" => 1,
                "us" | "µs" | "μs" => 1_000,
                "ms" => 1_000_000,
                "s" => 1_000_000_000,
                "m" => 60_000_000_000,
                _ => 3_600_000_000_000,
            };
            let whole: u128 = match &term[1] {
                "" => 0,
                digits => digits.parse().map_err(|_| too_large())?,
            };
            let mut nanos = whole.checked_mul(unit_nanos).ok_or_else(too_large)?;

            let fraction = term.get(2).map_or("", |m| m.as_str());
            let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            if !fraction.is_empty() {
                let numerator: u128 = fraction.parse().map_err(|_| too_large())?;
                let scale = 10_u128.pow(u32::try_from(fraction.len()).map_err(|_| too_large())?);
                nanos = nanos.saturating_add(numerator * unit_nanos / scale);
            }
            total_nanos = total_nanos.saturating_add(nanos);
        }
        Duration::from_nanos(u64::try_from(total_nanos).map_err(|_| too_large())?)
    } else {
        return Err(format!(
            "invalid duration {input:?} (expected e.g. 30s, 1.5s, 1m30s, 500ms)"
        ));
    };

    if duration.is_zero() {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["papertrail-archives", "--token", "abc"]).unwrap();
        assert_eq!(args.token, "abc");
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.timeout, Duration::from_secs(30));
        assert!(args.before.is_none());
        assert!(args.since.is_none());
        assert!(!args.quiet);
        assert_eq!(args.verbose, 0);
        assert_eq!(args.api_url, ARCHIVES_ENDPOINT);
    }

    #[test]
    fn test_cli_output_dir_short_and_long() {
        let args = Args::try_parse_from(["papertrail-archives", "-o", "/tmp/a"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("/tmp/a"));

        let args = Args::try_parse_from(["papertrail-archives", "--output-dir", "/tmp/b"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("/tmp/b"));
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["papertrail-archives", "-q"]).unwrap();
        assert!(args.quiet);

        let args = Args::try_parse_from(["papertrail-archives", "--quiet"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["papertrail-archives", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_date_bounds_parse() {
        let args = Args::try_parse_from([
            "papertrail-archives",
            "--since",
            "2024-01-01",
            "--before",
            "2024-02-01",
        ])
        .unwrap();
        assert_eq!(args.since.unwrap().as_str(), "2024-01-01");
        assert_eq!(args.before.unwrap().as_str(), "2024-02-01");
    }

    #[test]
    fn test_cli_date_aliases_parse() {
        let args =
            Args::try_parse_from(["papertrail-archives", "--before", "tod", "--since", "yest"])
                .unwrap();
        assert_eq!(args.before.unwrap(), Date::today());
        assert_eq!(args.since.unwrap(), Date::yesterday());
    }

    #[test]
    fn test_cli_invalid_date_rejected() {
        let result = Args::try_parse_from(["papertrail-archives", "--since", "2024-13-40"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_timeout_forms() {
        let cases = [
            ("45", Duration::from_secs(45)),
            ("10s", Duration::from_secs(10)),
            ("2m", Duration::from_secs(120)),
            ("1h", Duration::from_secs(3600)),
            ("1m30s", Duration::from_secs(90)),
            ("500ms", Duration::from_millis(500)),
            ("1.5s", Duration::from_millis(1500)),
            (".5s", Duration::from_millis(500)),
            ("300us", Duration::from_micros(300)),
            ("300µs", Duration::from_micros(300)),
            ("250ns", Duration::from_nanos(250)),
            ("1m0.5s", Duration::from_millis(60_500)),
            ("2h45m", Duration::from_secs(2 * 3600 + 45 * 60)),
        ];
        for (input, expected) in cases {
            let args = Args::try_parse_from(["papertrail-archives", "--timeout", input]).unwrap();
            assert_eq!(args.timeout, expected, "input {input}");
        }
    }

    #[test]
    fn test_cli_invalid_timeout_rejected() {
        for input in ["abc", "10x", "0", "0s", "-5s", "", "1.s.5", ".s", "5 s", "99999999999h"] {
            let result = Args::try_parse_from(["papertrail-archives", "--timeout", input]);
            assert!(result.is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_cli_into_config_carries_every_flag() {
        let args = Args::try_parse_from([
            "papertrail-archives",
            "--token",
            "tok",
            "-o",
            "/tmp/out",
            "--timeout",
            "5s",
            "--since",
            "2024-01-01",
            "--api-url",
            "http://127.0.0.1:1/archives.json",
        ])
        .unwrap();
        let config = args.into_config();
        assert_eq!(config.token, "tok");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.bounds.since.unwrap().as_str(), "2024-01-01");
        assert!(config.bounds.before.is_none());
        assert_eq!(config.api_url, "http://127.0.0.1:1/archives.json");
    }

    #[test]
    fn test_cli_debug_redacts_token() {
        let args = Args::try_parse_from(["papertrail-archives", "--token", "s3cr3t"]).unwrap();
        let rendered = format!("{args:?}");
        assert!(!rendered.contains("s3cr3t"), "token leaked: {rendered}");
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_cli_single_dash_long_flags_are_accepted() {
        let argv = normalize_single_dash_flags([
            "papertrail-archives",
            "-token",
            "abc",
            "-timeout",
            "1m",
            "-since",
            "2024-01-01",
            "-before=2024-02-01",
            "-o",
            "/tmp/out",
            "-q",
        ]);
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.token, "abc");
        assert_eq!(args.timeout, Duration::from_secs(60));
        assert_eq!(args.since.unwrap().as_str(), "2024-01-01");
        assert_eq!(args.before.unwrap().as_str(), "2024-02-01");
        assert_eq!(args.output_dir, PathBuf::from("/tmp/out"));
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_single_dash_token_with_equals() {
        let argv = normalize_single_dash_flags(["papertrail-archives", "-token=abc"]);
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.token, "abc");
    }

    #[test]
    fn test_normalize_leaves_other_arguments_alone() {
        let argv = normalize_single_dash_flags([
            "-token",
            "--token",
            "-vv",
            "-tokens",
            "value",
            "--",
            "-since",
        ]);
        let expected: Vec<OsString> =
            ["-token", "--token", "-vv", "-tokens", "value", "--", "-since"]
                .into_iter()
                .map(OsString::from)
                .collect();
        assert_eq!(argv, expected);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["papertrail-archives", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["papertrail-archives", "--invalid-flag"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
