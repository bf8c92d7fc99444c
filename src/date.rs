//! Calendar-day values used as `--since` / `--before` bounds.
//!
//! A [`Date`] is always stored in `YYYY-MM-DD` form. Because archive filenames
//! embed the same encoding as a prefix, bounds are compared against filenames
//! with plain string ordering.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Days, NaiveDate, Utc};
use regex::Regex;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed-width `YYYY-MM-DD` shape. Calendar validity is checked separately.
#[allow(clippy::expect_used)]
static DAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("day regex is valid") // Static pattern, safe to panic
});

/// Error returned when a date argument cannot be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date: {input:?} (expected YYYY-MM-DD, today/tod or yesterday/yest)")]
pub struct DateError {
    /// The rejected input text.
    pub input: String,
}

/// A calendar day in `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(String);

impl Date {
    /// Parses a date argument.
    ///
    /// Accepts `today`/`tod`, `yesterday`/`yest` (resolved against the current
    /// UTC day) and literal `YYYY-MM-DD` days. Literal days must be real
    /// calendar days: `2024-02-30` and `2024-13-40` are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DateError`] when the text is neither an alias nor a valid day.
    pub fn parse(input: &str) -> Result<Self, DateError> {
        match input {
            "today" | "tod" => return Ok(Self::today()),
            "yesterday" | "yest" => return Ok(Self::yesterday()),
            _ => {}
        }

        let invalid = || DateError {
            input: input.to_string(),
        };
        if !DAY_PATTERN.is_match(input) {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| invalid())?;
        Ok(Self(input.to_string()))
    }

    /// The current UTC day.
    #[must_use]
    pub fn today() -> Self {
        Self::from_naive(Utc::now().date_naive())
    }

    /// The UTC day before [`Date::today`].
    #[must_use]
    pub fn yesterday() -> Self {
        let today = Utc::now().date_naive();
        Self::from_naive(today.checked_sub_days(Days::new(1)).unwrap_or(today))
    }

    /// Builds a date from a chrono day.
    #[must_use]
    pub fn from_naive(day: NaiveDate) -> Self {
        Self(day.format(DATE_FORMAT).to_string())
    }

    /// Returns the `YYYY-MM-DD` text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
