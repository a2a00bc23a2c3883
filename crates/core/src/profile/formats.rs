//! Date/time detection for cell values

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dataset::Value;

/// Granularity of a date/time value, ordered from coarsest to finest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatetimeGranularity {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DatetimeGranularity {
    /// The coarser of two granularities
    pub fn coarsest(self, other: Self) -> Self {
        self.min(other)
    }

    /// Comparable key of a timestamp with every component finer than this
    /// granularity zeroed
    pub fn truncate(self, dt: &NaiveDateTime) -> (i32, u32, u32, u32, u32, u32) {
        let month = if self >= Self::Month { dt.month() } else { 1 };
        let day = if self >= Self::Day { dt.day() } else { 1 };
        let hour = if self >= Self::Hour { dt.hour() } else { 0 };
        let minute = if self >= Self::Minute { dt.minute() } else { 0 };
        let second = if self >= Self::Second { dt.second() } else { 0 };
        (dt.year(), month, day, hour, minute, second)
    }
}

impl std::fmt::Display for DatetimeGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year => write!(f, "year"),
            Self::Month => write!(f, "month"),
            Self::Day => write!(f, "day"),
            Self::Hour => write!(f, "hour"),
            Self::Minute => write!(f, "minute"),
            Self::Second => write!(f, "second"),
        }
    }
}

impl std::str::FromStr for DatetimeGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            "minute" => Ok(Self::Minute),
            "second" => Ok(Self::Second),
            _ => Err(format!("Unknown datetime resolution: {s}")),
        }
    }
}

static YEAR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(1[0-9]|20)\d{2}$").unwrap());

static YEAR_MONTH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/](0?[1-9]|1[0-2])$").unwrap());

static OFFSET_DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$").unwrap()
});

const SECOND_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const MINUTE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M",
];

const DAY_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parse a string as a date/time, returning the value and the granularity
/// implied by its format
pub fn parse_datetime(value: &str) -> Option<(NaiveDateTime, DatetimeGranularity)> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if OFFSET_DATETIME_REGEX.is_match(value) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some((dt.naive_local(), DatetimeGranularity::Second));
        }
    }

    for fmt in SECOND_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some((dt, DatetimeGranularity::Second));
        }
    }

    for fmt in MINUTE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some((dt, DatetimeGranularity::Minute));
        }
    }

    for fmt in DAY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some((date.and_time(NaiveTime::MIN), DatetimeGranularity::Day));
        }
    }

    if let Some(caps) = YEAR_MONTH_REGEX.captures(value) {
        let year = caps[1].parse::<i32>().ok()?;
        let month = caps[2].parse::<u32>().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, 1)?;
        return Some((date.and_time(NaiveTime::MIN), DatetimeGranularity::Month));
    }

    if YEAR_REGEX.is_match(value) {
        let year = value.parse::<i32>().ok()?;
        let date = NaiveDate::from_ymd_opt(year, 1, 1)?;
        return Some((date.and_time(NaiveTime::MIN), DatetimeGranularity::Year));
    }

    None
}

/// Interpret a cell as a date/time
///
/// Native datetime cells report second granularity; text cells go through
/// [`parse_datetime`]. Numbers are never dates.
pub fn value_as_datetime(value: &Value) -> Option<(NaiveDateTime, DatetimeGranularity)> {
    match value {
        Value::DateTime(dt) => Some((*dt, DatetimeGranularity::Second)),
        Value::Text(s) => parse_datetime(s),
        _ => None,
    }
}

/// Whether a cell looks like a date/time
pub fn is_datetime(value: &Value) -> bool {
    value_as_datetime(value).is_some()
}
