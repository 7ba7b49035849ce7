//! Remote last-modified dates
//!
//! The portal reports dates as `day.month.year` with no time of day. They are
//! parsed once, at node construction, into an absolute Unix timestamp
//! (midnight of that day in a [`DateZone`]); everything downstream compares
//! timestamps only.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mirror_fs::FileTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Format of remote dates, e.g. `05.03.2021`.
pub const REMOTE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Time zone in which a remote calendar date starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateZone {
    /// The machine's local zone
    #[default]
    Local,
    Utc,
}

/// A parsed remote last-modified date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDate {
    raw: String,
    timestamp: i64,
}

impl RemoteDate {
    /// Parse a `day.month.year` date as local midnight.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_in(raw, DateZone::Local)
    }

    /// Parse a `day.month.year` date as midnight in `zone`.
    pub fn parse_in(raw: &str, zone: DateZone) -> Result<Self> {
        let trimmed = raw.trim();
        let malformed = |reason: String| Error::MalformedDate {
            value: raw.to_string(),
            reason,
        };

        let date = NaiveDate::parse_from_str(trimmed, REMOTE_DATE_FORMAT)
            .map_err(|e| malformed(format!("expected day.month.year ({})", e)))?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| malformed("no midnight for this date".to_string()))?;

        let timestamp = match zone {
            DateZone::Utc => Utc.from_utc_datetime(&midnight).timestamp(),
            DateZone::Local => Local
                .from_local_datetime(&midnight)
                .earliest()
                .ok_or_else(|| {
                    malformed("midnight does not exist in the local time zone".to_string())
                })?
                .timestamp(),
        };

        Ok(Self {
            raw: trimmed.to_string(),
            timestamp,
        })
    }

    /// The date exactly as the portal reported it (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn to_file_time(&self) -> FileTime {
        FileTime::from_unix_time(self.timestamp, 0)
    }

    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Whether this remote date is strictly newer than a local mtime.
    pub fn is_newer_than(&self, local: FileTime) -> bool {
        self.to_file_time() > local
    }
}

impl std::fmt::Display for RemoteDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
