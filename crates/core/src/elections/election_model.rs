//! Election status derivation.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ParseError, Result};
use crate::records::Record;

/// Record field holding the opening boundary.
pub const FIELD_START: &str = "start";
/// Record field holding the closing boundary.
pub const FIELD_END: &str = "end";

/// The three mutually exclusive election phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl ElectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure status derivation from wall-clock time and the two boundaries.
/// Both boundary instants are inclusive: an election is ongoing exactly on
/// `start` and exactly on `end`.
pub fn status_at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> ElectionStatus {
    if now < start {
        ElectionStatus::Upcoming
    } else if now > end {
        ElectionStatus::Ended
    } else {
        ElectionStatus::Ongoing
    }
}

/// Derive the status of an election record at `now` from its declared
/// `start`/`end` fields.
pub fn status_of(record: &Record, now: DateTime<Utc>) -> Result<ElectionStatus> {
    let start = boundary_field(record, FIELD_START)?;
    let end = boundary_field(record, FIELD_END)?;
    Ok(status_at(start, end, now))
}

fn boundary_field(record: &Record, field: &str) -> Result<DateTime<Utc>> {
    let text = record
        .get_str(field)
        .ok_or_else(|| Error::structure(format!("election is missing '{field}'")))?;
    parse_boundary(text)
}

/// Parse a time boundary. Accepts RFC 3339, a naive `%Y-%m-%dT%H:%M:%S`
/// timestamp, or a bare `%Y-%m-%d` date (midnight UTC).
pub fn parse_boundary(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(Error::Parse(ParseError::Time {
        value: text.to_string(),
        reason: "expected RFC 3339, Y-m-dTH:M:S or Y-m-d".to_string(),
    }))
}
