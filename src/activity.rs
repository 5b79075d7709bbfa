use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::PostMarker;

/// An account whose latest post is younger than this many days is active
pub const ACTIVITY_THRESHOLD_DAYS: i64 = 90;

/// `ACTIVITY_THRESHOLD_DAYS` as a duration
pub fn activity_threshold() -> Duration {
    Duration::days(ACTIVITY_THRESHOLD_DAYS)
}

/// Activity class of an existing account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Active,
    Inactive,
    Closed,
}

/// Classify an account by its last-post marker
///
/// Total over every marker: `protected` is bucketed with `closed`, and an
/// absent marker or an unparseable timestamp is inactive, never active.
pub fn classify(marker: &PostMarker, now: DateTime<Utc>) -> ActivityStatus {
    match marker {
        PostMarker::Closed | PostMarker::Protected => ActivityStatus::Closed,
        PostMarker::Absent => ActivityStatus::Inactive,
        PostMarker::Timestamp(raw) => match parse_timestamp(raw) {
            Some(ts) if now.signed_duration_since(ts) < activity_threshold() => {
                ActivityStatus::Active
            }
            _ => ActivityStatus::Inactive,
        },
    }
}

/// Parse a last-post timestamp
///
/// Accepts RFC 3339 (what the scraper writes), a naive date-time taken as UTC,
/// or a bare date at midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
