//! Scan analytics
//!
//! Pure aggregation of scan history into per-day counts, plus coarse
//! device classification from the raw User-Agent string.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use woothee::parser::Parser;

use crate::storage::ScanRecord;

/// Scans of one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyScans {
    pub day: NaiveDate,
    pub count: u64,
}

/// Group scan timestamps by calendar day (UTC)
///
/// Records without a timestamp are excluded. The result contains one entry
/// per observed day, sorted chronologically; days with zero scans are never
/// synthesized.
pub fn daily_scan_counts<I>(timestamps: I) -> Vec<DailyScans>
where
    I: IntoIterator<Item = Option<DateTime<Utc>>>,
{
    use std::collections::BTreeMap;

    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for ts in timestamps.into_iter().flatten() {
        *per_day.entry(ts.date_naive()).or_insert(0) += 1;
    }

    per_day
        .into_iter()
        .map(|(day, count)| DailyScans { day, count })
        .collect()
}

/// Group a scan history by calendar day
pub fn aggregate_scans(scans: &[ScanRecord]) -> Vec<DailyScans> {
    daily_scan_counts(scans.iter().map(|s| Some(s.scanned_at)))
}

/// Derive a coarse device category from a User-Agent string
///
/// Returns woothee's category (`pc`, `smartphone`, `mobilephone`,
/// `crawler`, ...), or `None` when the UA is absent or unrecognizable.
pub fn classify_device(user_agent: Option<&str>) -> Option<String> {
    let ua = user_agent?.trim();
    if ua.is_empty() {
        return None;
    }

    let parser = Parser::new();
    let result = parser.parse(ua)?;
    match result.category {
        "UNKNOWN" | "" => None,
        category => Some(category.to_string()),
    }
}
