//! Venue timestamp normalization
//!
//! The venue reports timestamp columns as naive local strings in exchange
//! time (US Central), with an optional companion column carrying
//! microseconds. Analysis and file naming use US Eastern.

use chrono::{Duration, NaiveDateTime, TimeZone};
use chrono_tz::America::{Chicago, New_York};
use chrono_tz::Tz;

use crate::error::{Error, Result};

/// Parse a venue-local timestamp string into an Eastern-aware instant,
/// folding in the microseconds column when the feed provides one.
pub fn parse_venue_time(raw: &str, micros: Option<i64>) -> Result<chrono::DateTime<Tz>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|_| Error::BadTimestamp(raw.to_string()))?;
    let central = Chicago
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| Error::BadTimestamp(raw.to_string()))?;
    let mut eastern = central.with_timezone(&New_York);
    if let Some(us) = micros {
        eastern += Duration::microseconds(us);
    }
    Ok(eastern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_central_converts_to_eastern() {
        let ts = parse_venue_time("2021-04-07 10:30:00", None).unwrap();
        assert_eq!(ts.hour(), 11);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_micros_column_is_folded_in() {
        let ts = parse_venue_time("2021-04-07 10:30:00", Some(250_000)).unwrap();
        assert_eq!(ts.timestamp_subsec_micros(), 250_000);
    }

    #[test]
    fn test_fractional_seconds_in_the_string() {
        let ts = parse_venue_time("2021-04-07 10:30:00.5", None).unwrap();
        assert_eq!(ts.timestamp_subsec_micros(), 500_000);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_venue_time("not a time", None).is_err());
    }
}
