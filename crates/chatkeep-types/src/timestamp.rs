//! Epoch-second conversions.
//!
//! Timestamps cross two boundaries as fractional epoch seconds: the SQLite
//! `REAL` columns and the `start_date` / `end_date` query parameters.

use chrono::{DateTime, Utc};

/// Convert a UTC timestamp to fractional epoch seconds (microsecond precision).
pub fn to_epoch_seconds(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp_micros() as f64 / 1_000_000.0
}

/// Convert fractional epoch seconds back to a UTC timestamp.
///
/// Returns `None` for non-finite or out-of-range input.
pub fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let micros = (secs * 1_000_000.0).round();
    if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_seconds() {
        let dt = from_epoch_seconds(1_700_000_000.0).unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
        assert_eq!(to_epoch_seconds(&dt), 1_700_000_000.0);
    }

    #[test]
    fn test_keeps_microseconds() {
        let dt = from_epoch_seconds(1_700_000_000.25).unwrap();
        assert_eq!(dt.timestamp_subsec_micros(), 250_000);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(from_epoch_seconds(f64::NAN).is_none());
        assert!(from_epoch_seconds(f64::INFINITY).is_none());
    }
}
