//! Human-readable event timestamps.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

use eme_logger_core::Value;

/// Rendering of a timestamp that does not map to a date.
pub const INVALID_DATE: &str = "Invalid Date";

/// Largest absolute epoch offset, in milliseconds, that is a valid date.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

const DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Render an epoch offset in milliseconds as local date/time text, e.g.
/// `Thu Jan 01 1970 00:00:00 GMT+0000`.
pub fn render_timestamp(value: &Value) -> String {
    render_timestamp_in(value, &Local)
}

/// Render an epoch offset in milliseconds in the given time zone.
///
/// `null` counts as zero; anything else that is not a finite number in
/// range renders as [`INVALID_DATE`]. Fractional milliseconds are
/// truncated.
pub fn render_timestamp_in<Tz>(value: &Value, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let millis = match value {
        Value::Null => 0.0,
        Value::Number(n) if n.is_finite() && n.abs() <= MAX_EPOCH_MILLIS => n.trunc(),
        _ => return INVALID_DATE.to_string(),
    };

    match DateTime::from_timestamp_millis(millis as i64) {
        Some(utc) => utc.with_timezone(tz).format(DATE_FORMAT).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    #[test]
    fn test_epoch() {
        assert_eq!(
            render_timestamp_in(&Value::Number(0.0), &Utc),
            "Thu Jan 01 1970 00:00:00 GMT+0000"
        );
    }

    #[test]
    fn test_offset_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            render_timestamp_in(&Value::Number(1_500_000_000_123.9), &tz),
            "Fri Jul 14 2017 04:40:00 GMT+0200"
        );
    }

    #[test]
    fn test_null_is_epoch() {
        assert!(render_timestamp_in(&Value::Null, &Utc).contains("1970"));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(render_timestamp(&Value::Undefined), INVALID_DATE);
        assert_eq!(render_timestamp(&Value::Number(f64::NAN)), INVALID_DATE);
        assert_eq!(render_timestamp(&Value::Number(9e15)), INVALID_DATE);
        assert_eq!(render_timestamp(&Value::from("yesterday")), INVALID_DATE);
    }

    #[test]
    fn test_local_is_a_date() {
        assert_ne!(render_timestamp(&Value::Number(1e12)), INVALID_DATE);
    }
}
