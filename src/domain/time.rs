//! Date/time parsing for command arguments and Graph timestamps

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::domain::entities::DateTimeTimeZone;
use crate::domain::error::DomainError;

/// Default length of the calendar window when `--to` is omitted.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Parse a user supplied date or timestamp.
///
/// Accepts RFC 3339 (`2024-05-01T09:30:00+02:00`), a zone-less
/// `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) and a bare `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_date_time(input: &str) -> Result<DateTime<Utc>, DomainError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(DomainError::InvalidDateTime(input.to_string()))
}

/// Half-open time window `[start, end)` with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidTimeRange {
                start: to_rfc3339(&start),
                end: to_rfc3339(&end),
            });
        }
        Ok(Self { start, end })
    }

    /// Build a window from optional `--from`/`--to` arguments.
    ///
    /// `from` defaults to `now`, `to` defaults to `from` plus
    /// [`DEFAULT_WINDOW_DAYS`].
    pub fn from_args(
        from: Option<&str>,
        to: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let start = from.map(parse_date_time).transpose()?.unwrap_or(now);
        let end = match to {
            Some(t) => parse_date_time(t)?,
            None => start + Duration::days(DEFAULT_WINDOW_DAYS),
        };
        Self::new(start, end)
    }
}

/// RFC 3339 with second precision and a `Z` suffix, as Graph query parameters expect.
pub fn to_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Graph request body representation of a UTC instant.
pub fn to_graph(dt: &DateTime<Utc>) -> DateTimeTimeZone {
    DateTimeTimeZone {
        date_time: dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        time_zone: "UTC".into(),
    }
}

/// Shorten a Graph timestamp to `YYYY-MM-DD HH:MM` for display.
///
/// Falls back to the raw input when it cannot be parsed.
pub fn display_time(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn given_bare_date_when_parse_then_midnight_utc() {
        assert_eq!(parse_date_time("2024-05-01").unwrap(), utc(2024, 5, 1, 0, 0));
    }

    #[test]
    fn given_offset_timestamp_when_parse_then_converted_to_utc() {
        let dt = parse_date_time("2024-05-01T09:30:00+02:00").unwrap();
        assert_eq!(dt, utc(2024, 5, 1, 7, 30));
    }

    #[test]
    fn given_zoneless_minutes_when_parse_then_utc() {
        assert_eq!(
            parse_date_time("2024-05-01T14:15").unwrap(),
            utc(2024, 5, 1, 14, 15)
        );
    }

    #[test]
    fn given_garbage_when_parse_then_invalid_date_time() {
        assert_eq!(
            parse_date_time("next tuesday"),
            Err(DomainError::InvalidDateTime("next tuesday".into()))
        );
    }

    #[test]
    fn given_no_args_when_from_args_then_seven_day_window_from_now() {
        let now = utc(2024, 5, 1, 12, 0);
        let range = TimeRange::from_args(None, None, now).unwrap();
        assert_eq!(range.start, now);
        assert_eq!(range.end, utc(2024, 5, 8, 12, 0));
    }

    #[test]
    fn given_end_before_start_when_new_then_error() {
        let err = TimeRange::new(utc(2024, 5, 2, 0, 0), utc(2024, 5, 1, 0, 0)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimeRange { .. }));
    }

    #[test]
    fn given_equal_bounds_when_new_then_error() {
        let t = utc(2024, 5, 2, 0, 0);
        assert!(TimeRange::new(t, t).is_err());
    }

    #[test]
    fn given_graph_timestamp_when_display_then_minutes_precision() {
        assert_eq!(display_time("2024-05-01T09:00:00.0000000"), "2024-05-01 09:00");
        assert_eq!(display_time("2024-05-01T09:00:00Z"), "2024-05-01 09:00");
        assert_eq!(display_time("soon"), "soon");
    }

    #[test]
    fn given_instant_when_to_graph_then_utc_zone() {
        let body = to_graph(&utc(2024, 5, 1, 9, 0));
        assert_eq!(body.date_time, "2024-05-01T09:00:00");
        assert_eq!(body.time_zone, "UTC");
    }
}
