//! ISO-8601 duration decoding for catalog meeting lengths.
//!
//! The catalog reports how long a meeting runs as a `PT<n>H<n>M<n>S` string
//! (`PT1H30M`, `PT50M`, ...). Only the shape is validated here; the span is
//! added to a meeting's start time when a timeslot is rendered.

use chrono::Duration;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(?P<hours>\d+)H)?(?:(?P<minutes>\d+)M)?(?:(?P<seconds>\d+)S)?$").unwrap()
});

/// Errors from decoding a duration string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    /// Input does not match the `PT<n>H<n>M<n>S` shape.
    #[error("malformed duration {0:?}; expected PT followed by H/M/S components")]
    Malformed(String),

    /// Components are shaped correctly but overflow span arithmetic.
    #[error("duration {0:?} is out of range")]
    OutOfRange(String),
}

/// Decodes a catalog duration string into a time span.
///
/// Each of the hour/minute/second components may be independently absent and
/// contributes zero when it is, so `PT45M` and `PT2H` are both valid. No
/// upper bound is enforced beyond what the span arithmetic itself can hold;
/// the catalog is the source of these strings and occasionally emits odd but
/// well-formed values.
pub fn parse_duration(raw: &str) -> Result<Duration, DurationParseError> {
    let caps = DURATION_RE
        .captures(raw)
        .ok_or_else(|| DurationParseError::Malformed(raw.to_string()))?;

    let component = |name: &str| -> Result<i64, DurationParseError> {
        match caps.name(name) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| DurationParseError::OutOfRange(raw.to_string())),
            None => Ok(0),
        }
    };

    let out_of_range = || DurationParseError::OutOfRange(raw.to_string());
    let hours = Duration::try_hours(component("hours")?).ok_or_else(out_of_range)?;
    let minutes = Duration::try_minutes(component("minutes")?).ok_or_else(out_of_range)?;
    let seconds = Duration::try_seconds(component("seconds")?).ok_or_else(out_of_range)?;

    hours
        .checked_add(&minutes)
        .and_then(|span| span.checked_add(&seconds))
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_and_minutes() {
        assert_eq!(parse_duration("PT1H30M").unwrap(), Duration::minutes(90));
    }

    #[test]
    fn test_minutes_only() {
        assert_eq!(parse_duration("PT45M").unwrap(), Duration::minutes(45));
    }

    #[test]
    fn test_hours_only() {
        assert_eq!(parse_duration("PT2H").unwrap(), Duration::hours(2));
    }

    #[test]
    fn test_zero_seconds() {
        assert_eq!(parse_duration("PT0S").unwrap(), Duration::zero());
    }

    #[test]
    fn test_all_components() {
        let expected = Duration::hours(2) + Duration::minutes(15) + Duration::seconds(10);
        assert_eq!(parse_duration("PT2H15M10S").unwrap(), expected);
    }

    #[test]
    fn test_bare_prefix_is_zero() {
        // The catalog has been seen emitting "PT" for meetings with no
        // reported length; every component absent sums to zero.
        assert_eq!(parse_duration("PT").unwrap(), Duration::zero());
    }

    #[test]
    fn test_malformed_inputs() {
        for raw in ["garbage", "", "1H30M", "PT30", "PTM", "PT1h30m", "PT1H30M "] {
            assert!(
                matches!(parse_duration(raw), Err(DurationParseError::Malformed(_))),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_overflow_is_out_of_range() {
        assert!(matches!(
            parse_duration("PT99999999999999999999H"),
            Err(DurationParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_large_but_representable_values_pass() {
        assert_eq!(parse_duration("PT99H").unwrap(), Duration::hours(99));
    }
}
