// File: prizebot-core/src/giveaway/duration.rs
//
// Human duration strings ("30m", "1.5h", "2 days", "90000") to milliseconds.

use once_cell::sync::Lazy;
use regex::Regex;

use prizebot_common::Error;

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const YEAR: f64 = DAY * 365.25;

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<value>\d*\.?\d+) *(?P<unit>milliseconds?|msecs?|ms|seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|w|years?|yrs?|y)?$",
    )
    .expect("duration pattern is valid")
});

/// Parses a human duration. A bare number is taken as milliseconds.
/// Zero, negative or unrecognised input fails with `InvalidDuration`.
pub fn parse_duration(raw: &str) -> Result<i64, Error> {
    let trimmed = raw.trim();
    let caps = DURATION_RE
        .captures(trimmed)
        .ok_or_else(|| Error::InvalidDuration(raw.to_string()))?;

    let value: f64 = caps["value"]
        .parse()
        .map_err(|_| Error::InvalidDuration(raw.to_string()))?;

    let unit = caps
        .name("unit")
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_else(|| "ms".to_string());

    let factor = match unit.as_str() {
        "y" | "yr" | "yrs" | "year" | "years" => YEAR,
        "w" | "week" | "weeks" => WEEK,
        "d" | "day" | "days" => DAY,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE,
        "s" | "sec" | "secs" | "second" | "seconds" => SECOND,
        _ => 1.0,
    };

    let millis = (value * factor).round();
    if !millis.is_finite() || millis < 1.0 || millis > i64::MAX as f64 {
        return Err(Error::InvalidDuration(raw.to_string()));
    }
    Ok(millis as i64)
}

/// Short English rendering used in thread intros, e.g. `1m`, `90s`, `2h`.
pub fn format_duration(ms: i64) -> String {
    let secs = ms / 1000;
    if secs > 0 && secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs > 0 && secs % 3_600 == 0 {
        format!("{}h", secs / 3_600)
    } else if secs > 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else if secs > 0 {
        format!("{secs}s")
    } else {
        format!("{ms}ms")
    }
}
