//! Start time parsing and rendering in the caller's zone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use tracing::debug;

/// Display form of event times, e.g. `Jan 2, 2006 3:04:05 PM`.
pub const DISPLAY_FORMAT: &str = "%b %-d, %Y %-I:%M:%S %p";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolves an IANA zone name, falling back to UTC for unknown names.
pub fn caller_zone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        debug!(zone = name, "Unknown time zone, using UTC");
        Tz::UTC
    })
}

/// Parses a start time written by the caller.
///
/// RFC 3339 input carries its own offset. Every other accepted form is
/// read as wall-clock time in `tz`; a date alone means midnight. Returns
/// `None` for unrecognized input and for wall-clock times that do not
/// exist in `tz`. Ambiguous times resolve to the earlier instant.
pub fn parse_start(input: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(tz));
    }

    let naive = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    tz.from_local_datetime(&naive).earliest()
}

pub fn display<Z: TimeZone>(when: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    when.format(DISPLAY_FORMAT).to_string()
}
