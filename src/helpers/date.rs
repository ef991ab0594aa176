//! Date helper functions

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

/// Posts at least this many whole years old are flagged as outdated
pub const OUTDATED_AFTER_YEARS: i64 = 1;

/// Whole calendar years from `from` to `to`, truncated toward zero
///
/// Both instants are read as wall-clock time in `tz`, so a post published on
/// 2020-03-01 in Seoul turns one year old on 2021-03-01 in Seoul.
pub fn whole_years_between(from: DateTime<Utc>, to: DateTime<Utc>, tz: Tz) -> i64 {
    if to < from {
        return -whole_years_between(to, from, tz);
    }

    let from = from.with_timezone(&tz);
    let to = to.with_timezone(&tz);

    let mut years = i64::from(to.year() - from.year());
    let from_rest = (
        from.month(),
        from.day(),
        from.hour(),
        from.minute(),
        from.second(),
        from.nanosecond(),
    );
    let to_rest = (
        to.month(),
        to.day(),
        to.hour(),
        to.minute(),
        to.second(),
        to.nanosecond(),
    );
    if to_rest < from_rest {
        years -= 1;
    }
    years
}

/// Whether a post this many years old gets the outdated note
pub fn is_outdated(years: i64) -> bool {
    years >= OUTDATED_AFTER_YEARS
}

/// Format an instant in ISO 8601 / XML format in the site timezone
pub fn date_xml(date: DateTime<Utc>, tz: Tz) -> String {
    date.with_timezone(&tz)
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}
