//! Timestamp → calendar day truncation for the `date` field.

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Truncate an ISO-8601 timestamp to its calendar day, as written (no
/// conversion to UTC). Accepts RFC 3339, offset-less ISO-8601 date-times
/// and bare `YYYY-MM-DD` dates.
pub fn day_from_timestamp(s: &str) -> Result<Date, String> {
    let s = s.trim();
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(dt.date());
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Iso8601::DEFAULT) {
        return Ok(dt.date());
    }
    if let Ok(dt) = PrimitiveDateTime::parse(s, &Iso8601::DEFAULT) {
        return Ok(dt.date());
    }
    let naive = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ];
    for fmt in naive {
        if let Ok(dt) = PrimitiveDateTime::parse(s, fmt) {
            return Ok(dt.date());
        }
    }
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("invalid date {s:?}: {e}"))
}

/// `YYYY-MM-DD`.
pub fn format_day(d: Date) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
}
