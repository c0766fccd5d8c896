//! Calendar date helpers
//!
//! Close-approach times are UTC with minute precision. The dataset writes
//! them as `YYYY-Mon-DD hh:mm` (e.g. `2020-Jan-01 12:30`); output uses
//! `YYYY-MM-DD HH:MM`.

use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Format used by the close-approach dataset
const CD_FORMAT: &str = "%Y-%b-%d %H:%M";
/// Format used for output and accepted as input
const ISO_MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a close-approach calendar date (`2020-Jan-01 12:30` or `2020-01-01 12:30`)
pub fn parse_cd(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, CD_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, ISO_MINUTE_FORMAT))
        .map(truncate_to_minute)
        .map_err(|_| Error::InvalidDate(text.to_string()))
}

/// Render a timestamp as `YYYY-MM-DD HH:MM`
pub fn format_cd(time: &NaiveDateTime) -> String {
    time.format(ISO_MINUTE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` calendar day
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_string()))
}

/// Drop seconds and sub-second precision
pub fn truncate_to_minute(time: NaiveDateTime) -> NaiveDateTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}
