mod contact;
mod contact_detail;
mod patch;
mod reminder;
mod stats;
mod task;

pub use contact::*;
pub use contact_detail::*;
pub use patch::Patch;
pub use reminder::*;
pub use stats::*;
pub use task::*;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CrmError, FieldErrors, Result};

/// Storage form of a timestamp. Fixed width, so SQL string comparison is
/// chronological.
pub fn to_db_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a user-supplied date. Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]`,
/// `YYYY-MM-DDTHH:MM[:SS]` and a bare `YYYY-MM-DD` (midnight). Naive values
/// are taken as UTC.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Trim; blank becomes `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A present required field must not be blank; absent keeps the stored value.
pub(crate) fn non_blank(
    errors: &mut FieldErrors,
    field: &str,
    message: &str,
    value: Option<String>,
) -> Option<String> {
    match value {
        Some(v) if v.trim().is_empty() => {
            errors.push(field, message);
            None
        }
        Some(v) => Some(v.trim().to_string()),
        None => None,
    }
}

pub(crate) fn required_text(field: &str, message: &str, value: Option<String>) -> Result<String> {
    optional_text(value).ok_or_else(|| CrmError::field(field, message))
}

/// Parse an optional enumeration value; blank is treated as absent.
pub(crate) fn enum_field<T>(field: &str, value: Option<String>) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    optional_text(value)
        .map(|s| s.parse::<T>().map_err(|e| CrmError::field(field, e)))
        .transpose()
}

pub(crate) fn datetime_field(field: &str, value: &str) -> Result<DateTime<Utc>> {
    parse_datetime(value).ok_or_else(|| CrmError::field(field, format!("Invalid date: {}", value)))
}

pub(crate) fn uuid_field(field: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| CrmError::field(field, format!("Invalid id: {}", value)))
}
