//! Timestamp storage format.
//!
//! Rows written by this crate carry RFC 3339 UTC text with microsecond
//! precision, which sorts lexically in time order. Rows filled by the
//! `CURRENT_TIMESTAMP` column default (`YYYY-MM-DD HH:MM:SS`) are accepted
//! on read.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

const SQLITE_DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
#[error("unrecognized timestamp: {0}")]
pub struct TimestampParseError(String);

/// Current time at storage precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn to_db(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse(raw: &str) -> Result<DateTime<Utc>, TimestampParseError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, SQLITE_DEFAULT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampParseError(raw.to_string()))
}

/// Read a nullable timestamp column.
pub(crate) fn column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        parse(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}
