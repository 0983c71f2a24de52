//! Event-date normalization.
//!
//! Producers send dates either as RFC 3339 or in the legacy US feed form
//! (`8/24/2017 2:35 PM -07:00`). Both are normalized to a UTC instant
//! before anything touches the store. A datetime without a UTC offset is
//! rejected rather than assumed to be in any particular zone.

use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

const LEGACY_OFFSET: &[BorrowedFormatItem<'static>] = format_description!(
    "[month padding:none]/[day padding:none]/[year] [hour repr:12 padding:none]:[minute] [period] [offset_hour sign:mandatory]:[offset_minute]"
);

const NAIVE_ISO: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const NAIVE_LEGACY: &[BorrowedFormatItem<'static>] = format_description!(
    "[month padding:none]/[day padding:none]/[year] [hour repr:12 padding:none]:[minute] [period]"
);

/// Why a date string could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("unparseable date string {0:?}")]
    Unparseable(String),
    #[error("date string {0:?} carries no UTC offset")]
    MissingOffset(String),
}

/// Parse a wire date string into a UTC instant.
pub fn normalize_event_date(raw: &str) -> Result<OffsetDateTime, DateError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(parsed.to_offset(UtcOffset::UTC));
    }
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, LEGACY_OFFSET) {
        return Ok(parsed.to_offset(UtcOffset::UTC));
    }

    // Parseable but offset-free input gets its own failure mode so callers
    // can tell bad data from ambiguous data.
    if PrimitiveDateTime::parse(trimmed, NAIVE_ISO).is_ok()
        || PrimitiveDateTime::parse(trimmed, NAIVE_LEGACY).is_ok()
    {
        return Err(DateError::MissingOffset(trimmed.to_owned()));
    }

    Err(DateError::Unparseable(trimmed.to_owned()))
}
