//! Date parsing for transaction records.
//!
//! The bank dataset writes dates day-first with either two- or four-digit
//! years (`2/8/16`, `1/1/1800`). ISO dates (`2016-08-02`) are accepted too so
//! that serialized records round-trip.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::error::IngestError;

/// Parse a record date in `d/m/yy`, `d/m/yyyy` or `yyyy-mm-dd` form.
///
/// Two-digit years follow chrono's `%y` window (`00..=68` → 2000s), which is
/// why [`crate::cleanse`] later moves implausible 21st-century birth years
/// back by one century.
pub fn parse_record_date(raw: &str) -> Result<NaiveDate, IngestError> {
    let trimmed = raw.trim();
    let invalid = || IngestError::InvalidDate(trimmed.to_string());

    if trimmed.contains('-') {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid());
    }

    let year_part = trimmed.rsplit('/').next().ok_or_else(invalid)?;
    let format = match year_part.len() {
        1 | 2 => "%d/%m/%y",
        4 => "%d/%m/%Y",
        _ => return Err(invalid()),
    };
    NaiveDate::parse_from_str(trimmed, format).map_err(|_| invalid())
}

pub(crate) fn deserialize_record_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_record_date(&raw).map_err(serde::de::Error::custom)
}
