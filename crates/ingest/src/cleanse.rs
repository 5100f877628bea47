//! Birth-date cleansing applied before aggregation.
//!
//! Two defects in the source data are handled here:
//!
//! - a sentinel birth year (1800 by default) standing in for "unknown";
//!   those rows are dropped.
//! - two-digit birth years parsed into the wrong century (a 1957 birth read
//!   as 2057); those are moved back by exactly 100 years. February 29th
//!   clamps to February 28th when the target year is not a leap year.
use chrono::{Datelike, Months};
use tracing::info;

use crate::config::CleanseConfig;
use crate::error::IngestError;
use crate::types::{CleanseReport, TransactionRecord};

const ONE_CENTURY: Months = Months::new(12 * 100);

/// Drop sentinel birth dates and repair century-shifted ones.
///
/// Record order is preserved for the rows that survive.
pub fn cleanse(
    records: Vec<TransactionRecord>,
    cfg: &CleanseConfig,
) -> Result<(Vec<TransactionRecord>, CleanseReport), IngestError> {
    cfg.validate()?;

    let mut report = CleanseReport {
        input: records.len(),
        ..CleanseReport::default()
    };
    let mut kept = Vec::with_capacity(records.len());

    for mut record in records {
        let year = record.customer_dob.year();
        if year == cfg.sentinel_birth_year {
            report.dropped_sentinel_dob += 1;
            continue;
        }
        if year > cfg.century_shift_after {
            let shifted = record
                .customer_dob
                .checked_sub_months(ONE_CENTURY)
                .ok_or_else(|| IngestError::InvalidDate(record.customer_dob.to_string()))?;
            record.customer_dob = shifted;
            report.shifted_dob += 1;
        }
        kept.push(record);
    }

    info!(
        input = report.input,
        retained = report.retained(),
        dropped_sentinel_dob = report.dropped_sentinel_dob,
        shifted_dob = report.shifted_dob,
        "cleanse_complete"
    );

    Ok((kept, report))
}
