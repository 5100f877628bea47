//! Per-customer aggregation of cleansed transactions.
//!
//! One [`CustomerProfile`] is produced per distinct customer id, sorted by id:
//!
//! - `total_amount` / `average_amount`: sum and mean of transaction amounts
//! - `most_common_location`: see [`most_common_location`]
//! - `age`: whole years between the first-seen birth date and `as_of`
//! - `last_balance`: balance of the latest-dated transaction; equal dates
//!   resolve to the row that appears later in the input
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::types::{CustomerProfile, TransactionRecord};

/// Mean Gregorian year length in days.
const DAYS_PER_YEAR: f64 = 365.2425;

/// Most frequent value of `locations`.
///
/// Returns `None` for an empty input and when the highest frequency is shared
/// by more than one distinct value: there is no majority location to report.
pub fn most_common_location<'a, I>(locations: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for location in locations {
        *counts.entry(location).or_insert(0) += 1;
    }

    let top = counts.values().copied().max()?;
    let mut leaders = counts.iter().filter(|(_, count)| **count == top);
    let (winner, _) = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }
    Some((*winner).to_string())
}

/// Age in whole years at `as_of`, rounded to the nearest year.
pub fn age_at(dob: NaiveDate, as_of: NaiveDate) -> i64 {
    let days = (as_of - dob).num_days() as f64;
    (days / DAYS_PER_YEAR).round() as i64
}

struct Accumulator<'a> {
    total: f64,
    count: usize,
    locations: Vec<&'a str>,
    dob: NaiveDate,
    last_date: NaiveDate,
    last_balance: f64,
}

/// Reduce transaction rows into one profile per customer.
///
/// `as_of` is the reference date for ages; it is explicit so aggregation is
/// reproducible. Customer ids are grouped verbatim: `" C1"` and `"C1"` are
/// different customers. An id that is empty or only whitespace is rejected.
pub fn aggregate(
    records: &[TransactionRecord],
    as_of: NaiveDate,
) -> Result<Vec<CustomerProfile>, IngestError> {
    let start = Instant::now();
    let mut groups: BTreeMap<&str, Accumulator<'_>> = BTreeMap::new();

    for (row, record) in records.iter().enumerate() {
        let customer_id = record.customer_id.as_str();
        if customer_id.trim().is_empty() {
            return Err(IngestError::MissingCustomerId { row });
        }
        if !record.amount.is_finite() {
            return Err(IngestError::NonFiniteValue {
                row,
                field: "amount",
            });
        }
        if !record.account_balance.is_finite() {
            return Err(IngestError::NonFiniteValue {
                row,
                field: "account_balance",
            });
        }

        let acc = groups.entry(customer_id).or_insert_with(|| Accumulator {
            total: 0.0,
            count: 0,
            locations: Vec::new(),
            dob: record.customer_dob,
            last_date: record.transaction_date,
            last_balance: record.account_balance,
        });
        acc.total += record.amount;
        acc.count += 1;
        acc.locations.push(record.location.as_str());
        if record.transaction_date >= acc.last_date {
            acc.last_date = record.transaction_date;
            acc.last_balance = record.account_balance;
        }
    }

    let profiles: Vec<CustomerProfile> = groups
        .into_iter()
        .map(|(customer_id, acc)| {
            let most_common = most_common_location(acc.locations.iter().copied());
            if most_common.is_none() {
                debug!(customer_id, "no_majority_location");
            }
            CustomerProfile {
                customer_id: customer_id.to_string(),
                total_amount: acc.total,
                average_amount: acc.total / acc.count as f64,
                most_common_location: most_common,
                age: age_at(acc.dob, as_of),
                last_balance: acc.last_balance,
                transaction_count: acc.count,
            }
        })
        .collect();

    info!(
        records = records.len(),
        customers = profiles.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "aggregate_success"
    );

    Ok(profiles)
}
