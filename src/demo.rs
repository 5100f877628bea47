//! Sample data for the `custsim` binary, doctests and benchmarks.

use chrono::{NaiveDate, TimeDelta};
use features::QueryRecord;
use ingest::{IngestError, TransactionRecord, parse_record_date};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `(customer, transaction date, birth date, location, balance, amount)`
/// in the source's day-first export format.
const DEMO_ROWS: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("C1001", "2/8/16", "10/1/94", "MUMBAI", 17819.05, 25.0),
    ("C1001", "3/8/16", "10/1/94", "MUMBAI", 17794.05, 120.0),
    ("C1002", "2/8/16", "4/4/57", "DELHI", 2270.69, 27999.0),
    ("C1003", "1/8/16", "26/11/96", "MUMBAI", 17874.44, 459.0),
    ("C1003", "5/8/16", "26/11/96", "PUNE", 17415.44, 459.0),
    ("C1003", "6/8/16", "26/11/96", "MUMBAI", 16956.44, 2060.0),
    ("C1004", "2/8/16", "14/9/73", "BANGALORE", 866503.21, 1762.5),
    ("C1005", "3/8/16", "24/3/88", "MUMBAI", 6714.43, 1499.0),
    ("C1006", "4/8/16", "1/1/1800", "DELHI", 94695.61, 676.0),
    ("C1007", "4/8/16", "8/7/72", "DELHI", 7584.09, 150.0),
    ("C1007", "7/8/16", "8/7/72", "DELHI", 7434.09, 300.0),
    ("C1008", "5/8/16", "12/12/90", "PUNE", 53609.2, 35.0),
    ("C1009", "6/8/16", "5/2/82", "BANGALORE", 973.46, 566.0),
    ("C1010", "7/8/16", "30/6/85", "PUNE", 95075.54, 50.0),
    ("C1011", "8/8/16", "9/9/60", "DELHI", 410000.0, 9000.0),
    ("C1012", "8/8/16", "19/3/99", "MUMBAI", 1200.0, 75.0),
    ("C1013", "2/8/16", "15/5/79", "MUMBAI", 30500.0, 800.0),
    ("C1013", "9/8/16", "15/5/79", "DELHI", 29700.0, 800.0),
];

const CITIES: &[&str] = &[
    "MUMBAI",
    "DELHI",
    "PUNE",
    "BANGALORE",
    "CHENNAI",
    "KOLKATA",
    "HYDERABAD",
    "JAIPUR",
    "AHMEDABAD",
    "LUCKNOW",
];

/// A small hand-written batch: one sentinel birth date, one two-digit-year
/// birth date that needs shifting, and one customer with a tied location.
pub fn demo_transactions() -> Result<Vec<TransactionRecord>, IngestError> {
    DEMO_ROWS
        .iter()
        .map(|&(customer, date, dob, location, balance, amount)| {
            Ok(TransactionRecord {
                customer_id: customer.to_string(),
                transaction_date: parse_record_date(date)?,
                amount,
                account_balance: balance,
                customer_dob: parse_record_date(dob)?,
                location: location.to_string(),
            })
        })
        .collect()
}

/// Single-transaction lookups against the demo batch.
pub fn demo_queries() -> Result<Vec<QueryRecord>, IngestError> {
    Ok(vec![
        QueryRecord {
            query_id: "Q1".into(),
            location: "MUMBAI".into(),
            account_balance: 15000.0,
            amount: 90.0,
            customer_dob: parse_record_date("3/2/95")?,
        },
        QueryRecord {
            query_id: "Q2".into(),
            location: "DELHI".into(),
            account_balance: 420000.0,
            amount: 8700.0,
            customer_dob: parse_record_date("1/1/1961")?,
        },
        QueryRecord {
            query_id: "Q3".into(),
            location: "SURAT".into(),
            account_balance: 5000.0,
            amount: 300.0,
            customer_dob: parse_record_date("1980-06-15")?,
        },
    ])
}

/// `customers * per_customer` random transactions, reproducible per `seed`.
///
/// Each customer keeps one birth date; locations, balances and amounts vary
/// per transaction.
pub fn synthetic_transactions(
    customers: usize,
    per_customer: usize,
    seed: u64,
) -> Vec<TransactionRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let epoch = NaiveDate::default();
    let mut records = Vec::with_capacity(customers * per_customer);

    for customer in 0..customers {
        // 1950-01-01 .. 2000-12-31
        let dob = epoch + TimeDelta::days(rng.random_range(-7_305..=11_322));
        for _ in 0..per_customer {
            records.push(TransactionRecord {
                customer_id: format!("S{customer:06}"),
                // August 2016
                transaction_date: epoch + TimeDelta::days(rng.random_range(17_014..17_045)),
                amount: (rng.random_range(1.0..50_000.0_f64) * 100.0).round() / 100.0,
                account_balance: (rng.random_range(0.0..1_000_000.0_f64) * 100.0).round() / 100.0,
                customer_dob: dob,
                location: CITIES[rng.random_range(0..CITIES.len())].to_string(),
            });
        }
    }
    records
}
