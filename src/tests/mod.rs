mod cache_tests;
mod store_tests;

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::store::{DATE_FORMAT, EmployeeRecord, IdentityCasePolicy, SqliteStore};

pub(crate) fn dt(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT).unwrap()
}

pub(crate) fn record(
    id: &str,
    name: &str,
    last_name: &str,
    division: &str,
    starts: [Option<&str>; 4],
    finishes: [Option<&str>; 4],
) -> EmployeeRecord {
    EmployeeRecord {
        employee_id: id.to_string(),
        employee_name: name.to_string(),
        employee_last_name: last_name.to_string(),
        employee_division: division.to_string(),
        starts: starts.map(|s| s.map(dt)),
        finishes: finishes.map(|s| s.map(dt)),
    }
}

/// Four employees: Sam finished in 8 days, Ana (CISO) finished in 5 days,
/// Bob is in progress, Eve has not started.
pub(crate) fn seeded_store() -> Arc<SqliteStore> {
    let store = SqliteStore::open_in_memory(IdentityCasePolicy::Exact).unwrap();
    store
        .insert(&record(
            "7",
            "Sam",
            "Smith",
            "ENGINEERING",
            [
                Some("2024-01-01 00:00:00"),
                Some("2024-01-01 00:00:00"),
                Some("2024-01-01 00:00:00"),
                Some("2024-01-01 00:00:00"),
            ],
            [
                Some("2024-01-02 00:00:00"),
                Some("2024-01-04 00:00:00"),
                Some("2024-01-06 00:00:00"),
                Some("2024-01-09 00:00:00"),
            ],
        ))
        .unwrap();
    store
        .insert(&record(
            "9",
            "Ana",
            "Lopez",
            "CISO",
            [
                Some("2024-02-01 00:00:00"),
                Some("2024-02-01 00:00:00"),
                Some("2024-02-01 00:00:00"),
                Some("2024-02-01 00:00:00"),
            ],
            [
                Some("2024-02-03 00:00:00"),
                Some("2024-02-04 00:00:00"),
                Some("2024-02-05 00:00:00"),
                Some("2024-02-06 00:00:00"),
            ],
        ))
        .unwrap();
    store
        .insert(&record(
            "12",
            "Bob",
            "Stone",
            "ENGINEERING",
            [
                Some("2024-03-01 00:00:00"),
                Some("2024-03-02 00:00:00"),
                None,
                None,
            ],
            [Some("2024-03-02 00:00:00"), None, None, None],
        ))
        .unwrap();
    store
        .insert(&record(
            "15",
            "Eve",
            "Adams",
            "SALES",
            [None, None, None, None],
            [None, None, None, None],
        ))
        .unwrap();
    Arc::new(store)
}
