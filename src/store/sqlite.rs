use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::cache::TtlCache;
use crate::store::{
    DATE_FORMAT, DIVISION_CISO, EmployeeRecord, EmployeeStore, NUM_VIDEOS, TrainingStatus,
    parse_date, summarize, TrainingSummary,
};

const ANALYTICS_CACHE_TTL: Duration = Duration::from_secs(300);
const ANALYTICS_CACHE_MAXSIZE: usize = 128;

const FINISH_COLUMNS: [&str; NUM_VIDEOS] = [
    "finish_first_video",
    "finish_second_video",
    "finish_third_video",
    "finish_fourth_video",
];

const RECORD_COLUMNS: &str = "employee_id, employee_name, employee_last_name, employee_division, \
     start_first_video, finish_first_video, start_second_video, finish_second_video, \
     start_third_video, finish_third_video, start_fourth_video, finish_fourth_video";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS employees (
    employee_id TEXT NOT NULL,
    employee_name TEXT NOT NULL,
    employee_last_name TEXT NOT NULL DEFAULT '',
    employee_division TEXT NOT NULL DEFAULT '',
    start_first_video TEXT,
    finish_first_video TEXT,
    start_second_video TEXT,
    finish_second_video TEXT,
    start_third_video TEXT,
    finish_third_video TEXT,
    start_fourth_video TEXT,
    finish_fourth_video TEXT
)";

/// Whether id/name comparisons match exactly or fold case. A deployment
/// choice; it must be applied consistently to every lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityCasePolicy {
    Exact,
    IgnoreCase,
}

impl IdentityCasePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "exact" => Some(IdentityCasePolicy::Exact),
            "ignore-case" => Some(IdentityCasePolicy::IgnoreCase),
            _ => None,
        }
    }

    fn identity_clause(&self) -> &'static str {
        match self {
            IdentityCasePolicy::Exact => "employee_id = ?1 AND employee_name = ?2",
            IdentityCasePolicy::IgnoreCase => {
                "employee_id = ?1 COLLATE NOCASE AND employee_name = ?2 COLLATE NOCASE"
            }
        }
    }
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
    case_policy: IdentityCasePolicy,
    status_cache: TtlCache<Vec<EmployeeRecord>>,
    summary_cache: TtlCache<TrainingSummary>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>, case_policy: IdentityCasePolicy) -> anyhow::Result<Self> {
        let conn = Connection::open(path.as_ref()).with_context(|| {
            format!("failed to open employee database {}", path.as_ref().display())
        })?;
        Self::with_connection(conn, case_policy)
    }

    pub fn open_in_memory(case_policy: IdentityCasePolicy) -> anyhow::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, case_policy)
    }

    fn with_connection(
        conn: Connection,
        case_policy: IdentityCasePolicy,
    ) -> anyhow::Result<Self> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
            case_policy,
            status_cache: TtlCache::new(ANALYTICS_CACHE_TTL, ANALYTICS_CACHE_MAXSIZE),
            summary_cache: TtlCache::new(ANALYTICS_CACHE_TTL, ANALYTICS_CACHE_MAXSIZE),
        })
    }

    /// Data loading for tests and fixtures; the serving path never writes.
    pub fn insert(&self, record: &EmployeeRecord) -> anyhow::Result<()> {
        let fmt = |t: &Option<chrono::NaiveDateTime>| {
            t.map(|t| t.format(DATE_FORMAT).to_string())
        };
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "INSERT INTO employees VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                record.employee_id,
                record.employee_name,
                record.employee_last_name,
                record.employee_division,
                fmt(&record.starts[0]),
                fmt(&record.finishes[0]),
                fmt(&record.starts[1]),
                fmt(&record.finishes[1]),
                fmt(&record.starts[2]),
                fmt(&record.finishes[2]),
                fmt(&record.starts[3]),
                fmt(&record.finishes[3]),
            ],
        )?;
        self.status_cache.clear();
        self.summary_cache.clear();
        Ok(())
    }

    fn status_condition(status: TrainingStatus) -> String {
        let all_finished = FINISH_COLUMNS
            .map(|col| format!("{col} IS NOT NULL"))
            .join(" AND ");
        match status {
            TrainingStatus::Finished => all_finished,
            TrainingStatus::NotStarted => FINISH_COLUMNS
                .map(|col| format!("{col} IS NULL"))
                .join(" AND "),
            TrainingStatus::InProgress => {
                let any_finished = FINISH_COLUMNS
                    .map(|col| format!("{col} IS NOT NULL"))
                    .join(" OR ");
                format!("({any_finished}) AND NOT ({all_finished})")
            }
        }
    }

    fn scan_by_status(&self, status: TrainingStatus) -> anyhow::Result<Vec<EmployeeRecord>> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM employees WHERE {} ORDER BY rowid",
            Self::status_condition(status)
        );
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([], record_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<EmployeeRecord> {
    let date = |idx: usize| -> rusqlite::Result<Option<chrono::NaiveDateTime>> {
        Ok(parse_date(row.get::<_, Option<String>>(idx)?.as_deref()))
    };
    Ok(EmployeeRecord {
        employee_id: row.get(0)?,
        employee_name: row.get(1)?,
        employee_last_name: row.get(2)?,
        employee_division: row.get(3)?,
        starts: [date(4)?, date(6)?, date(8)?, date(10)?],
        finishes: [date(5)?, date(7)?, date(9)?, date(11)?],
    })
}

impl EmployeeStore for SqliteStore {
    fn exists(&self, employee_id: &str, employee_name: &str) -> anyhow::Result<bool> {
        let query = format!(
            "SELECT 1 FROM employees WHERE {} LIMIT 1",
            self.case_policy.identity_clause()
        );
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let found = conn
            .query_row(&query, params![employee_id, employee_name], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn is_ciso(&self, employee_id: &str, employee_name: &str) -> anyhow::Result<bool> {
        let query = format!(
            "SELECT 1 FROM employees WHERE {} AND employee_division = ?3 LIMIT 1",
            self.case_policy.identity_clause()
        );
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let found = conn
            .query_row(
                &query,
                params![employee_id, employee_name, DIVISION_CISO],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn get_record(
        &self,
        employee_id: &str,
        employee_name: &str,
    ) -> anyhow::Result<Option<EmployeeRecord>> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM employees WHERE {} LIMIT 1",
            self.case_policy.identity_clause()
        );
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let record = conn
            .query_row(&query, params![employee_id, employee_name], record_from_row)
            .optional()?;
        Ok(record)
    }

    fn get_by_status(&self, status: TrainingStatus) -> anyhow::Result<Vec<EmployeeRecord>> {
        if let Some(hit) = self.status_cache.get(status.as_str()) {
            tracing::debug!(status = %status, "analytics cache hit");
            return Ok(hit);
        }
        let records = self.scan_by_status(status)?;
        self.status_cache
            .insert(status.as_str().to_string(), records.clone());
        Ok(records)
    }

    fn get_summary(&self) -> anyhow::Result<TrainingSummary> {
        if let Some(hit) = self.summary_cache.get("summary") {
            tracing::debug!("summary cache hit");
            return Ok(hit);
        }
        let finished = self.get_by_status(TrainingStatus::Finished)?;
        let in_progress = self.get_by_status(TrainingStatus::InProgress)?;
        let not_started = self.get_by_status(TrainingStatus::NotStarted)?;
        let summary = summarize(&finished, in_progress.len(), not_started.len());
        self.summary_cache
            .insert("summary".to_string(), summary.clone());
        Ok(summary)
    }
}
