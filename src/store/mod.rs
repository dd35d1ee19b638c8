pub mod sqlite;

use chrono::NaiveDateTime;
use serde::Serialize;

pub use sqlite::{IdentityCasePolicy, SqliteStore};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const NUM_VIDEOS: usize = 4;
pub const VIDEO_NAMES: [&str; NUM_VIDEOS] = ["first", "second", "third", "fourth"];
pub const DIVISION_CISO: &str = "CISO";

const SECONDS_PER_DAY: f64 = 24.0 * 3600.0;

/// Derived from the finish timestamps, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainingStatus {
    NotStarted,
    InProgress,
    Finished,
}

impl TrainingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStatus::NotStarted => "NOT_STARTED",
            TrainingStatus::InProgress => "IN_PROGRESS",
            TrainingStatus::Finished => "FINISHED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "NOT_STARTED" => Some(TrainingStatus::NotStarted),
            "IN_PROGRESS" => Some(TrainingStatus::InProgress),
            "FINISHED" => Some(TrainingStatus::Finished),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the employees table, timestamps already parsed.
#[derive(Clone, Debug, Default)]
pub struct EmployeeRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub employee_last_name: String,
    pub employee_division: String,
    pub starts: [Option<NaiveDateTime>; NUM_VIDEOS],
    pub finishes: [Option<NaiveDateTime>; NUM_VIDEOS],
}

impl EmployeeRecord {
    pub fn status(&self) -> TrainingStatus {
        let finished = self.finishes.iter().filter(|f| f.is_some()).count();
        match finished {
            0 => TrainingStatus::NotStarted,
            NUM_VIDEOS => TrainingStatus::Finished,
            _ => TrainingStatus::InProgress,
        }
    }

    /// Days spent on one video, 0.0 when either end is missing.
    pub fn video_days(&self, index: usize) -> f64 {
        match (self.starts[index], self.finishes[index]) {
            (Some(start), Some(finish)) => days_between(finish, start),
            _ => 0.0,
        }
    }

    /// Days from the earliest start to the latest finish across all videos.
    /// Deliberately a global span, not a sum of per-video gaps: the endpoints
    /// may come from different videos. 0.0 when either set is empty.
    pub fn training_days(&self) -> f64 {
        let earliest = self.starts.iter().flatten().min();
        let latest = self.finishes.iter().flatten().max();
        match (earliest, latest) {
            (Some(start), Some(finish)) => days_between(*finish, *start),
            _ => 0.0,
        }
    }
}

pub fn days_between(finish: NaiveDateTime, start: NaiveDateTime) -> f64 {
    (finish - start).num_seconds() as f64 / SECONDS_PER_DAY
}

pub fn parse_date(raw: Option<&str>) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw?, DATE_FORMAT).ok()
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EmployeeRef {
    pub employee_id: String,
    pub employee_name: String,
    pub employee_last_name: String,
}

impl EmployeeRef {
    fn of(record: &EmployeeRecord) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            employee_last_name: record.employee_last_name.clone(),
        }
    }
}

/// Aggregate training statistics across the whole table.
#[derive(Clone, Debug, Serialize)]
pub struct TrainingSummary {
    pub finished_count: usize,
    pub in_progress_count: usize,
    pub not_started_count: usize,
    pub min_days: f64,
    pub max_days: f64,
    pub avg_days: f64,
    pub fastest: Option<EmployeeRef>,
    pub slowest: Option<EmployeeRef>,
}

/// With no finished employees the times zero out and fastest/slowest stay
/// null, while the other counts still reflect their true list lengths. Ties
/// resolve to the first record in scan order.
pub fn summarize(
    finished: &[EmployeeRecord],
    in_progress_count: usize,
    not_started_count: usize,
) -> TrainingSummary {
    if finished.is_empty() {
        return TrainingSummary {
            finished_count: 0,
            in_progress_count,
            not_started_count,
            min_days: 0.0,
            max_days: 0.0,
            avg_days: 0.0,
            fastest: None,
            slowest: None,
        };
    }

    let times: Vec<f64> = finished.iter().map(EmployeeRecord::training_days).collect();
    let mut fastest_idx = 0;
    let mut slowest_idx = 0;
    for (i, t) in times.iter().enumerate() {
        if *t < times[fastest_idx] {
            fastest_idx = i;
        }
        if *t > times[slowest_idx] {
            slowest_idx = i;
        }
    }

    TrainingSummary {
        finished_count: finished.len(),
        in_progress_count,
        not_started_count,
        min_days: times[fastest_idx],
        max_days: times[slowest_idx],
        avg_days: times.iter().sum::<f64>() / times.len() as f64,
        fastest: Some(EmployeeRef::of(&finished[fastest_idx])),
        slowest: Some(EmployeeRef::of(&finished[slowest_idx])),
    }
}

/// Read-only employee record store. Every existence check re-queries the
/// backing table; resolved identities are never negatively cached.
pub trait EmployeeStore: Send + Sync {
    fn exists(&self, employee_id: &str, employee_name: &str) -> anyhow::Result<bool>;

    fn is_ciso(&self, employee_id: &str, employee_name: &str) -> anyhow::Result<bool>;

    fn get_record(
        &self,
        employee_id: &str,
        employee_name: &str,
    ) -> anyhow::Result<Option<EmployeeRecord>>;

    fn get_status(
        &self,
        employee_id: &str,
        employee_name: &str,
    ) -> anyhow::Result<Option<TrainingStatus>> {
        Ok(self
            .get_record(employee_id, employee_name)?
            .map(|record| record.status()))
    }

    /// Scan order must be deterministic; the summary tie-breaks depend on it.
    fn get_by_status(&self, status: TrainingStatus) -> anyhow::Result<Vec<EmployeeRecord>>;

    fn get_summary(&self) -> anyhow::Result<TrainingSummary>;
}
