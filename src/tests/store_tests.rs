use crate::store::{
    EmployeeStore, IdentityCasePolicy, SqliteStore, TrainingStatus, summarize,
};
use crate::tests::{record, seeded_store};

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_finish_mask(mask: u8) -> crate::store::EmployeeRecord {
        let start = Some("2024-01-01 00:00:00");
        let finish = "2024-01-05 00:00:00";
        let finishes = [
            (mask & 1 != 0).then_some(finish),
            (mask & 2 != 0).then_some(finish),
            (mask & 4 != 0).then_some(finish),
            (mask & 8 != 0).then_some(finish),
        ];
        record("1", "A", "B", "X", [start, start, start, start], finishes)
    }

    #[test]
    fn test_status_for_all_finish_combinations() {
        for mask in 0u8..16 {
            let rec = record_with_finish_mask(mask);
            let expected = match mask.count_ones() {
                0 => TrainingStatus::NotStarted,
                4 => TrainingStatus::Finished,
                _ => TrainingStatus::InProgress,
            };
            assert_eq!(rec.status(), expected, "mask {mask:#06b}");
        }
    }

    #[test]
    fn test_training_days_spans_earliest_start_to_latest_finish() {
        // Finishes at +1, +3, +5 and +8 days: the duration is the span from
        // the shared start to the latest finish, not a sum of per-video gaps.
        let rec = record(
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
        );
        assert_eq!(rec.training_days(), 8.0);
    }

    #[test]
    fn test_training_days_zero_when_either_set_empty() {
        let no_finishes = record(
            "1",
            "A",
            "B",
            "X",
            [Some("2024-01-01 00:00:00"), None, None, None],
            [None, None, None, None],
        );
        assert_eq!(no_finishes.training_days(), 0.0);

        let no_starts = record(
            "1",
            "A",
            "B",
            "X",
            [None, None, None, None],
            [Some("2024-01-05 00:00:00"), None, None, None],
        );
        assert_eq!(no_starts.training_days(), 0.0);
    }

    #[test]
    fn test_summary_with_no_finished_employees() {
        let summary = summarize(&[], 3, 2);
        assert_eq!(summary.finished_count, 0);
        assert_eq!(summary.in_progress_count, 3);
        assert_eq!(summary.not_started_count, 2);
        assert_eq!(summary.min_days, 0.0);
        assert_eq!(summary.max_days, 0.0);
        assert_eq!(summary.avg_days, 0.0);
        assert!(summary.fastest.is_none());
        assert!(summary.slowest.is_none());
    }

    #[test]
    fn test_summary_tie_break_prefers_scan_order() {
        let same_span = |id: &str, name: &str| {
            record(
                id,
                name,
                "B",
                "X",
                [
                    Some("2024-01-01 00:00:00"),
                    Some("2024-01-01 00:00:00"),
                    Some("2024-01-01 00:00:00"),
                    Some("2024-01-01 00:00:00"),
                ],
                [
                    Some("2024-01-04 00:00:00"),
                    Some("2024-01-04 00:00:00"),
                    Some("2024-01-04 00:00:00"),
                    Some("2024-01-04 00:00:00"),
                ],
            )
        };
        let finished = vec![same_span("1", "First"), same_span("2", "Second")];
        let summary = summarize(&finished, 0, 0);
        assert_eq!(summary.fastest.unwrap().employee_name, "First");
        assert_eq!(summary.slowest.unwrap().employee_name, "First");
    }

    #[test]
    fn test_summary_over_seeded_store() {
        let store = seeded_store();
        let summary = store.get_summary().unwrap();
        assert_eq!(summary.finished_count, 2);
        assert_eq!(summary.in_progress_count, 1);
        assert_eq!(summary.not_started_count, 1);
        assert_eq!(summary.min_days, 5.0);
        assert_eq!(summary.max_days, 8.0);
        assert_eq!(summary.avg_days, 6.5);
        assert_eq!(summary.fastest.unwrap().employee_name, "Ana");
        assert_eq!(summary.slowest.unwrap().employee_name, "Sam");
    }

    #[test]
    fn test_exists_and_status_lookups() {
        let store = seeded_store();
        assert!(store.exists("7", "Sam").unwrap());
        assert!(!store.exists("7", "Nobody").unwrap());
        assert_eq!(
            store.get_status("12", "Bob").unwrap(),
            Some(TrainingStatus::InProgress)
        );
        assert_eq!(store.get_status("99", "Ghost").unwrap(), None);
    }

    #[test]
    fn test_is_ciso_checks_division() {
        let store = seeded_store();
        assert!(store.is_ciso("9", "Ana").unwrap());
        assert!(!store.is_ciso("7", "Sam").unwrap());
    }

    #[test]
    fn test_get_by_status_filters_and_preserves_order() {
        let store = seeded_store();
        let finished = store.get_by_status(TrainingStatus::Finished).unwrap();
        let names: Vec<&str> = finished.iter().map(|r| r.employee_name.as_str()).collect();
        assert_eq!(names, ["Sam", "Ana"]);

        let in_progress = store.get_by_status(TrainingStatus::InProgress).unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].employee_name, "Bob");

        let not_started = store.get_by_status(TrainingStatus::NotStarted).unwrap();
        assert_eq!(not_started.len(), 1);
        assert_eq!(not_started[0].employee_name, "Eve");
    }

    #[test]
    fn test_identity_case_policy() {
        let exact = SqliteStore::open_in_memory(IdentityCasePolicy::Exact).unwrap();
        let folded = SqliteStore::open_in_memory(IdentityCasePolicy::IgnoreCase).unwrap();
        let rec = record(
            "7",
            "Sam",
            "Smith",
            "ENGINEERING",
            [None, None, None, None],
            [None, None, None, None],
        );
        exact.insert(&rec).unwrap();
        folded.insert(&rec).unwrap();

        assert!(exact.exists("7", "Sam").unwrap());
        assert!(!exact.exists("7", "sam").unwrap());
        assert!(folded.exists("7", "sam").unwrap());
        assert!(folded.exists("7", "SAM").unwrap());
    }

    #[test]
    fn test_case_policy_parse() {
        assert_eq!(
            IdentityCasePolicy::parse("exact"),
            Some(IdentityCasePolicy::Exact)
        );
        assert_eq!(
            IdentityCasePolicy::parse("ignore-case"),
            Some(IdentityCasePolicy::IgnoreCase)
        );
        assert_eq!(IdentityCasePolicy::parse("loose"), None);
    }
}
