use refpoints::core::cache::AggregateCache;
use refpoints::core::period::WeekBoundary;
use refpoints::core::progress::ProgressService;
use refpoints::core::trend::{daily_series, monthly_series, weekly_series};

mod common;
use common::{MemStore, d, employee, entry};

fn store() -> MemStore {
    MemStore::new(
        vec![employee(1, "Ana", 2375), employee(2, "Bruno", 2675)],
        vec![
            entry(1, 1, "2025-07-30 10:00:00", 100),
            entry(2, 1, "2025-08-26 10:00:00", 200),
            entry(3, 1, "2025-08-27 10:00:00", 50),
            entry(4, 2, "2025-09-02 10:00:00", 400),
            entry(5, 1, "2025-09-24 18:00:00", 70),
        ],
    )
}

fn service(store: &MemStore) -> ProgressService<'_, MemStore> {
    ProgressService::new(store, AggregateCache::default(), WeekBoundary::StartsNewWeek, 4)
}

#[test]
fn weekly_series_has_five_columns() {
    let store = store();
    let s = weekly_series(&service(&store), d(2025, 9, 10), None).unwrap();

    assert_eq!(s.labels, ["Week 1", "Week 2", "Week 3", "Week 4", "Week 5"]);
    assert_eq!(s.rows[0].name, "Ana");
    assert_eq!(s.rows[0].values, [250, 0, 0, 0, 70]);
    assert_eq!(s.rows[1].values, [0, 400, 0, 0, 0]);
}

#[test]
fn missing_fifth_week_reports_zero() {
    let store = MemStore::new(
        vec![employee(1, "Ana", 2375)],
        vec![entry(1, 1, "2025-03-25 10:00:00", 10)],
    );
    let s = weekly_series(&service(&store), d(2025, 3, 10), Some(1)).unwrap();

    assert_eq!(s.rows.len(), 1);
    assert_eq!(s.rows[0].values, [0, 0, 0, 10, 0]);
}

#[test]
fn daily_series_runs_from_cycle_start_to_reference() {
    let store = store();
    let s = daily_series(&service(&store), d(2025, 8, 28), Some(1)).unwrap();

    assert_eq!(s.labels, ["26/08", "27/08", "28/08"]);
    assert_eq!(s.rows[0].values, [200, 50, 0]);
    assert_eq!(s.rows[0].total(), 250);
}

#[test]
fn monthly_series_is_oldest_first() {
    let store = store();
    let s = monthly_series(&service(&store), d(2025, 9, 10), 3, None).unwrap();

    assert_eq!(s.labels, ["07/2025", "08/2025", "09/2025"]);
    assert_eq!(s.rows[0].values, [0, 100, 320]);
    assert_eq!(s.rows[1].values, [0, 0, 400]);
}
