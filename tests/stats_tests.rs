use refpoints::core::cache::AggregateCache;
use refpoints::core::period::{DateRange, MonthKey, WeekBoundary};
use refpoints::core::progress::ProgressService;
use refpoints::core::stats::point_stats;

mod common;
use common::{MemStore, d, employee, entry};

fn store() -> MemStore {
    let mut replan = entry(3, 1, "2025-09-02 08:00:00", 50);
    replan.category = "REPLAN".to_string();

    MemStore::new(
        vec![
            employee(1, "Ana", 2375),
            employee(2, "Bruno", 2675),
            employee(3, "Carla", 2375),
        ],
        vec![
            entry(1, 1, "2025-08-25 11:59:50", 100),
            entry(2, 1, "2025-08-26 09:00:00", 200),
            replan,
            entry(4, 2, "2025-09-10 14:00:00", 400),
        ],
    )
}

fn service(store: &MemStore) -> ProgressService<'_, MemStore> {
    ProgressService::new(store, AggregateCache::default(), WeekBoundary::StartsNewWeek, 4)
}

fn two_cycles() -> DateRange {
    DateRange::new(d(2025, 7, 26), d(2025, 9, 25))
}

#[test]
fn team_stats_by_employee_category_and_month() {
    let store = store();
    let s = point_stats(&service(&store), two_cycles(), None).unwrap();

    assert_eq!(s.total_points, 750);
    assert_eq!(s.total_records, 4);
    assert_eq!(s.average_points_per_record, 187.5);

    let names: Vec<&str> = s.employees.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Bruno", "Ana"]);
    assert_eq!(s.employees[1].total_points, 350);
    assert_eq!(s.employees[1].records, 3);
    assert_eq!(s.employees[1].by_category["REPLAN"], 50);

    assert_eq!(s.by_category["REDUC"], 700);
    assert_eq!(s.by_category["REPLAN"], 50);

    assert_eq!(s.top_employee.as_deref(), Some("Bruno"));
    assert_eq!(s.top_month, Some(MonthKey::new(9, 2025).unwrap()));
}

#[test]
fn months_follow_the_closing_month() {
    let store = store();
    let s = point_stats(&service(&store), two_cycles(), None).unwrap();

    let months: Vec<(String, u64, usize)> = s
        .months
        .iter()
        .map(|m| (m.month.to_string(), m.total_points, m.records))
        .collect();
    assert_eq!(
        months,
        [
            ("08/2025".to_string(), 100, 1),
            ("09/2025".to_string(), 650, 3)
        ]
    );
    assert_eq!(s.months[1].average_points, 650.0 / 3.0);
}

#[test]
fn single_employee_stats() {
    let store = store();
    let s = point_stats(&service(&store), two_cycles(), Some(1)).unwrap();

    assert_eq!(s.employees.len(), 1);
    assert_eq!(s.total_points, 350);
    assert_eq!(s.top_employee.as_deref(), Some("Ana"));
    assert_eq!(s.by_category.get("REDUC"), Some(&300));
}

#[test]
fn ties_pick_name_order_and_earliest_month() {
    let store = MemStore::new(
        vec![employee(1, "Bruno", 2675), employee(2, "Ana", 2375)],
        vec![
            entry(1, 1, "2025-08-01 10:00:00", 100),
            entry(2, 2, "2025-08-30 10:00:00", 100),
        ],
    );
    let s = point_stats(&service(&store), two_cycles(), None).unwrap();

    assert_eq!(s.top_employee.as_deref(), Some("Ana"));
    assert_eq!(s.top_month, Some(MonthKey::new(8, 2025).unwrap()));
}

#[test]
fn empty_range_has_no_top() {
    let store = store();
    let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 31));
    let s = point_stats(&service(&store), range, None).unwrap();

    assert_eq!(s.total_records, 0);
    assert_eq!(s.average_points_per_record, 0.0);
    assert!(s.employees.is_empty());
    assert!(s.months.is_empty());
    assert_eq!(s.top_employee, None);
    assert_eq!(s.top_month, None);
}
