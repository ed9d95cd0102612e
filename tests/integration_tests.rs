use predicates::prelude::*;
use predicates::str::contains;

mod common;
use common::{add_points, init_db_with_employees, rti, setup_test_db};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("init_creates");

    rti()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized at"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_employee_add_and_list() {
    let db_path = setup_test_db("employee_list");
    init_db_with_employees(&db_path);

    rti()
        .args(["--db", &db_path, "--test", "employee", "list"])
        .assert()
        .success()
        .stdout(contains("Ana Souza"))
        .stdout(contains("bruno"))
        .stdout(contains("2,375"))
        .stdout(contains("9,500"))
        .stdout(contains("REDUC"));

    rti()
        .args(["--db", &db_path, "--test", "employee", "add", "Other Ana", "ANA"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn test_employee_goals_update() {
    let db_path = setup_test_db("employee_goals");
    init_db_with_employees(&db_path);

    rti()
        .args([
            "--db",
            &db_path,
            "--test",
            "employee",
            "goals",
            "bruno",
            "--monthly-goal",
            "12000",
        ])
        .assert()
        .success()
        .stdout(contains("weekly 2,675, monthly 12,000"));
}

#[test]
fn test_add_refuses_second_entry_same_day() {
    let db_path = setup_test_db("add_duplicate");
    init_db_with_employees(&db_path);

    rti()
        .args([
            "--db",
            &db_path,
            "--test",
            "add",
            "ana",
            "120",
            "--at",
            "2025-09-01 09:00",
            "--notes",
            "unit 3",
        ])
        .assert()
        .success()
        .stdout(contains("Entry #1 recorded"))
        .stdout(contains("[REDUC]"));

    rti()
        .args(["--db", &db_path, "--test", "add", "ana", "30", "--at", "2025-09-01 15:00"])
        .assert()
        .failure()
        .stderr(contains("already exists"));

    rti()
        .args([
            "--db",
            &db_path,
            "--test",
            "add",
            "ana",
            "30",
            "--at",
            "2025-09-01 15:00",
            "--force",
        ])
        .assert()
        .success()
        .stdout(contains("Entry #2 recorded"));
}

#[test]
fn test_add_unknown_employee_fails() {
    let db_path = setup_test_db("add_unknown");
    init_db_with_employees(&db_path);

    rti()
        .args(["--db", &db_path, "--test", "add", "nobody", "10"])
        .assert()
        .failure()
        .stderr(contains("Employee not found: nobody"));
}

#[test]
fn test_add_rejects_bad_timestamp() {
    let db_path = setup_test_db("add_bad_ts");
    init_db_with_employees(&db_path);

    rti()
        .args(["--db", &db_path, "--test", "add", "ana", "10", "--at", "2025-02-30"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn test_edit_and_delete_entry() {
    let db_path = setup_test_db("edit_delete");
    init_db_with_employees(&db_path);
    add_points(&db_path, "ana", 100, "2025-09-02 10:00");
    add_points(&db_path, "bruno", 50, "2025-09-02 11:00");

    rti()
        .args(["--db", &db_path, "--test", "edit", "1", "--points", "140"])
        .assert()
        .success()
        .stdout(contains("Entry #1 updated: 140 points"));

    rti()
        .args(["--db", &db_path, "--test", "edit", "99", "--points", "1"])
        .assert()
        .failure()
        .stderr(contains("Entry not found: #99"));

    rti()
        .args(["--db", &db_path, "--test", "del", "2"])
        .assert()
        .success()
        .stdout(contains("Deleted entry #2"));

    rti()
        .args(["--db", &db_path, "--test", "list", "--month", "09/2025"])
        .assert()
        .success()
        .stdout(contains("1 entries, 140 points"));
}

#[test]
fn test_delete_all_for_one_employee() {
    let db_path = setup_test_db("del_all_employee");
    init_db_with_employees(&db_path);
    add_points(&db_path, "ana", 10, "2025-09-01");
    add_points(&db_path, "ana", 20, "2025-09-02");
    add_points(&db_path, "bruno", 30, "2025-09-02");

    rti()
        .args([
            "--db",
            &db_path,
            "--test",
            "del",
            "--all",
            "--employee",
            "ana",
            "--yes",
        ])
        .assert()
        .success()
        .stdout(contains("Deleted 2 entries."));

    rti()
        .args(["--db", &db_path, "--test", "list", "--range", "2025-09"])
        .assert()
        .success()
        .stdout(contains("bruno"))
        .stdout(contains("1 entries, 30 points"));
}

#[test]
fn test_list_boundary_entry_belongs_to_closing_cycle() {
    let db_path = setup_test_db("list_boundary");
    init_db_with_employees(&db_path);
    add_points(&db_path, "ana", 70, "2025-08-25 11:59:50");
    add_points(&db_path, "ana", 5, "2025-08-26 00:00:01");

    rti()
        .args(["--db", &db_path, "--test", "list", "--month", "08/2025"])
        .assert()
        .success()
        .stdout(contains("2025-08-25 11:59:50"))
        .stdout(contains("1 entries, 70 points"));

    rti()
        .args(["--db", &db_path, "--test", "list", "--month", "2025-09"])
        .assert()
        .success()
        .stdout(contains("1 entries, 5 points"));

    rti()
        .args(["--db", &db_path, "--test", "list", "--month", "2024-12", "-e", "ana"])
        .assert()
        .success()
        .stdout(contains("No entries between 2024-11-26 and 2024-12-25."));
}

#[test]
fn test_period_shows_closing_month() {
    let db_path = setup_test_db("period_month");

    rti()
        .args(["--db", &db_path, "--test", "period", "2025-01-10"])
        .assert()
        .success()
        .stdout(contains("2024-12-26 .. 2025-01-25"))
        .stdout(contains("01/2025"));

    rti()
        .args(["--db", &db_path, "--test", "period", "2025-02-30"])
        .assert()
        .failure();
}

#[test]
fn test_progress_reaches_goal() {
    let db_path = setup_test_db("progress_goal");
    init_db_with_employees(&db_path);
    add_points(&db_path, "ana", 2375, "2025-09-03 08:00");

    rti()
        .args([
            "--db",
            &db_path,
            "--test",
            "progress",
            "-e",
            "ana",
            "--date",
            "2025-09-03",
        ])
        .assert()
        .success()
        .stdout(contains("Ana Souza"))
        .stdout(contains("100.0%"));

    rti()
        .args([
            "--db",
            &db_path,
            "--test",
            "progress",
            "--month",
            "09/2025",
        ])
        .assert()
        .success()
        .stdout(contains("Bruno Lima"))
        .stdout(contains("10,700"));
}

#[test]
fn test_progress_caps_displayed_percentage() {
    let db_path = setup_test_db("progress_cap");
    init_db_with_employees(&db_path);
    add_points(&db_path, "ana", 30000, "2025-09-03 08:00");

    rti()
        .args([
            "--db",
            &db_path,
            "--test",
            "progress",
            "-e",
            "ana",
            "--date",
            "2025-09-03",
        ])
        .assert()
        .success()
        .stdout(contains("999.0%"))
        .stdout(contains("1263.2%").not());
}

#[test]
fn test_progress_rejects_week_six() {
    let db_path = setup_test_db("progress_week6");
    init_db_with_employees(&db_path);

    rti()
        .args(["--db", &db_path, "--test", "progress", "--week", "6", "--month", "09/2025"])
        .assert()
        .failure()
        .stderr(contains("Invalid week number: 6"));
}

#[test]
fn test_dashboard_json() {
    let db_path = setup_test_db("dashboard_json");
    init_db_with_employees(&db_path);
    add_points(&db_path, "ana", 2375, "2025-09-03 08:00");

    rti()
        .args([
            "--db",
            &db_path,
            "--test",
            "dashboard",
            "--date",
            "2025-09-03",
            "--json",
        ])
        .assert()
        .success()
        .stdout(contains("\"total_points\": 2375"))
        .stdout(contains("\"employees_meeting_goals\": 1"))
        .stdout(contains("\"trend_direction\""));
}

#[test]
fn test_dashboard_text() {
    let db_path = setup_test_db("dashboard_text");
    init_db_with_employees(&db_path);

    rti()
        .args(["--db", &db_path, "--test", "dashboard", "--date", "2025-09-03"])
        .assert()
        .success()
        .stdout(contains("Dashboard"))
        .stdout(contains("Meeting goal"));
}

#[test]
fn test_trend_monthly() {
    let db_path = setup_test_db("trend_monthly");
    init_db_with_employees(&db_path);
    add_points(&db_path, "ana", 1200, "2025-08-20");
    add_points(&db_path, "ana", 300, "2025-09-01");

    rti()
        .args([
            "--db",
            &db_path,
            "--test",
            "trend",
            "--kind",
            "monthly",
            "--date",
            "2025-09-01",
            "--count",
            "2",
            "-e",
            "ana",
        ])
        .assert()
        .success()
        .stdout(contains("08/2025"))
        .stdout(contains("09/2025"))
        .stdout(contains("1,500"));
}

#[test]
fn test_log_records_operations() {
    let db_path = setup_test_db("log_print");
    init_db_with_employees(&db_path);
    add_points(&db_path, "ana", 10, "2025-09-01");

    rti()
        .args(["--db", &db_path, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("employee_add"))
        .stdout(contains("entry #1"));
}

#[test]
fn test_db_info_and_check() {
    let db_path = setup_test_db("db_info");
    init_db_with_employees(&db_path);
    add_points(&db_path, "bruno", 10, "2025-09-01");

    rti()
        .args(["--db", &db_path, "--test", "db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));
}
