use predicates::str::contains;
use std::fs;

mod common;
use common::{add_points, init_db_with_employees, rti, setup_test_db, temp_out};

fn seeded(name: &str) -> String {
    let db_path = setup_test_db(name);
    init_db_with_employees(&db_path);
    add_points(&db_path, "ana", 120, "2025-08-25 11:59:50");
    add_points(&db_path, "ana", 300, "2025-09-01 08:00");
    add_points(&db_path, "bruno", 75, "2025-09-02 14:30");
    db_path
}

#[test]
fn test_export_csv_by_month() {
    let db_path = seeded("export_csv");
    let out = temp_out("export_csv", "csv");

    rti()
        .args([
            "--db", &db_path, "--test", "export", "--format", "csv", "--file", &out, "--month",
            "09/2025",
        ])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read csv");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("id,date,employee,login,category,points,notes")
    );
    assert_eq!(lines.count(), 2);
    assert!(content.contains("2025-09-01 08:00:00,Ana Souza,ana,REDUC,300"));
    assert!(!content.contains("2025-08-25"));
}

#[test]
fn test_export_json_for_one_employee() {
    let db_path = seeded("export_json");
    let out = temp_out("export_json", "json");

    rti()
        .args([
            "--db", &db_path, "--test", "export", "--format", "json", "--file", &out, "-e", "ana",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read json");
    let rows: Vec<serde_json::Value> = serde_json::from_str(&content).expect("valid json");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["login"] == "ana"));
    assert_eq!(rows[0]["date"], "2025-08-25 11:59:50");
    assert_eq!(rows[1]["points"], 300);
}

#[test]
fn test_export_xlsx_creates_file() {
    let db_path = seeded("export_xlsx");
    let out = temp_out("export_xlsx", "xlsx");

    rti()
        .args([
            "--db", &db_path, "--test", "export", "--format", "xlsx", "--file", &out, "--range",
            "2025-08-01:2025-09-30",
        ])
        .assert()
        .success()
        .stdout(contains("XLSX export completed"));

    let meta = fs::metadata(&out).expect("xlsx written");
    assert!(meta.len() > 0);
}

#[test]
fn test_export_zip_bundles_one_report_per_employee() {
    let db_path = seeded("export_zip");
    let out = temp_out("export_zip", "zip");

    rti()
        .args([
            "--db", &db_path, "--test", "export", "--format", "zip", "--file", &out, "--month",
            "09/2025",
        ])
        .assert()
        .success()
        .stdout(contains("ZIP export completed"));

    let file = fs::File::open(&out).expect("zip written");
    let archive = zip::ZipArchive::new(file).expect("valid zip");
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, ["ana.xlsx", "bruno.xlsx"]);
}

#[test]
fn test_export_requires_absolute_path() {
    let db_path = seeded("export_relative");

    rti()
        .args(["--db", &db_path, "--test", "export", "--file", "out.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_export_empty_period_warns() {
    let db_path = seeded("export_empty");
    let out = temp_out("export_empty", "csv");

    rti()
        .args([
            "--db", &db_path, "--test", "export", "--file", &out, "--month", "01/2024",
        ])
        .assert()
        .success()
        .stdout(contains("No entries found for the selected period."));

    assert!(!std::path::Path::new(&out).exists());
}

#[test]
fn test_export_existing_file_needs_force() {
    let db_path = seeded("export_force");
    let out = temp_out("export_force", "csv");
    fs::write(&out, "old").expect("seed file");

    rti()
        .args(["--db", &db_path, "--test", "export", "--file", &out])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("not overwritten"));

    rti()
        .args(["--db", &db_path, "--test", "export", "--file", &out, "--force"])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read csv");
    assert!(content.starts_with("id,date,employee"));
}
