//! Summary statistics over a date range: per employee, per category and per
//! cycle month, with the best employee and month.

use crate::core::period::{Cycle, DateRange, MonthKey};
use crate::core::progress::ProgressService;
use crate::core::store::PointStore;
use crate::errors::AppResult;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeStats {
    pub employee_id: i64,
    pub name: String,
    pub total_points: u64,
    pub records: usize,
    pub average_points: f64,
    pub by_category: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthStats {
    pub month: MonthKey,
    pub total_points: u64,
    pub records: usize,
    pub average_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointStats {
    pub range: DateRange,
    pub total_points: u64,
    pub total_records: usize,
    pub average_points_per_record: f64,
    /// Highest total first; ties by name.
    pub employees: Vec<EmployeeStats>,
    /// Chronological.
    pub months: Vec<MonthStats>,
    pub by_category: BTreeMap<String, u64>,
    pub top_employee: Option<String>,
    pub top_month: Option<MonthKey>,
}

fn average(total: u64, records: usize) -> f64 {
    if records == 0 {
        return 0.0;
    }
    total as f64 / records as f64
}

/// Statistics for `range`, optionally for one employee. Employees without
/// entries in the range are left out.
pub fn point_stats<S: PointStore + ?Sized>(
    service: &ProgressService<'_, S>,
    range: DateRange,
    employee_id: Option<i64>,
) -> AppResult<PointStats> {
    let employees = match employee_id {
        Some(id) => vec![service.employee(id)?],
        None => service.employees()?,
    };
    let sums = service.points_by_employee(range)?;
    let entries = service.store().entries_between(range, employee_id)?;

    let mut records: HashMap<i64, usize> = HashMap::new();
    let mut categories: HashMap<i64, BTreeMap<String, u64>> = HashMap::new();
    let mut months: BTreeMap<MonthKey, (u64, usize)> = BTreeMap::new();
    let mut by_category: BTreeMap<String, u64> = BTreeMap::new();

    for entry in entries.iter().filter(|e| range.contains(e.date())) {
        if !employees.iter().any(|emp| emp.id == entry.employee_id) {
            continue;
        }
        let points = entry.points as u64;

        *records.entry(entry.employee_id).or_insert(0) += 1;
        *categories
            .entry(entry.employee_id)
            .or_default()
            .entry(entry.category.clone())
            .or_insert(0) += points;
        *by_category.entry(entry.category.clone()).or_insert(0) += points;

        let month = months
            .entry(Cycle::containing(entry.date()).month_key())
            .or_insert((0, 0));
        month.0 += points;
        month.1 += 1;
    }

    let mut per_employee: Vec<EmployeeStats> = employees
        .iter()
        .filter_map(|emp| {
            let n = records.get(&emp.id).copied().unwrap_or(0);
            if n == 0 {
                return None;
            }
            let total = sums.get(&emp.id).copied().unwrap_or(0);
            Some(EmployeeStats {
                employee_id: emp.id,
                name: emp.name.clone(),
                total_points: total,
                records: n,
                average_points: average(total, n),
                by_category: categories.remove(&emp.id).unwrap_or_default(),
            })
        })
        .collect();
    per_employee.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.name.cmp(&b.name))
    });

    let months: Vec<MonthStats> = months
        .into_iter()
        .map(|(month, (total, n))| MonthStats {
            month,
            total_points: total,
            records: n,
            average_points: average(total, n),
        })
        .collect();

    let total_points: u64 = per_employee.iter().map(|e| e.total_points).sum();
    let total_records: usize = per_employee.iter().map(|e| e.records).sum();

    // Sorted descending, so the first row is the top employee.
    let top_employee = per_employee.first().map(|e| e.name.clone());
    let top_month = months
        .iter()
        .fold(None::<&MonthStats>, |best, m| match best {
            Some(b) if b.total_points >= m.total_points => Some(b),
            _ => Some(m),
        })
        .map(|m| m.month);

    Ok(PointStats {
        range,
        total_points,
        total_records,
        average_points_per_record: average(total_points, total_records),
        employees: per_employee,
        months,
        by_category,
        top_employee,
        top_month,
    })
}
