//! Per-employee point series for charts: days, weeks and cycles.

use crate::core::period::{Cycle, DateRange, WEEKS_PER_CYCLE};
use crate::core::progress::ProgressService;
use crate::core::store::PointStore;
use crate::errors::AppResult;
use crate::models::employee::Employee;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesRow {
    pub employee_id: i64,
    pub name: String,
    pub values: Vec<u64>,
}

impl SeriesRow {
    pub fn total(&self) -> u64 {
        self.values.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub rows: Vec<SeriesRow>,
}

fn select_employees<S: PointStore + ?Sized>(
    service: &ProgressService<'_, S>,
    employee_id: Option<i64>,
) -> AppResult<Vec<Employee>> {
    match employee_id {
        Some(id) => Ok(vec![service.employee(id)?]),
        None => service.employees(),
    }
}

/// One column per range, values from the cached period aggregates.
fn series_over<S: PointStore + ?Sized>(
    service: &ProgressService<'_, S>,
    employees: &[Employee],
    labels: Vec<String>,
    ranges: &[Option<DateRange>],
) -> AppResult<Series> {
    let mut columns = Vec::with_capacity(ranges.len());
    for range in ranges {
        columns.push(match range {
            Some(r) => Some(service.points_by_employee(*r)?),
            None => None,
        });
    }

    let rows = employees
        .iter()
        .map(|emp| SeriesRow {
            employee_id: emp.id,
            name: emp.name.clone(),
            values: columns
                .iter()
                .map(|col| {
                    col.as_ref()
                        .and_then(|sums| sums.get(&emp.id).copied())
                        .unwrap_or(0)
                })
                .collect(),
        })
        .collect();

    Ok(Series { labels, rows })
}

/// Week 1..5 totals of the cycle containing `reference`. A week the cycle
/// is too short to contain reports 0.
pub fn weekly_series<S: PointStore + ?Sized>(
    service: &ProgressService<'_, S>,
    reference: NaiveDate,
    employee_id: Option<i64>,
) -> AppResult<Series> {
    let employees = select_employees(service, employee_id)?;
    let cycle = Cycle::containing(reference);

    let mut labels = Vec::new();
    let mut ranges = Vec::new();
    for n in 1..=WEEKS_PER_CYCLE {
        labels.push(format!("Week {n}"));
        ranges.push(cycle.week_bounds(n, service.rule())?);
    }

    series_over(service, &employees, labels, &ranges)
}

/// Totals of the last `count` cycles up to the one containing `reference`,
/// oldest first.
pub fn monthly_series<S: PointStore + ?Sized>(
    service: &ProgressService<'_, S>,
    reference: NaiveDate,
    count: usize,
    employee_id: Option<i64>,
) -> AppResult<Series> {
    let employees = select_employees(service, employee_id)?;

    let mut cycles = Vec::with_capacity(count);
    let mut cycle = Cycle::containing(reference);
    for _ in 0..count {
        cycles.push(cycle);
        cycle = cycle.previous();
    }
    cycles.reverse();

    let labels = cycles.iter().map(|c| c.month_key().to_string()).collect();
    let ranges: Vec<Option<DateRange>> = cycles.iter().map(|c| Some(c.range())).collect();

    series_over(service, &employees, labels, &ranges)
}

/// One value per day from the cycle start through `reference`.
pub fn daily_series<S: PointStore + ?Sized>(
    service: &ProgressService<'_, S>,
    reference: NaiveDate,
    employee_id: Option<i64>,
) -> AppResult<Series> {
    let employees = select_employees(service, employee_id)?;
    let range = DateRange::new(Cycle::containing(reference).start(), reference);
    let days: Vec<NaiveDate> = range.days().collect();

    let entries = service.store().entries_between(range, employee_id)?;

    let mut per_day: BTreeMap<(i64, NaiveDate), u64> = BTreeMap::new();
    for e in entries.iter().filter(|e| range.contains(e.date())) {
        *per_day.entry((e.employee_id, e.date())).or_insert(0) += e.points as u64;
    }

    let rows = employees
        .iter()
        .map(|emp| SeriesRow {
            employee_id: emp.id,
            name: emp.name.clone(),
            values: days
                .iter()
                .map(|d| per_day.get(&(emp.id, *d)).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    Ok(Series {
        labels: days.iter().map(|d| d.format("%d/%m").to_string()).collect(),
        rows,
    })
}
