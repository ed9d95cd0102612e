//! Per-period point aggregation and goal progress.

use crate::config::Config;
use crate::core::cache::{AggregateCache, EmployeeSums};
use crate::core::period::{DateRange, MonthKey, WeekBoundary, WeekRef};
use crate::core::store::PointStore;
use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::models::entry::PointEntry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Upper bound applied to percentages when they are displayed.
pub const MAX_DISPLAY_PERCENTAGE: f64 = 999.0;

/// What a progress query aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelector {
    Week(WeekRef),
    Month(MonthKey),
    Range(DateRange),
}

impl PeriodSelector {
    pub fn range(&self) -> AppResult<DateRange> {
        match self {
            PeriodSelector::Week(w) => Ok(w.range),
            PeriodSelector::Month(m) => m.bounds(),
            PeriodSelector::Range(r) => Ok(*r),
        }
    }

    /// Goal an employee is expected to reach over this period. Arbitrary
    /// ranges prorate the weekly goal by day count.
    pub fn goal_for(&self, employee: &Employee, monthly_weeks: u32) -> u64 {
        match self {
            PeriodSelector::Week(_) => employee.weekly_goal as u64,
            PeriodSelector::Month(_) => employee.monthly_goal(monthly_weeks) as u64,
            PeriodSelector::Range(r) => {
                let days = r.len_days().max(0) as u64;
                (employee.weekly_goal as u64 * days).div_ceil(7)
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            PeriodSelector::Week(w) => w.to_string(),
            PeriodSelector::Month(m) => format!("month {m}"),
            PeriodSelector::Range(r) => r.to_string(),
        }
    }
}

/// Display name → summed points for one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub by_employee: BTreeMap<String, u64>,
}

impl PeriodTotals {
    pub fn get(&self, name: &str) -> u64 {
        self.by_employee.get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.by_employee.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_employee.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.by_employee.iter()
    }
}

/// One employee's standing against a goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeProgress {
    pub employee_id: i64,
    pub name: String,
    pub points: u64,
    pub goal: u64,
    /// Raw `points / goal * 100`; never capped.
    pub percentage: f64,
    pub remaining: u64,
}

impl EmployeeProgress {
    pub fn new(employee: &Employee, points: u64, goal: u64) -> Self {
        Self {
            employee_id: employee.id,
            name: employee.name.clone(),
            points,
            goal,
            percentage: percentage_of(points, goal),
            remaining: goal.saturating_sub(points),
        }
    }

    /// Percentage as shown to users, capped at `MAX_DISPLAY_PERCENTAGE`.
    pub fn display_percentage(&self) -> f64 {
        self.percentage.clamp(0.0, MAX_DISPLAY_PERCENTAGE)
    }
}

/// `points / goal * 100`, or 0 when the goal is 0.
pub fn percentage_of(points: u64, goal: u64) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    points as f64 / goal as f64 * 100.0
}

/// Sum points per employee for entries whose date portion lies in `range`.
pub fn sum_by_employee(range: &DateRange, entries: &[PointEntry]) -> EmployeeSums {
    let mut sums = EmployeeSums::new();
    for entry in entries.iter().filter(|e| range.contains(e.date())) {
        *sums.entry(entry.employee_id).or_insert(0) += entry.points as u64;
    }
    sums
}

/// Aggregates point entries from a [`PointStore`], memoizing each date range
/// in an [`AggregateCache`].
pub struct ProgressService<'a, S: PointStore + ?Sized> {
    store: &'a S,
    cache: AggregateCache,
    rule: WeekBoundary,
    monthly_weeks: u32,
}

impl<'a, S: PointStore + ?Sized> ProgressService<'a, S> {
    pub fn new(
        store: &'a S,
        cache: AggregateCache,
        rule: WeekBoundary,
        monthly_weeks: u32,
    ) -> Self {
        Self {
            store,
            cache,
            rule,
            monthly_weeks,
        }
    }

    pub fn from_config(store: &'a S, cache: AggregateCache, cfg: &Config) -> Self {
        Self::new(store, cache, cfg.week_boundary, cfg.goals.monthly_weeks)
    }

    pub fn rule(&self) -> WeekBoundary {
        self.rule
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    pub fn cache(&self) -> &AggregateCache {
        &self.cache
    }

    /// Goal `employee` is measured against over `selector`.
    pub fn goal(&self, selector: &PeriodSelector, employee: &Employee) -> u64 {
        selector.goal_for(employee, self.monthly_weeks)
    }

    pub fn employees(&self) -> AppResult<Vec<Employee>> {
        self.store.employees()
    }

    pub fn employee(&self, id: i64) -> AppResult<Employee> {
        self.store
            .employee(id)?
            .ok_or_else(|| AppError::EmployeeNotFound(format!("#{id}")))
    }

    /// Points per employee id over `range`, cached.
    pub fn points_by_employee(&self, range: DateRange) -> AppResult<Arc<EmployeeSums>> {
        if let Some(hit) = self.cache.get(&range) {
            tracing::debug!(%range, "aggregate cache hit");
            return Ok(hit);
        }

        let entries = self.store.entries_between(range, None)?;
        let sums = Arc::new(sum_by_employee(&range, &entries));
        tracing::debug!(%range, entries = entries.len(), "aggregated period");

        self.cache.insert(range, Arc::clone(&sums));
        Ok(sums)
    }

    pub fn employee_points(&self, range: DateRange, employee_id: i64) -> AppResult<u64> {
        let sums = self.points_by_employee(range)?;
        Ok(sums.get(&employee_id).copied().unwrap_or(0))
    }

    /// Display name → points for `range`. Employees without entries are
    /// left out, so a period with no entries yields an empty mapping.
    pub fn totals(&self, range: DateRange, employee_id: Option<i64>) -> AppResult<PeriodTotals> {
        let employees = match employee_id {
            Some(id) => vec![self.employee(id)?],
            None => self.store.employees()?,
        };

        let sums = self.points_by_employee(range)?;
        let mut totals = PeriodTotals::default();

        for emp in &employees {
            if let Some(points) = sums.get(&emp.id) {
                *totals.by_employee.entry(emp.name.clone()).or_insert(0) += points;
            }
        }

        let orphans = sums
            .keys()
            .filter(|id| !employees.iter().any(|e| e.id == **id))
            .count();
        if employee_id.is_none() && orphans > 0 {
            tracing::warn!(orphans, %range, "entries reference unknown employees");
        }

        Ok(totals)
    }

    /// Progress of one employee over any period.
    pub fn progress(
        &self,
        selector: PeriodSelector,
        employee_id: i64,
    ) -> AppResult<EmployeeProgress> {
        let employee = self.employee(employee_id)?;
        self.progress_of(selector, &employee)
    }

    pub fn progress_of(
        &self,
        selector: PeriodSelector,
        employee: &Employee,
    ) -> AppResult<EmployeeProgress> {
        let range = selector.range()?;
        let points = self.employee_points(range, employee.id)?;
        let goal = self.goal(&selector, employee);
        Ok(EmployeeProgress::new(employee, points, goal))
    }

    pub fn weekly_progress(&self, week: WeekRef, employee_id: i64) -> AppResult<EmployeeProgress> {
        self.progress(PeriodSelector::Week(week), employee_id)
    }

    pub fn monthly_progress(
        &self,
        month: MonthKey,
        employee_id: i64,
    ) -> AppResult<EmployeeProgress> {
        self.progress(PeriodSelector::Month(month), employee_id)
    }

    /// Progress of every employee (including those with zero points).
    pub fn team_progress(&self, selector: PeriodSelector) -> AppResult<Vec<EmployeeProgress>> {
        self.store
            .employees()?
            .iter()
            .map(|emp| self.progress_of(selector, emp))
            .collect()
    }
}
