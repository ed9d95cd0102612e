//! Executive KPI roll-up for the week containing a reference date.

use crate::config::KpiConfig;
use crate::core::period::{DateRange, WeekRef};
use crate::core::progress::{EmployeeProgress, PeriodSelector, ProgressService};
use crate::core::store::PointStore;
use crate::errors::AppResult;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn from_variation(variation: f64) -> Self {
        if variation > 0.0 {
            TrendDirection::Up
        } else if variation < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamPerformance {
    pub total_points: u64,
    pub avg_points_per_employee: f64,
    pub goal_achievement_rate: f64,
    pub employees_meeting_goals: usize,
    pub total_employees: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendsAndAlerts {
    pub employees_at_risk: Vec<EmployeeProgress>,
    pub top_performers: Vec<EmployeeProgress>,
    pub critical_alerts_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparative {
    pub current_week: DateRange,
    pub previous_week: DateRange,
    pub current_week_points: u64,
    pub previous_week_points: u64,
    pub week_variation_percentage: f64,
    pub trend_direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveKpis {
    pub week_label: String,
    pub team_performance: TeamPerformance,
    pub trends_and_alerts: TrendsAndAlerts,
    pub comparative: Comparative,
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0.
pub fn week_variation(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

fn by_percentage(a: &EmployeeProgress, b: &EmployeeProgress) -> Ordering {
    a.percentage
        .partial_cmp(&b.percentage)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.name.cmp(&b.name))
}

pub fn calculate_executive_kpis<S: PointStore + ?Sized>(
    service: &ProgressService<'_, S>,
    reference: NaiveDate,
    thresholds: &KpiConfig,
) -> AppResult<ExecutiveKpis> {
    let rule = service.rule();
    let week = WeekRef::containing(reference, rule);
    let previous = week.previous(rule);

    let team = service.team_progress(PeriodSelector::Week(week))?;
    let total_employees = team.len();
    let total_points: u64 = team.iter().map(|p| p.points).sum();

    let employees_meeting_goals = team
        .iter()
        .filter(|p| p.percentage >= thresholds.meeting_threshold)
        .count();

    let mut at_risk: Vec<EmployeeProgress> = team
        .iter()
        .filter(|p| p.percentage < thresholds.meeting_threshold)
        .cloned()
        .collect();
    at_risk.sort_by(by_percentage);
    let critical_alerts_count = at_risk.len();
    at_risk.truncate(thresholds.list_limit);

    let mut top: Vec<EmployeeProgress> = team
        .iter()
        .filter(|p| p.percentage >= thresholds.top_threshold)
        .cloned()
        .collect();
    top.sort_by(|a, b| by_percentage(b, a));
    top.truncate(thresholds.list_limit);

    let previous_sums = service.points_by_employee(previous.range)?;
    let previous_week_points: u64 = team
        .iter()
        .map(|p| previous_sums.get(&p.employee_id).copied().unwrap_or(0))
        .sum();

    let variation = week_variation(total_points, previous_week_points);

    let (avg, rate) = if total_employees == 0 {
        (0.0, 0.0)
    } else {
        (
            total_points as f64 / total_employees as f64,
            employees_meeting_goals as f64 / total_employees as f64 * 100.0,
        )
    };

    tracing::info!(
        week = %week,
        total_points,
        previous_week_points,
        "computed executive KPIs"
    );

    Ok(ExecutiveKpis {
        week_label: week.to_string(),
        team_performance: TeamPerformance {
            total_points,
            avg_points_per_employee: avg,
            goal_achievement_rate: rate,
            employees_meeting_goals,
            total_employees,
        },
        trends_and_alerts: TrendsAndAlerts {
            employees_at_risk: at_risk,
            top_performers: top,
            critical_alerts_count,
        },
        comparative: Comparative {
            current_week: week.range,
            previous_week: previous.range,
            current_week_points: total_points,
            previous_week_points,
            week_variation_percentage: variation,
            trend_direction: TrendDirection::from_variation(variation),
        },
    })
}
