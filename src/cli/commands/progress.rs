use crate::cli::commands::{open_db, period_selector, resolve_employee, service};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::period::WeekRef;
use crate::core::progress::{EmployeeProgress, PeriodSelector};
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{color_for_percentage, paint};
use crate::utils::date::today;
use crate::utils::formatting::progress_bar;
use crate::utils::table::{Column, Table};
use crate::utils::{format_percentage, format_points};

const BAR_WIDTH: usize = 20;

fn row(p: &EmployeeProgress, warn_at: f64) -> Vec<String> {
    let color = color_for_percentage(p.percentage, warn_at);
    vec![
        p.name.clone(),
        format_points(p.points),
        format_points(p.goal),
        paint(color, &format_percentage(p.display_percentage())),
        format_points(p.remaining),
        progress_bar(p.percentage, BAR_WIDTH),
    ]
}

/// Progress against goals for one employee or the whole team.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Progress { employee, period } = cmd {
        let pool = open_db(cfg)?;
        let svc = service(&pool, cfg);
        let emp = resolve_employee(&pool, employee.as_deref())?;

        let selector = period_selector(period, cfg.week_boundary)?.unwrap_or_else(|| {
            PeriodSelector::Week(WeekRef::containing(today(), cfg.week_boundary))
        });

        let rows = match &emp {
            Some(e) => vec![svc.progress_of(selector, e)?],
            None => svc.team_progress(selector)?,
        };

        header(format!("Progress, {}", selector.label()));

        if rows.is_empty() {
            info("No employees registered. Use `employee add`.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::left("Employee"),
            Column::right("Points"),
            Column::right("Goal"),
            Column::right("Progress"),
            Column::right("Remaining"),
            Column::left(""),
        ]);
        for p in &rows {
            table.add_row(row(p, cfg.kpi.meeting_threshold));
        }
        print!("{}", table.render());
    }
    Ok(())
}
