use crate::cli::commands::{open_db, period_selector, resolve_employee, service};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::period::{Cycle, DateRange};
use crate::core::stats::{PointStats, point_stats};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info};
use crate::utils::colors::{CYAN, RESET};
use crate::utils::date::today;
use crate::utils::format_points;
use crate::utils::table::{Column, Table};

/// Cycles covered when no period is given.
const DEFAULT_CYCLES: usize = 12;

fn default_range() -> DateRange {
    let current = Cycle::containing(today());
    let mut first = current;
    for _ in 1..DEFAULT_CYCLES {
        first = first.previous();
    }
    DateRange::new(first.start(), current.end())
}

fn print_stats(s: &PointStats) {
    header(format!("Statistics, {}", s.range));

    if s.total_records == 0 {
        info("No entries found for the selected period.");
        return;
    }

    println!("{CYAN}• Total points:{RESET}   {}", format_points(s.total_points));
    println!("{CYAN}• Records:{RESET}        {}", s.total_records);
    println!(
        "{CYAN}• Avg per record:{RESET} {:.1}",
        s.average_points_per_record
    );
    if let Some(name) = &s.top_employee {
        println!("{CYAN}• Top employee:{RESET}   {name}");
    }
    if let Some(month) = &s.top_month {
        println!("{CYAN}• Top month:{RESET}      {month}");
    }
    println!();

    let mut employees = Table::new(vec![
        Column::left("Employee"),
        Column::right("Points"),
        Column::right("Records"),
        Column::right("Average"),
    ]);
    for e in &s.employees {
        employees.add_row(vec![
            e.name.clone(),
            format_points(e.total_points),
            e.records.to_string(),
            format!("{:.1}", e.average_points),
        ]);
    }
    print!("{}", employees.render());
    println!();

    let mut categories = Table::new(vec![Column::left("Category"), Column::right("Points")]);
    for (category, points) in &s.by_category {
        categories.add_row(vec![category.clone(), format_points(*points)]);
    }
    print!("{}", categories.render());
    println!();

    let mut months = Table::new(vec![
        Column::left("Month"),
        Column::right("Points"),
        Column::right("Records"),
        Column::right("Average"),
    ]);
    for m in &s.months {
        months.add_row(vec![
            m.month.to_string(),
            format_points(m.total_points),
            m.records.to_string(),
            format!("{:.1}", m.average_points),
        ]);
    }
    print!("{}", months.render());
}

/// Totals, records and averages per employee, category and month.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats {
        employee,
        period,
        json,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let svc = service(&pool, cfg);
        let emp = resolve_employee(&pool, employee.as_deref())?;

        let range = match period_selector(period, cfg.week_boundary)? {
            Some(selector) => selector.range()?,
            None => default_range(),
        };

        let stats = point_stats(&svc, range, emp.map(|e| e.id))?;

        if *json {
            let out = serde_json::to_string_pretty(&stats)
                .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;
            println!("{out}");
        } else {
            print_stats(&stats);
        }
    }
    Ok(())
}
