use crate::cli::commands::{open_db, period_selector, resolve_employee};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::period::Cycle;
use crate::core::progress::PeriodSelector;
use crate::core::store::PointStore;
use crate::db::queries::load_entries;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::date::today;
use crate::utils::format_points;
use crate::utils::table::{Column, Table};
use std::collections::HashMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { employee, period } = cmd {
        let pool = open_db(cfg)?;
        let emp = resolve_employee(&pool, employee.as_deref())?;

        let selector = period_selector(period, cfg.week_boundary)?
            .unwrap_or_else(|| PeriodSelector::Month(Cycle::containing(today()).month_key()));
        let range = selector.range()?;

        let entries = load_entries(&pool.conn, Some(range), emp.as_ref().map(|e| e.id))?;

        header(selector.label());

        if entries.is_empty() {
            info(format!("No entries between {} and {}.", range.start, range.end));
            return Ok(());
        }

        let names: HashMap<i64, String> = pool
            .employees()?
            .into_iter()
            .map(|e| (e.id, e.login))
            .collect();

        let mut table = Table::new(vec![
            Column::right("ID"),
            Column::left("Date"),
            Column::left("Employee"),
            Column::left("Category"),
            Column::right("Points"),
            Column::left("Notes"),
        ]);

        let mut total: u64 = 0;
        for e in &entries {
            total += e.points as u64;
            table.add_row(vec![
                e.id.to_string(),
                e.timestamp_str(),
                names
                    .get(&e.employee_id)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", e.employee_id)),
                e.category.clone(),
                format_points(e.points as u64),
                e.notes.clone(),
            ]);
        }

        print!("{}", table.render());
        println!(
            "\n{} entries, {} points",
            entries.len(),
            format_points(total)
        );
    }
    Ok(())
}
