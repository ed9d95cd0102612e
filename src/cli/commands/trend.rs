use crate::cli::commands::{open_db, resolve_employee, service};
use crate::cli::parser::{Commands, TrendKind};
use crate::config::Config;
use crate::core::trend::{Series, daily_series, monthly_series, weekly_series};
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::colorize_points;
use crate::utils::date::reference_date;
use crate::utils::format_points;
use crate::utils::table::{Column, Table};

fn render(series: &Series) -> String {
    let mut columns = vec![Column::left("Employee")];
    columns.extend(series.labels.iter().map(|l| Column::right(l)));
    columns.push(Column::right("Total"));

    let mut table = Table::new(columns);
    for row in &series.rows {
        let mut cells = vec![row.name.clone()];
        cells.extend(
            row.values
                .iter()
                .map(|v| colorize_points(*v, &format_points(*v))),
        );
        cells.push(format_points(row.total()));
        table.add_row(cells);
    }
    table.render()
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Trend {
        kind,
        date,
        employee,
        count,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let svc = service(&pool, cfg);
        let day = reference_date(date.as_deref())?;
        let emp_id = resolve_employee(&pool, employee.as_deref())?.map(|e| e.id);

        let (title, series) = match kind {
            TrendKind::Weekly => ("Weekly points", weekly_series(&svc, day, emp_id)?),
            TrendKind::Daily => ("Daily points", daily_series(&svc, day, emp_id)?),
            TrendKind::Monthly => ("Monthly points", monthly_series(&svc, day, *count, emp_id)?),
        };

        header(format!("{title} up to {day}"));

        if series.rows.is_empty() {
            info("No employees registered. Use `employee add`.");
            return Ok(());
        }
        print!("{}", render(&series));
    }
    Ok(())
}
