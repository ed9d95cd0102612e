use crate::cli::commands::{open_db, period_selector, resolve_employee, service};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        employee,
        period,
        force,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let svc = service(&pool, cfg);
        let emp = resolve_employee(&pool, employee.as_deref())?;
        let selector = period_selector(period, cfg.week_boundary)?;

        ExportLogic::export(&svc, *format, file, selector, emp.as_ref(), *force)?;
    }
    Ok(())
}
