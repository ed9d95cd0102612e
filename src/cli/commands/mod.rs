pub mod add;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod del;
pub mod edit;
pub mod employee;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
pub mod period;
pub mod progress;
pub mod stats;
pub mod trend;

use crate::cli::parser::PeriodArgs;
use crate::config::Config;
use crate::core::cache::AggregateCache;
use crate::core::employees::EmployeeLogic;
use crate::core::period::{Cycle, MonthKey, WeekBoundary, WeekRef};
use crate::core::progress::{PeriodSelector, ProgressService};
use crate::db::initialize::init_db_with;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::range::parse_range;
use crate::models::employee::Employee;
use crate::utils::date::reference_date;
use std::io::{self, Write};

/// Open the configured database and bring its schema up to date.
pub(crate) fn open_db(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db_with(&pool.conn, &cfg.goals)?;
    Ok(pool)
}

pub(crate) fn service<'a>(pool: &'a DbPool, cfg: &Config) -> ProgressService<'a, DbPool> {
    ProgressService::from_config(pool, AggregateCache::from_config(&cfg.cache), cfg)
}

pub(crate) fn resolve_employee(pool: &DbPool, login: Option<&str>) -> AppResult<Option<Employee>> {
    login.map(|l| EmployeeLogic::resolve(pool, l)).transpose()
}

/// Turn `--week/--month/--range/--date` into a selector; `None` when no
/// option was given.
pub(crate) fn period_selector(
    args: &PeriodArgs,
    rule: WeekBoundary,
) -> AppResult<Option<PeriodSelector>> {
    if let Some(r) = &args.range {
        return Ok(Some(PeriodSelector::Range(parse_range(r)?)));
    }

    let month = args.month.as_deref().map(str::parse::<MonthKey>).transpose()?;

    match (args.week, month) {
        (Some(n), Some(m)) => Ok(Some(PeriodSelector::Week(WeekRef::new(m.cycle()?, n, rule)?))),
        (None, Some(m)) => Ok(Some(PeriodSelector::Month(m))),
        (Some(n), None) => {
            let cycle = Cycle::containing(reference_date(args.date.as_deref())?);
            Ok(Some(PeriodSelector::Week(WeekRef::new(cycle, n, rule)?)))
        }
        (None, None) => match &args.date {
            Some(d) => Ok(Some(PeriodSelector::Week(WeekRef::containing(
                reference_date(Some(d))?,
                rule,
            )))),
            None => Ok(None),
        },
    }
}

/// Ask a yes/no question on stdin; anything but y/yes is a no.
pub(crate) fn confirm(question: &str) -> AppResult<bool> {
    print!("{question} [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
