use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::cache::AggregateCache;
use crate::core::employees::EmployeeLogic;
use crate::core::entries::{AddRequest, EntryLogic};
use crate::core::notify::Notifier;
use crate::core::period::{WeekRef, parse_timestamp};
use crate::errors::AppResult;
use crate::ui::messages::success;
use chrono::{Local, Timelike};

/// Record points for an employee.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        login,
        points,
        at,
        category,
        notes,
        force,
    } = cmd
    {
        let recorded_at = match at {
            Some(s) => parse_timestamp(s)?,
            None => {
                let now = Local::now().naive_local();
                now.with_nanosecond(0).unwrap_or(now)
            }
        };

        let pool = open_db(cfg)?;
        let cache = AggregateCache::from_config(&cfg.cache);
        let employee = EmployeeLogic::resolve(&pool, login)?;

        let entry = EntryLogic::new(&pool, &cache).add(
            cfg,
            &employee,
            AddRequest {
                recorded_at,
                points: *points,
                category: category.clone(),
                notes: notes.clone(),
                force: *force,
            },
        )?;

        let week = WeekRef::containing(entry.date(), cfg.week_boundary);
        success(format!(
            "Entry #{} recorded: {} +{} points on {} [{}] ({}).",
            entry.id,
            employee.name,
            entry.points,
            entry.timestamp_str(),
            entry.category,
            week
        ));

        // Let a pending confirmation finish before the process exits.
        let notifier = Notifier::from_config(&cfg.notifications);
        if let Some(handle) = notifier.entry_recorded(&employee.name, &entry) {
            let _ = handle.join();
        }
    }
    Ok(())
}
