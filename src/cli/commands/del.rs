use crate::cli::commands::{confirm, open_db, resolve_employee};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::cache::AggregateCache;
use crate::core::entries::EntryLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del {
        id,
        all,
        employee,
        yes,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let cache = AggregateCache::from_config(&cfg.cache);
        let logic = EntryLogic::new(&pool, &cache);

        if *all {
            let emp = resolve_employee(&pool, employee.as_deref())?;
            let scope = match &emp {
                Some(e) => format!("ALL entries of {} ({})", e.name, e.login),
                None => "ALL entries of ALL employees".to_string(),
            };

            warning(format!("This will permanently delete {scope}."));
            if !*yes && !confirm("Continue?")? {
                info("Deletion cancelled.");
                return Ok(());
            }

            let n = logic.delete_all(emp.as_ref())?;
            success(format!("🗑️ Deleted {n} entries."));
            return Ok(());
        }

        if let Some(id) = id {
            let entry = logic.delete(*id)?;
            success(format!(
                "🗑️ Deleted entry #{} ({} points on {}).",
                entry.id,
                entry.points,
                entry.timestamp_str()
            ));
        }
    }
    Ok(())
}
