use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::cache::AggregateCache;
use crate::core::entries::EntryLogic;
use crate::core::period::parse_timestamp;
use crate::errors::AppResult;
use crate::models::entry::EntryPatch;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        points,
        at,
        category,
        notes,
    } = cmd
    {
        let patch = EntryPatch {
            recorded_at: at.as_deref().map(parse_timestamp).transpose()?,
            category: category.clone(),
            points: *points,
            notes: notes.clone(),
        };

        let pool = open_db(cfg)?;
        let cache = AggregateCache::from_config(&cfg.cache);

        let entry = EntryLogic::new(&pool, &cache).edit(*id, &patch)?;

        if patch.is_empty() {
            info("Nothing to change: pass --points, --at, --category or --notes.");
            return Ok(());
        }

        success(format!(
            "✏️ Entry #{} updated: {} points on {} [{}].",
            entry.id,
            entry.points,
            entry.timestamp_str(),
            entry.category
        ));
    }
    Ok(())
}
