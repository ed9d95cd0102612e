use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::cache::AggregateCache;
use crate::errors::AppResult;
use crate::import::{ImportLogic, ImportOptions};
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;

/// Import every spreadsheet of a folder.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import {
        folder,
        create_missing,
        dry_run,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let cache = AggregateCache::from_config(&cfg.cache);
        let folder = expand_tilde(folder);

        let report = ImportLogic::new(&pool, &cache).import_folder(
            cfg,
            &folder,
            ImportOptions {
                create_missing: *create_missing,
                dry_run: *dry_run,
            },
        )?;

        if report.files == 0 {
            warning(format!("No spreadsheets found in {}.", folder.display()));
            return Ok(());
        }

        let verb = if *dry_run { "Would import" } else { "Imported" };
        success(format!(
            "{verb} {} entries from {}/{} files ({} duplicates, {} rows skipped).",
            report.entries,
            report.imported_files,
            report.files,
            report.duplicates,
            report.skipped_rows
        ));
        for file in &report.skipped_files {
            info(format!("Not imported: {file}"));
        }
    }
    Ok(())
}
