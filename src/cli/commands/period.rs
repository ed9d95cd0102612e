use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::period::{Cycle, WEEKS_PER_CYCLE, WeekRef};
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, GREY, RESET};
use crate::utils::date::reference_date;

/// Show which cycle, week and month key a date falls in.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Period { date } = cmd {
        let day = reference_date(date.as_deref())?;
        let rule = cfg.week_boundary;
        let week = WeekRef::containing(day, rule);
        let cycle = Cycle::containing(day);

        header(format!("Period of {day}"));
        println!("{CYAN}• Cycle:{RESET}     {} .. {}", cycle.start(), cycle.end());
        println!("{CYAN}• Month key:{RESET} {}", cycle.month_key());
        println!("{CYAN}• Week:{RESET}      {} ({})", week.number, week.range);
        println!();

        for n in 1..=WEEKS_PER_CYCLE {
            let marker = if n == week.number { "▶" } else { " " };
            match cycle.week_bounds(n, rule)? {
                Some(r) => println!("  {marker} Week {n}: {r}"),
                None => println!("  {marker} {GREY}Week {n}: --{RESET}"),
            }
        }
    }
    Ok(())
}
