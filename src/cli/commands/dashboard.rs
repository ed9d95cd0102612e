use crate::cli::commands::{open_db, service};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::kpi::{ExecutiveKpis, calculate_executive_kpis};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, success, warning};
use crate::utils::colors::{CYAN, RESET, color_for_variation, paint};
use crate::utils::date::reference_date;
use crate::utils::formatting::format_signed_percentage;
use crate::utils::{format_percentage, format_points};

fn print_kpis(k: &ExecutiveKpis) {
    let team = &k.team_performance;
    let alerts = &k.trends_and_alerts;
    let cmp = &k.comparative;

    header(format!("Dashboard, {}", k.week_label));

    println!("{CYAN}• Total points:{RESET}      {}", format_points(team.total_points));
    println!(
        "{CYAN}• Avg per employee:{RESET}  {:.1}",
        team.avg_points_per_employee
    );
    println!(
        "{CYAN}• Meeting goal:{RESET}      {}/{} ({})",
        team.employees_meeting_goals,
        team.total_employees,
        format_percentage(team.goal_achievement_rate)
    );
    println!(
        "{CYAN}• vs previous week:{RESET}  {} → {} ({}, {})",
        format_points(cmp.previous_week_points),
        format_points(cmp.current_week_points),
        paint(
            color_for_variation(cmp.week_variation_percentage),
            &format_signed_percentage(cmp.week_variation_percentage)
        ),
        cmp.trend_direction
    );
    println!();

    if alerts.top_performers.is_empty() {
        println!("Top performers: -");
    } else {
        println!("Top performers:");
        for p in &alerts.top_performers {
            success(format!(
                "{} {}",
                p.name,
                format_percentage(p.display_percentage())
            ));
        }
    }

    if alerts.critical_alerts_count == 0 {
        println!("At risk: -");
    } else {
        println!("At risk ({} total):", alerts.critical_alerts_count);
        for p in &alerts.employees_at_risk {
            warning(format!(
                "{} {} ({} remaining)",
                p.name,
                format_percentage(p.display_percentage()),
                format_points(p.remaining)
            ));
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dashboard { date, json } = cmd {
        let pool = open_db(cfg)?;
        let svc = service(&pool, cfg);
        let day = reference_date(date.as_deref())?;

        let kpis = calculate_executive_kpis(&svc, day, &cfg.kpi)?;

        if *json {
            let out = serde_json::to_string_pretty(&kpis)
                .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;
            println!("{out}");
        } else {
            print_kpis(&kpis);
        }
    }
    Ok(())
}
