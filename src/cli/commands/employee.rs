use crate::cli::commands::open_db;
use crate::cli::parser::{Commands, EmployeeAction};
use crate::config::Config;
use crate::core::employees::EmployeeLogic;
use crate::core::store::PointStore;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::format_points;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Employee { action } = cmd {
        let pool = open_db(cfg)?;

        match action {
            EmployeeAction::Add {
                name,
                login,
                weekly_goal,
                monthly_goal,
                category,
            } => {
                let emp = EmployeeLogic::add(
                    &pool,
                    cfg,
                    name,
                    login,
                    *weekly_goal,
                    *monthly_goal,
                    category.clone(),
                )?;
                success(format!(
                    "Employee '{}' ({}) added with weekly goal {}.",
                    emp.name,
                    emp.login,
                    format_points(emp.weekly_goal as u64)
                ));
            }

            EmployeeAction::List => {
                let employees = pool.employees()?;
                if employees.is_empty() {
                    info("No employees registered. Use `employee add`.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::right("ID"),
                    Column::left("Login"),
                    Column::left("Name"),
                    Column::right("Weekly"),
                    Column::right("Monthly"),
                    Column::right("Daily"),
                    Column::left("Category"),
                ]);

                for e in &employees {
                    table.add_row(vec![
                        e.id.to_string(),
                        e.login.clone(),
                        e.name.clone(),
                        format_points(e.weekly_goal as u64),
                        format_points(e.monthly_goal(cfg.goals.monthly_weeks) as u64),
                        format_points(e.daily_goal() as u64),
                        e.default_category.clone(),
                    ]);
                }
                print!("{}", table.render());
            }

            EmployeeAction::Goals {
                login,
                weekly_goal,
                monthly_goal,
            } => {
                let emp = EmployeeLogic::set_goals(&pool, login, *weekly_goal, *monthly_goal)?;
                success(format!(
                    "Goals for '{}': weekly {}, monthly {}.",
                    emp.login,
                    format_points(emp.weekly_goal as u64),
                    format_points(emp.monthly_goal(cfg.goals.monthly_weeks) as u64)
                ));
            }
        }
    }
    Ok(())
}
