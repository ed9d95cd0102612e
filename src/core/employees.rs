use crate::config::Config;
use crate::core::store::PointStore;
use crate::db::employees::{insert_employee, load_employee, update_goals};
use crate::db::log::audit_lenient;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, NewEmployee};

pub struct EmployeeLogic;

impl EmployeeLogic {
    /// Provision a new employee. The weekly goal falls back to
    /// `goals.weekly_default`.
    pub fn add(
        pool: &DbPool,
        cfg: &Config,
        name: &str,
        login: &str,
        weekly_goal: Option<u32>,
        monthly_goal: Option<u32>,
        category: Option<String>,
    ) -> AppResult<Employee> {
        let name = name.trim();
        let login = login.trim();

        if name.is_empty() || login.is_empty() {
            return Err(AppError::InvalidInput(
                "employee name and login must not be empty".into(),
            ));
        }

        let new = NewEmployee {
            name: name.to_string(),
            login: login.to_string(),
            weekly_goal: weekly_goal.unwrap_or(cfg.goals.weekly_default),
            monthly_goal,
            default_category: category.unwrap_or_else(|| cfg.default_category.clone()),
        };

        let id = insert_employee(&pool.conn, &new)?;
        audit_lenient(
            &pool.conn,
            "employee_add",
            login,
            &format!("{name} (weekly goal {})", new.weekly_goal),
        );

        load_employee(&pool.conn, id)?.ok_or_else(|| AppError::EmployeeNotFound(login.into()))
    }

    /// Look an employee up by login (case-insensitive).
    pub fn resolve<S: PointStore + ?Sized>(store: &S, login: &str) -> AppResult<Employee> {
        store
            .employee_by_login(login)?
            .ok_or_else(|| AppError::EmployeeNotFound(login.to_string()))
    }

    pub fn set_goals(
        pool: &DbPool,
        login: &str,
        weekly_goal: Option<u32>,
        monthly_goal: Option<u32>,
    ) -> AppResult<Employee> {
        let current = Self::resolve(pool, login)?;

        let weekly = weekly_goal.unwrap_or(current.weekly_goal);
        let monthly = monthly_goal.or(current.monthly_goal);
        update_goals(&pool.conn, current.id, weekly, monthly)?;

        audit_lenient(
            &pool.conn,
            "employee_goals",
            &current.login,
            &format!(
                "weekly {weekly}, monthly {}",
                monthly.map_or_else(|| "derived".to_string(), |m| m.to_string())
            ),
        );

        load_employee(&pool.conn, current.id)?
            .ok_or_else(|| AppError::EmployeeNotFound(login.into()))
    }
}
