use serde::Serialize;

/// Weekly goals are split over a five-day work week.
pub const WORK_DAYS_PER_WEEK: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,               // ⇔ employees.name (display name)
    pub login: String,              // ⇔ employees.login (UNIQUE)
    pub weekly_goal: u32,           // ⇔ employees.weekly_goal
    pub monthly_goal: Option<u32>,  // ⇔ employees.monthly_goal (NULL = derived)
    pub default_category: String,   // ⇔ employees.default_category
    pub created_at: String,         // ⇔ employees.created_at (ISO8601)
}

impl Employee {
    /// Explicit monthly goal, or `weekly_goal * monthly_weeks` when unset.
    pub fn monthly_goal(&self, monthly_weeks: u32) -> u32 {
        self.monthly_goal
            .unwrap_or_else(|| self.weekly_goal.saturating_mul(monthly_weeks))
    }

    pub fn daily_goal(&self) -> u32 {
        self.weekly_goal / WORK_DAYS_PER_WEEK
    }
}

/// Input for provisioning a new employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub login: String,
    pub weekly_goal: u32,
    pub monthly_goal: Option<u32>,
    pub default_category: String,
}
