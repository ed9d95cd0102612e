//! Persistence boundary consumed by the aggregation core.

use crate::core::period::DateRange;
use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::models::entry::PointEntry;

/// Read-only queries the aggregator needs. Implemented by the SQLite pool;
/// any other backend only has to answer these four questions.
pub trait PointStore {
    fn employees(&self) -> AppResult<Vec<Employee>>;

    fn employee(&self, id: i64) -> AppResult<Option<Employee>>;

    fn employee_by_login(&self, login: &str) -> AppResult<Option<Employee>>;

    /// Entries whose date portion lies inside `range` (inclusive), optionally
    /// restricted to one employee.
    fn entries_between(
        &self,
        range: DateRange,
        employee_id: Option<i64>,
    ) -> AppResult<Vec<PointEntry>>;
}
