use crate::core::period::DateRange;
use crate::core::store::PointStore;
use crate::db::employees::{load_employee, load_employee_by_login, load_employees};
use crate::db::pool::DbPool;
use crate::db::queries::load_entries;
use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::models::entry::PointEntry;

impl PointStore for DbPool {
    fn employees(&self) -> AppResult<Vec<Employee>> {
        load_employees(&self.conn)
    }

    fn employee(&self, id: i64) -> AppResult<Option<Employee>> {
        load_employee(&self.conn, id)
    }

    fn employee_by_login(&self, login: &str) -> AppResult<Option<Employee>> {
        load_employee_by_login(&self.conn, login)
    }

    fn entries_between(
        &self,
        range: DateRange,
        employee_id: Option<i64>,
    ) -> AppResult<Vec<PointEntry>> {
        load_entries(&self.conn, Some(range), employee_id)
    }
}
