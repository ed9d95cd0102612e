pub mod cache;
pub mod employees;
pub mod entries;
pub mod kpi;
pub mod log;
pub mod notify;
pub mod period;
pub mod progress;
pub mod stats;
pub mod store;
pub mod trend;
