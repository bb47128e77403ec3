pub mod dashboard;
pub mod refresh;
pub mod ui;

pub use dashboard::DashboardOptions;
