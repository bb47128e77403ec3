//! Core domain: indicator rows, merging, enrichment, storage and the dashboard model

pub mod config;
pub mod dashboard;
pub mod enrich;
pub mod fetch;
pub mod indicator;
pub mod log;
pub mod merge;
pub mod row;
pub mod table;

// Re-export main types for cleaner imports
pub use dashboard::{CountryDashboard, DashboardError};
pub use enrich::GapPolicy;
pub use fetch::{FetchError, FetchRequest, IndicatorSource, YearRange};
pub use indicator::{Indicator, Observation};
pub use row::{EnrichedRow, IndicatorRow};
pub use table::TableStore;
