// =====================================================================================
// ANALYTICS CELL
// =====================================================================================
//
// Per-patient aggregates and the self-service dashboard built on them.
//
// =====================================================================================

pub mod dashboard;
pub mod models;
pub mod services;

pub use dashboard::PatientDashboard;
pub use models::{ANALYTICS_LOAD_ERROR, DASHBOARD_VITALS_LIMIT};
pub use services::AnalyticsService;
