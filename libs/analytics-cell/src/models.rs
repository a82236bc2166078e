pub const ANALYTICS_LOAD_ERROR: &str = "Could not compute analytics for this patient.";

/// Readings shown on the dashboard, newest first.
pub const DASHBOARD_VITALS_LIMIT: u32 = 5;
