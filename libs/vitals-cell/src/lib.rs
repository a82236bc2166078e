pub mod form;
pub mod models;
pub mod services;

pub use form::VitalsForm;
pub use models::{FormError, RiskResultView, VitalField};
pub use services::{VitalsService, DEFAULT_HISTORY_LIMIT};
