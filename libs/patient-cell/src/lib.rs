pub mod detail;
pub mod models;
pub mod registration;
pub mod registry;
pub mod services;

pub use detail::{DetailServices, DetailState, PatientDetail};
pub use models::*;
pub use registration::{IdentityForm, Registration, RegistrationWizard};
pub use registry::PatientRegistry;
pub use services::PatientService;
