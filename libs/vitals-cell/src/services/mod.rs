pub mod vitals;

pub use vitals::{VitalsService, DEFAULT_HISTORY_LIMIT};
