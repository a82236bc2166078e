pub mod alerts;

pub use alerts::{AlertService, AlertSource, DEFAULT_FEED_LIMIT};
