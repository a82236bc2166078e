// =====================================================================================
// ALERT CELL
// =====================================================================================
//
// Clinician alert feed:
// - Alert retrieval (global feed or per patient) and acknowledgement
// - Feed state with optimistic acknowledgement and an explicit failure policy
// - Periodic refresh that stops for good once torn down
//
// =====================================================================================

pub mod feed;
pub mod models;
pub mod poller;
pub mod services;

pub use feed::AlertFeed;
pub use models::{AckFailurePolicy, AlertFilter, FeedScope, FEED_LOAD_ERROR};
pub use poller::{AlertMonitor, PollerHandle};
pub use services::{AlertService, AlertSource, DEFAULT_FEED_LIMIT};
