use std::fmt;

use serde::{Deserialize, Serialize};

pub const FEED_LOAD_ERROR: &str = "Failed to load alerts. Check backend connection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertFilter {
    All,
    #[default]
    Unacknowledged,
}

impl AlertFilter {
    pub fn admits(&self, acknowledged: bool) -> bool {
        match self {
            AlertFilter::All => true,
            AlertFilter::Unacknowledged => !acknowledged,
        }
    }
}

impl fmt::Display for AlertFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertFilter::All => f.write_str("all"),
            AlertFilter::Unacknowledged => f.write_str("unacknowledged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    /// Most recent alerts across every patient.
    Global { limit: u32 },
    Patient { patient_id: String },
}

/// What happens to an optimistic acknowledgement when the remote call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckFailurePolicy {
    /// Leave the alert marked acknowledged; the next poll reconciles it.
    #[default]
    KeepOptimistic,
    /// Put the alert back as it was before the acknowledgement.
    Rollback,
}
