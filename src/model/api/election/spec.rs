use serde::{Deserialize, Serialize};

/// An election specification, as submitted by whoever opens the election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSpec {
    /// Election title.
    pub title: String,
    /// Seconds from creation until the election may be ended.
    pub duration_seconds: u64,
}
