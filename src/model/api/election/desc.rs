use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{common::election::ElectionId, registry::Election};

/// The public view of an election's top-level details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionDetails {
    /// Election unique ID.
    pub id: ElectionId,
    /// Election title.
    pub title: String,
    /// False once the election has been ended.
    pub is_active: bool,
    /// Earliest time the election may be ended.
    pub end_time: DateTime<Utc>,
    /// Number of registered candidates.
    pub candidate_count: u32,
}

impl From<&Election> for ElectionDetails {
    fn from(election: &Election) -> Self {
        Self {
            id: election.id,
            title: election.title.clone(),
            is_active: election.is_active(),
            end_time: election.end_time,
            // Candidate IDs are `u32`, so the count always fits.
            candidate_count: u32::try_from(election.candidates.len()).unwrap_or(u32::MAX),
        }
    }
}
