use serde::{Deserialize, Serialize};

/// Our election IDs are integers, starting from 1.
pub type ElectionId = u32;
/// Our candidate IDs are integers, starting from 1 within each election.
pub type CandidateId = u32;

/// States in the Election lifecycle.
/// The only transition is `Active` to `Ended`, and it is never undone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionState {
    /// Accepting candidates and votes.
    Active,
    /// Explicitly ended. Read-only from now on.
    Ended,
}

impl ElectionState {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}
