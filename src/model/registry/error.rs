use thiserror::Error;

use crate::model::common::election::{CandidateId, ElectionId};

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Reasons a registry operation can be rejected.
/// A rejected operation never changes any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Election {0} has ended")]
    ElectionClosed(ElectionId),
    #[error("Invalid candidate {candidate_id} for election {election_id}")]
    InvalidCandidate {
        election_id: ElectionId,
        candidate_id: CandidateId,
    },
    #[error("Already voted in election {0}")]
    AlreadyVoted(ElectionId),
    #[error("Election {0} not ended yet")]
    TooEarly(ElectionId),
    #[error("Election {0} was already ended")]
    AlreadyEnded(ElectionId),
    #[error("Election {0} has no candidates")]
    NoCandidates(ElectionId),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RegistryError {
    /// Stable name of the error kind, as reported to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::ElectionClosed(_) => "ElectionClosed",
            Self::InvalidCandidate { .. } => "InvalidCandidate",
            Self::AlreadyVoted(_) => "AlreadyVoted",
            Self::TooEarly(_) => "TooEarly",
            Self::AlreadyEnded(_) => "AlreadyEnded",
            Self::NoCandidates(_) => "NoCandidates",
            Self::InvalidInput(_) => "InvalidInput",
        }
    }

    pub(crate) fn election_not_found(election_id: ElectionId) -> Self {
        Self::NotFound(format!("Election with ID '{election_id}'"))
    }

    pub(crate) fn candidate_not_found(election_id: ElectionId, candidate_id: CandidateId) -> Self {
        Self::NotFound(format!(
            "Candidate with ID '{candidate_id}' in election '{election_id}'"
        ))
    }
}
