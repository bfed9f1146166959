use serde::{Deserialize, Serialize};

use crate::model::{common::election::CandidateId, registry::Candidate};

/// A candidate registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSpec {
    /// Candidate name.
    pub name: String,
}

/// The public view of a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDetails {
    /// Candidate ID within its election.
    pub id: CandidateId,
    /// Candidate name.
    pub name: String,
    /// Ballots cast for this candidate so far.
    pub vote_count: u64,
}

impl From<&Candidate> for CandidateDetails {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name.clone(),
            vote_count: candidate.vote_count,
        }
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl CandidateSpec {
        pub fn example(name: &str) -> Self {
            Self {
                name: name.to_string(),
            }
        }
    }
}
