use serde::{Deserialize, Serialize};

use crate::model::{
    api::candidate::CandidateDetails,
    common::{election::CandidateId, voter::VoterAddress},
    registry::{leading_candidate, Election},
};

use super::ElectionDetails;

/// Everything recorded against one election, for offline auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResults {
    /// Top-level details.
    pub election: ElectionDetails,
    /// Every candidate with their tally, in ID order.
    pub candidates: Vec<CandidateDetails>,
    /// Every voter that has cast a ballot, in sorted order.
    pub voters: Vec<VoterAddress>,
    /// The current leader, if there are any candidates.
    pub leader: Option<CandidateId>,
}

impl From<&Election> for ElectionResults {
    fn from(election: &Election) -> Self {
        Self {
            election: election.into(),
            candidates: election.candidates.iter().map(Into::into).collect(),
            voters: election.voters.iter().cloned().collect(),
            leader: election.leader().map(|candidate| candidate.id),
        }
    }
}

/// Reasons a results dump can fail to add up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// The candidates are not numbered 1, 2, 3, ...
    CandidateNumbering { position: usize, found: CandidateId },
    /// The tallies don't sum to the number of voters.
    TallyMismatch { tallied: u64, voters: u64 },
    /// The reported leader isn't the one the tallies give.
    WrongLeader {
        reported: Option<CandidateId>,
        expected: Option<CandidateId>,
    },
    /// The reported candidate count doesn't match the list.
    CandidateCount { reported: u32, listed: usize },
}

impl ElectionResults {
    /// Check that the dump is internally consistent:
    /// candidates are densely numbered, each voter is counted exactly once,
    /// and the leader is the highest tally with ties going to the lowest ID.
    pub fn audit(&self) -> Result<(), AuditError> {
        if usize::try_from(self.election.candidate_count).ok() != Some(self.candidates.len()) {
            return Err(AuditError::CandidateCount {
                reported: self.election.candidate_count,
                listed: self.candidates.len(),
            });
        }

        for (position, candidate) in self.candidates.iter().enumerate() {
            if usize::try_from(candidate.id).ok() != Some(position + 1) {
                return Err(AuditError::CandidateNumbering {
                    position,
                    found: candidate.id,
                });
            }
        }

        let tallied: u64 = self.candidates.iter().map(|c| c.vote_count).sum();
        let voters = self.voters.len() as u64;
        if tallied != voters {
            return Err(AuditError::TallyMismatch { tallied, voters });
        }

        let expected = leading_candidate(self.candidates.iter().map(|c| (c.id, c.vote_count)));
        if expected != self.leader {
            return Err(AuditError::WrongLeader {
                reported: self.leader,
                expected,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn example() -> ElectionResults {
        let mut election = Election::new(1, "Mayor Election".to_string(), Utc::now());
        election.add_candidate("Alice".to_string()).unwrap();
        election.add_candidate("Bob".to_string()).unwrap();
        election.record_vote(2, &VoterAddress::example1()).unwrap();
        election.record_vote(1, &VoterAddress::example2()).unwrap();
        (&election).into()
    }

    #[test]
    fn results_from_election() {
        let results = example();
        assert_eq!(results.election.candidate_count, 2);
        assert_eq!(results.candidates[0].vote_count, 1);
        assert_eq!(results.candidates[1].vote_count, 1);
        assert_eq!(results.voters.len(), 2);
        assert_eq!(results.leader, Some(1));
        assert_eq!(results.audit(), Ok(()));
    }

    #[test]
    fn audit_catches_inflated_tally() {
        let mut results = example();
        results.candidates[1].vote_count += 1;
        assert_eq!(
            results.audit(),
            Err(AuditError::TallyMismatch {
                tallied: 3,
                voters: 2
            })
        );
    }

    #[test]
    fn audit_catches_wrong_leader() {
        let mut results = example();
        results.leader = Some(2);
        assert_eq!(
            results.audit(),
            Err(AuditError::WrongLeader {
                reported: Some(2),
                expected: Some(1)
            })
        );
    }

    #[test]
    fn tied_results_pass_audit() {
        let mut election = Election::new(1, "Lunch".to_string(), Utc::now());
        for name in ["Pizza", "Tacos", "Sushi"] {
            election.add_candidate(name.to_string()).unwrap();
        }
        election.record_vote(3, &VoterAddress::example1()).unwrap();
        election.record_vote(2, &VoterAddress::example2()).unwrap();

        let results = ElectionResults::from(&election);
        assert_eq!(results.leader, Some(2));
        assert_eq!(results.audit(), Ok(()));
    }

    #[test]
    fn audit_catches_renumbering() {
        let mut results = example();
        results.candidates.swap(0, 1);
        assert_eq!(
            results.audit(),
            Err(AuditError::CandidateNumbering {
                position: 0,
                found: 2
            })
        );
    }
}
