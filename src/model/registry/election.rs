use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{
    election::{CandidateId, ElectionId, ElectionState},
    voter::VoterAddress,
};

use super::error::{RegistryError, Result};

/// A single timed election and everything recorded against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    /// Election unique ID.
    pub id: ElectionId,
    /// Election title.
    pub title: String,
    /// Earliest time at which the election may be ended.
    pub end_time: DateTime<Utc>,
    /// Election state.
    pub state: ElectionState,
    /// Registered candidates, in registration order.
    /// The candidate with ID `n` lives at index `n - 1`.
    pub candidates: Vec<Candidate>,
    /// Everyone who has cast a ballot.
    pub voters: BTreeSet<VoterAddress>,
}

/// A candidate standing in one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate ID, unique within its election.
    pub id: CandidateId,
    /// Candidate name. Not required to be unique.
    pub name: String,
    /// Number of ballots cast for this candidate.
    pub vote_count: u64,
}

impl Election {
    /// Create a new, active election with no candidates or voters.
    pub fn new(id: ElectionId, title: String, end_time: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            end_time,
            state: ElectionState::Active,
            candidates: Vec::new(),
            voters: BTreeSet::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Get a candidate by ID.
    pub fn candidate(&self, candidate_id: CandidateId) -> Option<&Candidate> {
        let index = usize::try_from(candidate_id).ok()?.checked_sub(1)?;
        self.candidates.get(index)
    }

    fn candidate_mut(&mut self, candidate_id: CandidateId) -> Option<&mut Candidate> {
        let index = usize::try_from(candidate_id).ok()?.checked_sub(1)?;
        self.candidates.get_mut(index)
    }

    /// Has this voter already cast a ballot here?
    pub fn has_voted(&self, voter: &VoterAddress) -> bool {
        self.voters.contains(voter)
    }

    /// Register a new candidate and return its ID.
    /// Only allowed until the election is ended, even if the end time has passed.
    pub fn add_candidate(&mut self, name: String) -> Result<CandidateId> {
        if !self.is_active() {
            return Err(RegistryError::ElectionClosed(self.id));
        }
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "Candidate name must not be empty".to_string(),
            ));
        }
        let candidate_id = CandidateId::try_from(self.candidates.len() + 1).map_err(|_| {
            RegistryError::InvalidInput(format!("Election {} is full", self.id))
        })?;
        self.candidates.push(Candidate {
            id: candidate_id,
            name,
            vote_count: 0,
        });
        Ok(candidate_id)
    }

    /// Record a ballot for the given candidate.
    pub fn record_vote(&mut self, candidate_id: CandidateId, voter: &VoterAddress) -> Result<()> {
        if !self.is_active() {
            return Err(RegistryError::ElectionClosed(self.id));
        }
        let election_id = self.id;
        if self.candidate(candidate_id).is_none() {
            return Err(RegistryError::InvalidCandidate {
                election_id,
                candidate_id,
            });
        }
        if self.has_voted(voter) {
            return Err(RegistryError::AlreadyVoted(election_id));
        }

        // All checks passed; the two updates below cannot fail.
        self.voters.insert(voter.clone());
        if let Some(candidate) = self.candidate_mut(candidate_id) {
            candidate.vote_count += 1;
        }
        Ok(())
    }

    /// End the election. Only possible once `end_time` has been reached.
    pub fn end(&mut self, now: DateTime<Utc>) -> Result<()> {
        if !self.is_active() {
            return Err(RegistryError::AlreadyEnded(self.id));
        }
        if now < self.end_time {
            return Err(RegistryError::TooEarly(self.id));
        }
        self.state = ElectionState::Ended;
        Ok(())
    }

    /// The candidate with the most votes.
    /// Ties go to whoever registered first, i.e. the lowest candidate ID.
    pub fn leader(&self) -> Option<&Candidate> {
        let tallies = self.candidates.iter().map(|c| (c.id, c.vote_count));
        leading_candidate(tallies).and_then(|id| self.candidate(id))
    }

    /// Like [`Election::leader`], but an empty field is an error.
    pub fn winner(&self) -> Result<&Candidate> {
        self.leader().ok_or(RegistryError::NoCandidates(self.id))
    }
}

/// Pick the leader from `(id, vote_count)` pairs given in ID order.
/// The highest tally wins; on a tie the earliest pair keeps the lead.
pub fn leading_candidate(
    tallies: impl IntoIterator<Item = (CandidateId, u64)>,
) -> Option<CandidateId> {
    tallies
        .into_iter()
        .fold(None, |best: Option<(CandidateId, u64)>, (id, votes)| match best {
            Some(best) if best.1 >= votes => Some(best),
            _ => Some((id, votes)),
        })
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn election_with(names: &[&str]) -> Election {
        let mut election = Election::new(1, "Mayor Election".to_string(), start());
        for name in names {
            election.add_candidate(name.to_string()).unwrap();
        }
        election
    }

    #[test]
    fn candidate_lookup_is_one_based() {
        let election = election_with(&["Alice", "Bob"]);
        assert!(election.candidate(0).is_none());
        assert_eq!(election.candidate(1).unwrap().name, "Alice");
        assert_eq!(election.candidate(2).unwrap().name, "Bob");
        assert!(election.candidate(3).is_none());
    }

    #[test]
    fn duplicate_names_are_allowed() {
        let election = election_with(&["Alice", "Alice"]);
        assert_eq!(election.candidates.len(), 2);
        assert_eq!(election.candidate(2).unwrap().id, 2);
    }

    #[test]
    fn blank_candidate_name_is_rejected() {
        let mut election = election_with(&[]);
        assert!(matches!(
            election.add_candidate("  ".to_string()),
            Err(RegistryError::InvalidInput(_))
        ));
        assert!(election.candidates.is_empty());
    }

    #[test]
    fn leader_breaks_ties_by_lowest_id() {
        let mut election = election_with(&["Alice", "Bob", "Carol"]);
        election.candidates[1].vote_count = 4;
        election.candidates[2].vote_count = 4;
        assert_eq!(election.leader().unwrap().id, 2);

        election.candidates[0].vote_count = 4;
        assert_eq!(election.leader().unwrap().id, 1);

        election.candidates[2].vote_count = 5;
        assert_eq!(election.leader().unwrap().id, 3);
    }

    #[test]
    fn leading_candidate_from_tallies() {
        assert_eq!(leading_candidate(Vec::<(CandidateId, u64)>::new()), None);
        assert_eq!(leading_candidate([(1, 0), (2, 0)]), Some(1));
        assert_eq!(leading_candidate([(1, 2), (2, 3), (3, 3)]), Some(2));
        assert_eq!(leading_candidate([(1, 7), (2, 3), (3, 7)]), Some(1));
    }

    #[test]
    fn no_votes_means_first_candidate_leads() {
        let election = election_with(&["Alice", "Bob"]);
        assert_eq!(election.winner().unwrap().id, 1);
    }

    #[test]
    fn empty_election_has_no_winner() {
        let election = election_with(&[]);
        assert!(election.leader().is_none());
        assert_eq!(election.winner(), Err(RegistryError::NoCandidates(1)));
    }

    #[test]
    fn end_respects_end_time_boundary() {
        let mut election = election_with(&[]);
        assert_eq!(
            election.end(start() - Duration::seconds(1)),
            Err(RegistryError::TooEarly(1))
        );
        assert!(election.is_active());

        // Exactly at the end time is allowed.
        election.end(start()).unwrap();
        assert!(!election.is_active());
        assert_eq!(election.end(start()), Err(RegistryError::AlreadyEnded(1)));
    }
}
