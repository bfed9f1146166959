//! The election registry: every election, and the rules for changing them.
//!
//! [`Registry`] is a plain synchronous state machine. It never reads the
//! clock or works out who is calling; both are passed in. Each operation
//! validates everything it needs before touching any state, so a rejected
//! operation leaves the registry exactly as it was.
//!
//! [`SharedRegistry`] wraps it for use from concurrent request handlers.

mod election;
mod error;
mod shared;

pub use election::{leading_candidate, Candidate, Election};
pub use error::{RegistryError, Result};
pub use shared::SharedRegistry;

use chrono::{DateTime, Duration, Utc};

use crate::model::common::{
    election::{CandidateId, ElectionId},
    voter::VoterAddress,
};

/// All elections, indexed by ID.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    /// The election with ID `n` lives at index `n - 1`. Elections are never
    /// removed, so IDs stay dense.
    elections: Vec<Election>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an election by ID.
    pub fn election(&self, election_id: ElectionId) -> Result<&Election> {
        usize::try_from(election_id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| self.elections.get(index))
            .ok_or_else(|| RegistryError::election_not_found(election_id))
    }

    fn election_mut(&mut self, election_id: ElectionId) -> Result<&mut Election> {
        usize::try_from(election_id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| self.elections.get_mut(index))
            .ok_or_else(|| RegistryError::election_not_found(election_id))
    }

    /// All elections, in ID order.
    pub fn elections(&self) -> impl Iterator<Item = &Election> {
        self.elections.iter()
    }

    /// Open a new election that may be ended `duration_seconds` after `now`.
    pub fn create_election(
        &mut self,
        title: String,
        duration_seconds: u64,
        now: DateTime<Utc>,
    ) -> Result<ElectionId> {
        if title.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "Election title must not be empty".to_string(),
            ));
        }
        let end_time = i64::try_from(duration_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|duration| now.checked_add_signed(duration))
            .ok_or_else(|| {
                RegistryError::InvalidInput(format!("Duration {duration_seconds}s is too long"))
            })?;
        let election_id = ElectionId::try_from(self.elections.len() + 1)
            .map_err(|_| RegistryError::InvalidInput("No election IDs left".to_string()))?;

        self.elections.push(Election::new(election_id, title, end_time));
        info!("Created election {election_id}, ending no earlier than {end_time}");
        Ok(election_id)
    }

    /// Register a candidate in an election that has not been ended.
    pub fn add_candidate(&mut self, election_id: ElectionId, name: String) -> Result<CandidateId> {
        let candidate_id = self.election_mut(election_id)?.add_candidate(name)?;
        info!("Added candidate {candidate_id} to election {election_id}");
        Ok(candidate_id)
    }

    /// Cast `voter`'s one and only ballot in an election.
    pub fn vote(
        &mut self,
        election_id: ElectionId,
        candidate_id: CandidateId,
        voter: &VoterAddress,
    ) -> Result<()> {
        // Voting in a non-existent election is reported the same way as
        // voting for a non-existent candidate.
        let election = self
            .election_mut(election_id)
            .map_err(|_| RegistryError::InvalidCandidate {
                election_id,
                candidate_id,
            })?;
        election.record_vote(candidate_id, voter)?;
        debug!("Recorded vote in election {election_id}");
        Ok(())
    }

    /// End an election whose end time has been reached.
    pub fn end_election(&mut self, election_id: ElectionId, now: DateTime<Utc>) -> Result<()> {
        self.election_mut(election_id)?.end(now)?;
        info!("Ended election {election_id}");
        Ok(())
    }

    /// The current leader of an election, ties going to the lowest ID.
    /// Available whether or not the election has ended.
    pub fn winning_candidate(&self, election_id: ElectionId) -> Result<&Candidate> {
        self.election(election_id)?.winner()
    }

    /// Get a candidate by ID.
    pub fn candidate(
        &self,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<&Candidate> {
        self.election(election_id)?
            .candidate(candidate_id)
            .ok_or_else(|| RegistryError::candidate_not_found(election_id, candidate_id))
    }

    /// Has `voter` cast a ballot in this election?
    pub fn has_voted(&self, election_id: ElectionId, voter: &VoterAddress) -> Result<bool> {
        Ok(self.election(election_id)?.has_voted(voter))
    }
}
