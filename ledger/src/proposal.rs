//! Proposal records and their lifecycle.

use crate::error::LedgerError;
use quadra_types::{Credits, LedgerParams, ProposalId, Timestamp, VoterId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A time-bounded subject of voting.
///
/// Created active; turns inactive either by explicit admin action or
/// functionally once `now` passes the deadline. The stored `active` flag is
/// *not* flipped at the deadline — expiry is observed lazily through
/// [`Proposal::is_open`] at vote time. Once inactive the record is terminal:
/// reads only, no further mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub description: String,
    pub proposer: VoterId,
    /// Absolute time after which votes are rejected.
    pub deadline: Timestamp,
    pub active: bool,
    /// Votes cast across all voters.
    pub total_votes: u64,
    /// Credits spent across all voters.
    pub total_credits_used: Credits,
}

impl Proposal {
    /// The single open predicate: accepting votes means `active` and the
    /// deadline has not passed. Used everywhere instead of duplicating the
    /// deadline comparison.
    pub fn is_open(&self, now: Timestamp) -> bool {
        self.active && now <= self.deadline
    }
}

/// Owns all proposal records and the sequential id counter.
#[derive(Clone, Debug, Default)]
pub struct ProposalStore {
    proposals: HashMap<ProposalId, Proposal>,
    next_id: u64,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a proposal, allocating the next sequential id.
    ///
    /// Validates title, description, and duration bounds; the caller's
    /// registration is the orchestrating ledger's concern.
    pub fn create(
        &mut self,
        proposer: &VoterId,
        title: &str,
        description: &str,
        duration_secs: u64,
        now: Timestamp,
        params: &LedgerParams,
    ) -> Result<ProposalId, LedgerError> {
        if title.is_empty() {
            return Err(LedgerError::EmptyTitle);
        }
        if description.is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        if !params.duration_in_bounds(duration_secs) {
            return Err(LedgerError::DurationOutOfRange {
                secs: duration_secs,
                min: params.min_proposal_duration_secs,
                max: params.max_proposal_duration_secs,
            });
        }
        let id = ProposalId::new(self.next_id);
        self.next_id += 1;
        self.proposals.insert(
            id,
            Proposal {
                id,
                title: title.to_owned(),
                description: description.to_owned(),
                proposer: proposer.clone(),
                deadline: now.plus_secs(duration_secs),
                active: true,
                total_votes: 0,
                total_credits_used: Credits::ZERO,
            },
        );
        Ok(id)
    }

    /// Close a proposal explicitly. Fails if unknown or already closed.
    pub fn end(&mut self, id: ProposalId) -> Result<&Proposal, LedgerError> {
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(LedgerError::ProposalNotFound(id))?;
        if !proposal.active {
            return Err(LedgerError::ProposalClosed(id));
        }
        proposal.active = false;
        Ok(proposal)
    }

    pub fn get(&self, id: ProposalId) -> Result<&Proposal, LedgerError> {
        self.proposals.get(&id).ok_or(LedgerError::ProposalNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, LedgerError> {
        self.proposals
            .get_mut(&id)
            .ok_or(LedgerError::ProposalNotFound(id))
    }

    /// The id the next created proposal will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    pub(crate) fn insert_restored(&mut self, proposal: Proposal) {
        self.proposals.insert(proposal.id, proposal);
    }

    pub(crate) fn set_next_id(&mut self, next_id: u64) {
        self.next_id = next_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 24 * 3600;

    fn store_with_one(now: Timestamp) -> (ProposalStore, ProposalId) {
        let mut store = ProposalStore::new();
        let id = store
            .create(
                &VoterId::new("alice"),
                "Fund the park",
                "Plant trees along the river",
                7 * DAY,
                now,
                &LedgerParams::standard(),
            )
            .unwrap();
        (store, id)
    }

    #[test]
    fn ids_are_sequential_from_zero() {
        let now = Timestamp::new(1_000);
        let (mut store, first) = store_with_one(now);
        assert_eq!(first, ProposalId::new(0));
        let second = store
            .create(
                &VoterId::new("bob"),
                "Second",
                "More detail",
                DAY,
                now,
                &LedgerParams::standard(),
            )
            .unwrap();
        assert_eq!(second, ProposalId::new(1));
        assert_eq!(store.next_id(), 2);
    }

    #[test]
    fn empty_title_or_description_is_rejected() {
        let mut store = ProposalStore::new();
        let params = LedgerParams::standard();
        let now = Timestamp::new(1_000);
        assert!(matches!(
            store.create(&VoterId::new("a"), "", "desc", DAY, now, &params),
            Err(LedgerError::EmptyTitle)
        ));
        assert!(matches!(
            store.create(&VoterId::new("a"), "title", "", DAY, now, &params),
            Err(LedgerError::EmptyDescription)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn duration_bounds_are_enforced() {
        let mut store = ProposalStore::new();
        let params = LedgerParams::standard();
        let now = Timestamp::new(1_000);
        for bad in [0, DAY - 1, 31 * DAY] {
            assert!(matches!(
                store.create(&VoterId::new("a"), "t", "d", bad, now, &params),
                Err(LedgerError::DurationOutOfRange { .. })
            ));
        }
        assert!(store
            .create(&VoterId::new("a"), "t", "d", DAY, now, &params)
            .is_ok());
    }

    #[test]
    fn open_until_deadline_inclusive() {
        let now = Timestamp::new(1_000);
        let (store, id) = store_with_one(now);
        let proposal = store.get(id).unwrap();
        assert!(proposal.is_open(now));
        assert!(proposal.is_open(proposal.deadline));
        assert!(!proposal.is_open(proposal.deadline.plus_secs(1)));
    }

    #[test]
    fn ending_twice_fails() {
        let now = Timestamp::new(1_000);
        let (mut store, id) = store_with_one(now);
        store.end(id).unwrap();
        assert!(matches!(store.end(id), Err(LedgerError::ProposalClosed(_))));
        // closed regardless of time
        assert!(!store.get(id).unwrap().is_open(now));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = ProposalStore::new();
        assert!(matches!(
            store.end(ProposalId::new(7)),
            Err(LedgerError::ProposalNotFound(_))
        ));
        assert!(matches!(
            store.get(ProposalId::new(7)),
            Err(LedgerError::ProposalNotFound(_))
        ));
    }
}
