//! Per-(proposal, voter) spend records.
//!
//! Kept as a separate composite-key relation rather than maps nested inside
//! each proposal entity — iteration and existence checks stay in one place,
//! and the proposal record carries only its aggregates.

use quadra_types::{Credits, ProposalId, VoterId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cumulative votes and credits one voter has put on one proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub votes: u64,
    pub credits: Credits,
}

impl Stake {
    pub fn is_zero(&self) -> bool {
        self.votes == 0 && self.credits.is_zero()
    }
}

/// The (proposal, voter) → stake relation.
#[derive(Clone, Debug, Default)]
pub struct StakeBook {
    entries: HashMap<(ProposalId, VoterId), Stake>,
}

impl StakeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stake a voter holds on a proposal; zero if they never spent on it.
    pub fn get(&self, proposal: ProposalId, voter: &VoterId) -> Stake {
        self.entries
            .get(&(proposal, voter.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Accumulate one vote-cast call into the relation.
    pub(crate) fn accumulate(
        &mut self,
        proposal: ProposalId,
        voter: &VoterId,
        votes: u64,
        credits: Credits,
    ) {
        let entry = self
            .entries
            .entry((proposal, voter.clone()))
            .or_default();
        entry.votes = entry.votes.saturating_add(votes);
        entry.credits = entry.credits.saturating_add(credits);
    }

    /// All stakes on one proposal.
    pub fn by_proposal(
        &self,
        proposal: ProposalId,
    ) -> impl Iterator<Item = (&VoterId, Stake)> {
        self.entries
            .iter()
            .filter(move |((p, _), _)| *p == proposal)
            .map(|((_, v), stake)| (v, *stake))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulation_is_additive_per_call() {
        let mut book = StakeBook::new();
        let p = ProposalId::new(0);
        let alice = VoterId::new("alice");
        book.accumulate(p, &alice, 5, Credits::new(25));
        book.accumulate(p, &alice, 3, Credits::new(9));
        let stake = book.get(p, &alice);
        assert_eq!(stake.votes, 8);
        // 5² + 3², not 8²
        assert_eq!(stake.credits, Credits::new(34));
    }

    #[test]
    fn stakes_are_scoped_to_their_proposal() {
        let mut book = StakeBook::new();
        let alice = VoterId::new("alice");
        book.accumulate(ProposalId::new(0), &alice, 2, Credits::new(4));
        book.accumulate(ProposalId::new(1), &alice, 1, Credits::new(1));
        assert_eq!(book.get(ProposalId::new(0), &alice).votes, 2);
        assert_eq!(book.get(ProposalId::new(1), &alice).votes, 1);
        assert_eq!(book.by_proposal(ProposalId::new(0)).count(), 1);
    }

    #[test]
    fn absent_stake_is_zero() {
        let book = StakeBook::new();
        assert!(book.get(ProposalId::new(9), &VoterId::new("x")).is_zero());
    }
}
