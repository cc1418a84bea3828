//! Voter records and the registry that owns them.

use crate::error::LedgerError;
use quadra_types::{Credits, VoterId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The credit account of a single voter.
///
/// `total_credits` is the cumulative amount ever granted; `available_credits`
/// is what is left to spend. The registry maintains
/// `available_credits ≤ total_credits` at all times.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub is_registered: bool,
    pub total_credits: Credits,
    pub available_credits: Credits,
    /// Count of distinct proposals this voter has spent credits on.
    pub participated_proposals: u64,
}

/// Owns all voter records. Registration and top-ups happen here; admin
/// authorization is the orchestrating ledger's job.
#[derive(Clone, Debug, Default)]
pub struct VoterRegistry {
    voters: HashMap<VoterId, Voter>,
}

impl VoterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a voter record with the initial credit grant.
    ///
    /// Fails if the identity is malformed or already registered.
    pub fn register(&mut self, voter: &VoterId, initial: Credits) -> Result<(), LedgerError> {
        if !voter.is_valid() {
            return Err(LedgerError::InvalidVoterId);
        }
        if self.voters.contains_key(voter) {
            return Err(LedgerError::AlreadyRegistered(voter.clone()));
        }
        self.voters.insert(
            voter.clone(),
            Voter {
                is_registered: true,
                total_credits: initial,
                available_credits: initial,
                participated_proposals: 0,
            },
        );
        Ok(())
    }

    /// Grant additional credits to a registered voter.
    ///
    /// Raises both `total_credits` and `available_credits`; there is no cap
    /// on lifetime grants.
    pub fn add_credits(&mut self, voter: &VoterId, amount: Credits) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        let record = self
            .voters
            .get_mut(voter)
            .ok_or_else(|| LedgerError::NotRegistered(voter.clone()))?;
        let total = record
            .total_credits
            .checked_add(amount)
            .ok_or(LedgerError::CreditOverflow)?;
        let available = record
            .available_credits
            .checked_add(amount)
            .ok_or(LedgerError::CreditOverflow)?;
        record.total_credits = total;
        record.available_credits = available;
        Ok(())
    }

    /// Look up a voter. Unregistered identities yield a zero-valued record
    /// with `is_registered == false` — a query, not an error.
    pub fn get(&self, voter: &VoterId) -> Voter {
        self.voters.get(voter).cloned().unwrap_or_default()
    }

    pub fn is_registered(&self, voter: &VoterId) -> bool {
        self.voters.contains_key(voter)
    }

    /// Fail with [`LedgerError::NotRegistered`] unless the voter exists.
    pub fn require_registered(&self, voter: &VoterId) -> Result<&Voter, LedgerError> {
        self.voters
            .get(voter)
            .ok_or_else(|| LedgerError::NotRegistered(voter.clone()))
    }

    /// Debit a vote's cost from the voter's available balance.
    ///
    /// `first_proposal` marks the voter's first spend on the proposal in
    /// question and bumps `participated_proposals`.
    pub(crate) fn spend(
        &mut self,
        voter: &VoterId,
        cost: Credits,
        first_proposal: bool,
    ) -> Result<(), LedgerError> {
        let record = self
            .voters
            .get_mut(voter)
            .ok_or_else(|| LedgerError::NotRegistered(voter.clone()))?;
        record.available_credits = record.available_credits.checked_sub(cost).ok_or(
            LedgerError::InsufficientCredits {
                need: cost,
                have: record.available_credits,
            },
        )?;
        if first_proposal {
            record.participated_proposals += 1;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VoterId, &Voter)> {
        self.voters.iter()
    }

    pub(crate) fn insert_restored(&mut self, voter: VoterId, record: Voter) {
        self.voters.insert(voter, record);
    }
}
