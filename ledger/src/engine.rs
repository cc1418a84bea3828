//! The voting ledger — orchestrates every operation.
//!
//! One `VotingLedger` is the whole transaction domain: operations are
//! invoked one at a time (`&mut self` enforces the single-writer model) and
//! each one validates every precondition before its first mutation, so a
//! rejected call leaves no observable change. `now()` is read once at the
//! top of a state-changing operation and threaded through its checks.

use crate::access::AccessGuard;
use crate::clock::{Clock, SystemClock};
use crate::error::LedgerError;
use crate::event::{EventLog, LedgerEvent};
use crate::proposal::{Proposal, ProposalStore};
use crate::stake::{Stake, StakeBook};
use crate::voter::{Voter, VoterRegistry};
use quadra_types::{Credits, LedgerParams, ProposalId, VoterId};

/// Quadratic cost of casting `votes` votes in a single call: `votes²`.
///
/// Pure — callers can price a vote before committing to it. Overflow of the
/// square is rejected as invalid input rather than wrapped.
pub fn quote_cost(votes: u64) -> Result<Credits, LedgerError> {
    votes
        .checked_mul(votes)
        .map(Credits::new)
        .ok_or(LedgerError::CostOverflow { votes })
}

/// The authoritative credit-and-proposal ledger.
///
/// Constructed once with the admin identity, the policy parameters, and an
/// injected clock; passed by reference to every operation. Generic over
/// [`Clock`] so tests drive time deterministically.
pub struct VotingLedger<C: Clock = SystemClock> {
    params: LedgerParams,
    guard: AccessGuard,
    clock: C,
    registry: VoterRegistry,
    proposals: ProposalStore,
    stakes: StakeBook,
    events: EventLog,
}

impl VotingLedger<SystemClock> {
    /// A ledger driven by wall-clock time.
    pub fn with_system_clock(admin: VoterId, params: LedgerParams) -> Self {
        Self::new(admin, params, SystemClock)
    }
}

impl<C: Clock> VotingLedger<C> {
    pub fn new(admin: VoterId, params: LedgerParams, clock: C) -> Self {
        Self {
            params,
            guard: AccessGuard::new(admin),
            clock,
            registry: VoterRegistry::new(),
            proposals: ProposalStore::new(),
            stakes: StakeBook::new(),
            events: EventLog::new(),
        }
    }

    // ── Admin operations ─────────────────────────────────────────────────

    /// Register a voter with the initial credit grant. Admin only.
    pub fn register(&mut self, caller: &VoterId, voter: &VoterId) -> Result<(), LedgerError> {
        self.guard.require_admin(caller)?;
        self.registry.register(voter, self.params.initial_credits)?;
        tracing::info!(voter = %voter, credits = %self.params.initial_credits, "voter registered");
        self.events.append(LedgerEvent::VoterRegistered {
            voter: voter.clone(),
            credits: self.params.initial_credits,
        });
        Ok(())
    }

    /// Top up a registered voter's balance. Admin only; no lifetime cap.
    pub fn add_credits(
        &mut self,
        caller: &VoterId,
        voter: &VoterId,
        amount: Credits,
    ) -> Result<(), LedgerError> {
        self.guard.require_admin(caller)?;
        self.registry.add_credits(voter, amount)?;
        tracing::info!(voter = %voter, amount = %amount, "credits granted");
        self.events.append(LedgerEvent::CreditsAdded {
            voter: voter.clone(),
            amount,
        });
        Ok(())
    }

    /// Close a proposal to further votes. Admin only; terminal.
    pub fn end_proposal(&mut self, caller: &VoterId, id: ProposalId) -> Result<(), LedgerError> {
        self.guard.require_admin(caller)?;
        let total_votes = self.proposals.end(id)?.total_votes;
        tracing::info!(id = %id, total_votes, "proposal ended");
        self.events
            .append(LedgerEvent::ProposalEnded { id, total_votes });
        Ok(())
    }

    // ── Voter operations ─────────────────────────────────────────────────

    /// Open a proposal for voting. The caller must be a registered voter.
    pub fn create_proposal(
        &mut self,
        caller: &VoterId,
        title: &str,
        description: &str,
        duration_secs: u64,
    ) -> Result<ProposalId, LedgerError> {
        let now = self.clock.now();
        self.registry.require_registered(caller)?;
        let id = self
            .proposals
            .create(caller, title, description, duration_secs, now, &self.params)?;
        tracing::info!(id = %id, proposer = %caller, duration_secs, "proposal created");
        self.events.append(LedgerEvent::ProposalCreated {
            id,
            proposer: caller.clone(),
            title: title.to_owned(),
        });
        Ok(id)
    }

    /// Cast `votes` votes on a proposal, spending `votes²` credits.
    ///
    /// Costs accumulate additively per call: casting 5 then 3 votes costs
    /// 25 + 9, not 8². Returns the credits spent by this call.
    pub fn cast_vote(
        &mut self,
        caller: &VoterId,
        id: ProposalId,
        votes: u64,
    ) -> Result<Credits, LedgerError> {
        let now = self.clock.now();

        // Validation phase — no mutation below until every check has passed.
        let voter = self.registry.require_registered(caller)?;
        let proposal = self.proposals.get(id)?;
        if !proposal.is_open(now) {
            return Err(if proposal.active {
                LedgerError::DeadlinePassed(id)
            } else {
                LedgerError::ProposalClosed(id)
            });
        }
        if votes == 0 {
            return Err(LedgerError::ZeroVotes);
        }
        let cost = quote_cost(votes)?;
        if voter.available_credits < cost {
            return Err(LedgerError::InsufficientCredits {
                need: cost,
                have: voter.available_credits,
            });
        }

        // Commit phase — the lookups below were validated above and cannot
        // fail while we hold `&mut self`.
        let first_on_proposal = self.stakes.get(id, caller).is_zero();
        self.registry.spend(caller, cost, first_on_proposal)?;
        self.stakes.accumulate(id, caller, votes, cost);
        let proposal = self.proposals.get_mut(id)?;
        proposal.total_votes = proposal.total_votes.saturating_add(votes);
        proposal.total_credits_used = proposal.total_credits_used.saturating_add(cost);

        tracing::debug!(proposal = %id, voter = %caller, votes, cost = %cost, "vote cast");
        self.events.append(LedgerEvent::VoteCast {
            proposal: id,
            voter: caller.clone(),
            votes,
            credits_used: cost,
        });
        Ok(cost)
    }

    // ── Queries (read-only) ──────────────────────────────────────────────

    pub fn proposal_details(&self, id: ProposalId) -> Result<&Proposal, LedgerError> {
        self.proposals.get(id)
    }

    /// A voter's record; unregistered identities yield a zero-valued record.
    pub fn voter_info(&self, voter: &VoterId) -> Voter {
        self.registry.get(voter)
    }

    /// Votes and credits a voter has put on a proposal. Fails only for an
    /// unknown proposal id; a voter who never spent on it holds a zero stake.
    pub fn voter_stake(&self, id: ProposalId, voter: &VoterId) -> Result<Stake, LedgerError> {
        self.proposals.get(id)?;
        Ok(self.stakes.get(id, voter))
    }

    pub fn is_admin(&self, caller: &VoterId) -> bool {
        self.guard.is_admin(caller)
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    /// The injected clock's current time.
    pub fn now(&self) -> quadra_types::Timestamp {
        self.clock.now()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    /// The injected clock itself — handy for tests driving a manual clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub(crate) fn registry(&self) -> &VoterRegistry {
        &self.registry
    }

    pub(crate) fn proposals(&self) -> &ProposalStore {
        &self.proposals
    }

    pub(crate) fn stakes(&self) -> &StakeBook {
        &self.stakes
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> (&mut VoterRegistry, &mut ProposalStore, &mut StakeBook) {
        (&mut self.registry, &mut self.proposals, &mut self.stakes)
    }
}
