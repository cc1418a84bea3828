//! Events appended by state-changing operations.

use quadra_types::{Credits, ProposalId, VoterId};
use serde::{Deserialize, Serialize};

/// One entry in the ledger's append-only event record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A voter was registered with their initial credit grant.
    VoterRegistered { voter: VoterId, credits: Credits },
    /// An admin topped up a voter's balance.
    CreditsAdded { voter: VoterId, amount: Credits },
    /// A proposal was opened for voting.
    ProposalCreated {
        id: ProposalId,
        proposer: VoterId,
        title: String,
    },
    /// A proposal was explicitly closed by the admin.
    ProposalEnded { id: ProposalId, total_votes: u64 },
    /// A voter spent credits on a proposal.
    VoteCast {
        proposal: ProposalId,
        voter: VoterId,
        votes: u64,
        credits_used: Credits,
    },
}

/// Append-only record of state-changing operations.
///
/// Holds the ordered history and fans each appended event out to
/// subscribed listeners synchronously, on the appending thread — keep
/// handlers fast. Observers can either replay via [`EventLog::iter`] or
/// subscribe for live notification.
pub struct EventLog {
    events: Vec<LedgerEvent>,
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub(crate) fn append(&mut self, event: LedgerEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.events.iter()
    }

    pub fn last(&self) -> Option<&LedgerEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
