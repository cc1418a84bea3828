use quadra_types::{Credits, ProposalId, VoterId};
use thiserror::Error;

/// Errors surfaced by ledger operations.
///
/// Every precondition is checked before any mutation; when one of these is
/// returned the ledger state is exactly what it was before the call.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("caller {0} is not the admin")]
    NotAdmin(VoterId),

    #[error("voter {0} is not registered")]
    NotRegistered(VoterId),

    #[error("voter {0} is already registered")]
    AlreadyRegistered(VoterId),

    #[error("voter identity must be non-empty")]
    InvalidVoterId,

    #[error("proposal title must be non-empty")]
    EmptyTitle,

    #[error("proposal description must be non-empty")]
    EmptyDescription,

    #[error("proposal duration {secs}s outside allowed range [{min}s, {max}s]")]
    DurationOutOfRange { secs: u64, min: u64, max: u64 },

    #[error("vote count must be greater than zero")]
    ZeroVotes,

    #[error("credit amount must be greater than zero")]
    ZeroAmount,

    #[error("quadratic cost of {votes} votes overflows")]
    CostOverflow { votes: u64 },

    #[error("credit balance overflow")]
    CreditOverflow,

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal {0} has been closed")]
    ProposalClosed(ProposalId),

    #[error("voting deadline has passed for proposal {0}")]
    DeadlinePassed(ProposalId),

    #[error("insufficient credits: need {need}, have {have}")]
    InsufficientCredits { need: Credits, have: Credits },
}
