//! Quadratic-cost voting credit ledger.
//!
//! Voters hold credit balances; casting *n* votes on a proposal in one call
//! consumes *n²* credits. The ledger is a single authoritative store: one
//! admin identity registers voters and grants credits, registered voters
//! open proposals and spend credits on them, and every state-changing
//! operation either applies in full or leaves no trace.
//!
//! Key invariants:
//! - `available_credits ≤ total_credits` for every voter, always.
//! - Credits are only created by registration/top-up and only destroyed by
//!   vote spending — no refunds, no transfers.
//! - Cost is quadratic *per call*: two calls of `n` votes cost `2n²`, not
//!   `(2n)²`. This is deliberate and load-bearing for callers.
//! - A proposal past its deadline rejects votes even while its stored
//!   `active` flag is still `true`; expiry is observed lazily at vote time.

pub mod access;
pub mod clock;
pub mod engine;
pub mod error;
pub mod event;
pub mod proposal;
pub mod snapshot;
pub mod stake;
pub mod voter;

pub use access::AccessGuard;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{quote_cost, VotingLedger};
pub use error::LedgerError;
pub use event::{EventLog, LedgerEvent};
pub use proposal::{Proposal, ProposalStore};
pub use snapshot::{LedgerSnapshot, ProposalEntry, VoterEntry};
pub use stake::{Stake, StakeBook};
pub use voter::{Voter, VoterRegistry};
