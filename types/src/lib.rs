//! Fundamental types for the Quadra ledger.
//!
//! This crate defines the types shared across the workspace: voter
//! identities, credit amounts, proposal ids, timestamps, and the tunable
//! ledger parameters.

pub mod credits;
pub mod identity;
pub mod params;
pub mod proposal_id;
pub mod time;

pub use credits::Credits;
pub use identity::VoterId;
pub use params::LedgerParams;
pub use proposal_id::ProposalId;
pub use time::Timestamp;
