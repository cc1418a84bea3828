//! Ledger snapshots — the canonical persisted state layout.
//!
//! A snapshot captures the two top-level collections (voters, proposals),
//! the nested per-voter spend maps on each proposal, and the next-id
//! counter. This layout and these field names are the contract any
//! persistence or query layer builds on. The snapshot hash is computed
//! deterministically from the captured state so a stored snapshot can be
//! integrity-checked before restore.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::engine::VotingLedger;
use crate::proposal::Proposal;
use crate::voter::Voter;
use quadra_types::{Credits, LedgerParams, ProposalId, Timestamp, VoterId};

/// One registered voter as captured in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterEntry {
    pub voter: VoterId,
    pub total_credits: Credits,
    pub available_credits: Credits,
    pub participated_proposals: u64,
}

/// One proposal as captured in a snapshot, with its per-voter spend maps
/// materialized inline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalEntry {
    pub id: ProposalId,
    pub title: String,
    pub description: String,
    pub proposer: VoterId,
    pub deadline: Timestamp,
    pub active: bool,
    pub total_votes: u64,
    pub total_credits_used: Credits,
    /// Credits each voter has spent on this proposal.
    pub voter_credits: BTreeMap<VoterId, Credits>,
    /// Votes each voter has cast on this proposal.
    pub voter_votes: BTreeMap<VoterId, u64>,
}

/// A point-in-time capture of the entire ledger state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 of the captured state (excludes `created_at`).
    pub hash: [u8; 32],
    /// When the snapshot was taken (injected clock, not hashed).
    pub created_at: Timestamp,
    /// Voters sorted by identity.
    pub voters: Vec<VoterEntry>,
    /// Proposals sorted by id.
    pub proposals: Vec<ProposalEntry>,
    /// The id the next created proposal will receive.
    pub next_proposal_id: u64,
    /// Snapshot format version for compatibility.
    pub version: u32,
}

impl LedgerSnapshot {
    /// Compute the Blake2b-256 hash of the captured state deterministically.
    /// Entries are already sorted; nested maps iterate in key order.
    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        for entry in &self.voters {
            hasher.update(entry.voter.as_str().as_bytes());
            hasher.update(entry.total_credits.raw().to_le_bytes());
            hasher.update(entry.available_credits.raw().to_le_bytes());
            hasher.update(entry.participated_proposals.to_le_bytes());
        }
        for entry in &self.proposals {
            hasher.update(entry.id.raw().to_le_bytes());
            hasher.update(entry.title.as_bytes());
            hasher.update(entry.description.as_bytes());
            hasher.update(entry.proposer.as_str().as_bytes());
            hasher.update(entry.deadline.as_secs().to_le_bytes());
            hasher.update([entry.active as u8]);
            hasher.update(entry.total_votes.to_le_bytes());
            hasher.update(entry.total_credits_used.raw().to_le_bytes());
            for (voter, credits) in &entry.voter_credits {
                hasher.update(voter.as_str().as_bytes());
                hasher.update(credits.raw().to_le_bytes());
            }
            for (voter, votes) in &entry.voter_votes {
                hasher.update(voter.as_str().as_bytes());
                hasher.update(votes.to_le_bytes());
            }
        }
        hasher.update(self.next_proposal_id.to_le_bytes());

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches the captured data.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("snapshot serialization should not fail")
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        bincode::deserialize(bytes).map_err(|e| e.to_string())
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }
}

impl<C: Clock> VotingLedger<C> {
    /// Capture the current state as a snapshot, stamped with the injected
    /// clock and integrity-hashed.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut voters: Vec<VoterEntry> = self
            .registry()
            .iter()
            .map(|(id, record)| VoterEntry {
                voter: id.clone(),
                total_credits: record.total_credits,
                available_credits: record.available_credits,
                participated_proposals: record.participated_proposals,
            })
            .collect();
        voters.sort_by(|a, b| a.voter.cmp(&b.voter));

        let mut proposals: Vec<ProposalEntry> = self
            .proposals()
            .iter()
            .map(|proposal| {
                let mut voter_credits = BTreeMap::new();
                let mut voter_votes = BTreeMap::new();
                for (voter, stake) in self.stakes().by_proposal(proposal.id) {
                    voter_credits.insert(voter.clone(), stake.credits);
                    voter_votes.insert(voter.clone(), stake.votes);
                }
                ProposalEntry {
                    id: proposal.id,
                    title: proposal.title.clone(),
                    description: proposal.description.clone(),
                    proposer: proposal.proposer.clone(),
                    deadline: proposal.deadline,
                    active: proposal.active,
                    total_votes: proposal.total_votes,
                    total_credits_used: proposal.total_credits_used,
                    voter_credits,
                    voter_votes,
                }
            })
            .collect();
        proposals.sort_by_key(|p| p.id);

        let mut snapshot = LedgerSnapshot {
            hash: [0u8; 32],
            created_at: self.now(),
            voters,
            proposals,
            next_proposal_id: self.proposals().next_id(),
            version: 1,
        };
        snapshot.hash = snapshot.compute_hash();
        snapshot
    }

    /// Rebuild a ledger from a snapshot. Admin identity and parameters are
    /// host configuration, not persisted state, so they are supplied anew;
    /// the event log starts empty (observers keep their own history).
    pub fn from_snapshot(
        admin: VoterId,
        params: LedgerParams,
        clock: C,
        snapshot: &LedgerSnapshot,
    ) -> Self {
        let mut ledger = Self::new(admin, params, clock);
        let (registry, proposals, stakes) = ledger.parts_mut();
        proposals.set_next_id(snapshot.next_proposal_id);
        for entry in &snapshot.voters {
            registry.insert_restored(
                entry.voter.clone(),
                Voter {
                    is_registered: true,
                    total_credits: entry.total_credits,
                    available_credits: entry.available_credits,
                    participated_proposals: entry.participated_proposals,
                },
            );
        }
        for entry in &snapshot.proposals {
            proposals.insert_restored(
                Proposal {
                    id: entry.id,
                    title: entry.title.clone(),
                    description: entry.description.clone(),
                    proposer: entry.proposer.clone(),
                    deadline: entry.deadline,
                    active: entry.active,
                    total_votes: entry.total_votes,
                    total_credits_used: entry.total_credits_used,
                },
            );
            for (voter, credits) in &entry.voter_credits {
                let votes = entry.voter_votes.get(voter).copied().unwrap_or(0);
                stakes.accumulate(entry.id, voter, votes, *credits);
            }
        }
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const DAY: u64 = 24 * 3600;

    fn populated_ledger() -> VotingLedger<ManualClock> {
        let admin = VoterId::new("admin");
        let mut ledger =
            VotingLedger::new(admin.clone(), LedgerParams::standard(), ManualClock::new(1_000));
        ledger.register(&admin, &VoterId::new("alice")).unwrap();
        ledger.register(&admin, &VoterId::new("bob")).unwrap();
        let id = ledger
            .create_proposal(&VoterId::new("alice"), "Park", "Trees", 7 * DAY)
            .unwrap();
        ledger.cast_vote(&VoterId::new("alice"), id, 5).unwrap();
        ledger.cast_vote(&VoterId::new("bob"), id, 3).unwrap();
        ledger
    }

    #[test]
    fn capture_and_verify() {
        let snapshot = populated_ledger().snapshot();
        assert!(snapshot.verify());
        assert_eq!(snapshot.voter_count(), 2);
        assert_eq!(snapshot.proposal_count(), 1);
        assert_eq!(snapshot.next_proposal_id, 1);
        assert_eq!(snapshot.version, 1);
    }

    #[test]
    fn tampered_snapshot_fails_verify() {
        let mut snapshot = populated_ledger().snapshot();
        assert!(snapshot.verify());
        snapshot.proposals[0].total_votes = 999;
        assert!(!snapshot.verify());
    }

    #[test]
    fn nested_maps_expose_the_persisted_layout() {
        let snapshot = populated_ledger().snapshot();
        let entry = &snapshot.proposals[0];
        assert_eq!(
            entry.voter_credits.get(&VoterId::new("alice")),
            Some(&Credits::new(25))
        );
        assert_eq!(entry.voter_votes.get(&VoterId::new("bob")), Some(&3));
        assert_eq!(entry.total_credits_used, Credits::new(34));
        assert_eq!(entry.total_votes, 8);
    }

    #[test]
    fn hash_ignores_created_at() {
        let ledger = populated_ledger();
        let a = ledger.snapshot();
        ledger.clock().advance(500);
        let b = ledger.snapshot();
        assert_ne!(a.created_at, b.created_at);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn serialize_roundtrip() {
        let snapshot = populated_ledger().snapshot();
        let bytes = snapshot.to_bytes();
        let restored = LedgerSnapshot::from_bytes(&bytes).expect("deserialization failed");
        assert_eq!(restored.hash, snapshot.hash);
        assert_eq!(restored.voters, snapshot.voters);
        assert_eq!(restored.proposals, snapshot.proposals);
        assert!(restored.verify());
    }

    #[test]
    fn restore_resumes_exactly_where_capture_left_off() {
        let original = populated_ledger();
        let snapshot = original.snapshot();

        let mut restored = VotingLedger::from_snapshot(
            VoterId::new("admin"),
            LedgerParams::standard(),
            ManualClock::new(1_000),
            &snapshot,
        );

        let alice = VoterId::new("alice");
        let info = restored.voter_info(&alice);
        assert_eq!(info.available_credits, Credits::new(75));
        assert_eq!(info.participated_proposals, 1);

        let id = ProposalId::new(0);
        assert_eq!(restored.voter_stake(id, &alice).unwrap().votes, 5);

        // voting continues with accumulated per-call costs
        restored.cast_vote(&alice, id, 3).unwrap();
        assert_eq!(
            restored.voter_info(&alice).available_credits,
            Credits::new(66)
        );
        assert_eq!(
            restored.voter_stake(id, &alice).unwrap().credits,
            Credits::new(34)
        );

        // id allocation resumes after the captured counter
        let next = restored
            .create_proposal(&alice, "Next", "More", DAY)
            .unwrap();
        assert_eq!(next, ProposalId::new(1));
    }

    #[test]
    fn empty_ledger_snapshot() {
        let ledger = VotingLedger::new(
            VoterId::new("admin"),
            LedgerParams::standard(),
            ManualClock::new(0),
        );
        let snapshot = ledger.snapshot();
        assert!(snapshot.verify());
        assert_eq!(snapshot.voter_count(), 0);
        assert_eq!(snapshot.next_proposal_id, 0);
    }
}
