//! Tunable ledger parameters.

use crate::credits::Credits;
use serde::{Deserialize, Serialize};

/// Parameters fixed at ledger construction.
///
/// There is no governance process over these values — the host constructs
/// the ledger with whatever policy it wants and the core enforces it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Credits granted to every voter at registration. Default: 100.
    pub initial_credits: Credits,

    /// Minimum proposal duration in seconds. Default: 1 day = 86 400.
    pub min_proposal_duration_secs: u64,

    /// Maximum proposal duration in seconds. Default: 30 days = 2 592 000.
    pub max_proposal_duration_secs: u64,
}

impl LedgerParams {
    /// Production defaults: 100 starting credits, proposals run 1–30 days.
    pub fn standard() -> Self {
        Self {
            initial_credits: Credits::new(100),
            min_proposal_duration_secs: 24 * 3600,      // 1 day
            max_proposal_duration_secs: 30 * 24 * 3600, // 30 days
        }
    }

    /// Whether `duration_secs` is an acceptable proposal duration.
    pub fn duration_in_bounds(&self, duration_secs: u64) -> bool {
        (self.min_proposal_duration_secs..=self.max_proposal_duration_secs)
            .contains(&duration_secs)
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self::standard()
    }
}
