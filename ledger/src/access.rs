//! Admin access guard.

use crate::error::LedgerError;
use quadra_types::VoterId;

/// Holds the single admin identity, fixed at construction.
///
/// The core trusts the host to have authenticated callers already; this
/// guard only answers "is this identity the admin". Admin transfer is out
/// of scope.
#[derive(Clone, Debug)]
pub struct AccessGuard {
    admin: VoterId,
}

impl AccessGuard {
    pub fn new(admin: VoterId) -> Self {
        Self { admin }
    }

    pub fn admin(&self) -> &VoterId {
        &self.admin
    }

    pub fn is_admin(&self, caller: &VoterId) -> bool {
        *caller == self.admin
    }

    /// Fail with [`LedgerError::NotAdmin`] unless `caller` is the admin.
    pub fn require_admin(&self, caller: &VoterId) -> Result<(), LedgerError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(LedgerError::NotAdmin(caller.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_admin_passes() {
        let guard = AccessGuard::new(VoterId::new("root"));
        assert!(guard.require_admin(&VoterId::new("root")).is_ok());
        assert!(matches!(
            guard.require_admin(&VoterId::new("alice")),
            Err(LedgerError::NotAdmin(_))
        ));
    }
}
