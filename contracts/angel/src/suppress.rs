//! The mass-update suppression flag.
//!
//! Arming the flag tells subsequent administrative calls that every pool
//! was just checkpointed, so they may skip their update-all side effect.
//! The flag self-expires: it is *read* as inactive once `FLAG_LIMIT` has
//! passed since it was armed, without ever being written back.

use soroban_sdk::contracttype;

/// Seconds after arming during which the flag suppresses mass updates.
pub const FLAG_LIMIT: u64 = 3_600;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuppressionFlag {
    pub armed: bool,
    pub set_at: u64,
}

impl SuppressionFlag {
    pub fn inactive() -> Self {
        Self {
            armed: false,
            set_at: 0,
        }
    }

    pub fn armed_at(now: u64) -> Self {
        Self {
            armed: true,
            set_at: now,
        }
    }

    /// Whether the flag currently suppresses mass updates. Evaluated
    /// lazily against `now`; an armed flag older than [`FLAG_LIMIT`]
    /// counts as inactive even though storage still says `armed`.
    pub fn is_live(&self, now: u64) -> bool {
        self.armed && now.saturating_sub(self.set_at) <= FLAG_LIMIT
    }
}
