//! Global emission schedule.

use soroban_sdk::contracttype;

/// The ledger-wide emission schedule: grace emitted per second until
/// `end_time`, shared by every pool in proportion to its allocation.
///
/// The rate is an unsigned 128-bit quantity; reallocation rejects any
/// merged rate that would not fit. `rate * (end_time - now)` bounds the
/// ledger's remaining obligation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schedule {
    pub grace_per_second: u128,
    pub end_time: u64,
}

impl Schedule {
    /// The empty schedule a fresh ledger starts with: nothing is emitted
    /// until the first reallocation funds a rate.
    pub fn idle() -> Self {
        Self {
            grace_per_second: 0,
            end_time: 0,
        }
    }
}
