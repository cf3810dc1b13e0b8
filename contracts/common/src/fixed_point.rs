//! Scaled per-share reward accumulator.
//!
//! Rewards are tracked as "grace per unit of stake", scaled by [`SCALE`] so
//! that integer division keeps twelve decimal places of precision. The
//! accumulator only ever grows; a depositor's entitlement is the product of
//! their stake and the accumulator, minus the debt snapshotted at their
//! last interaction.

use ethnum::U256;

use crate::narrow;

/// Fixed-point scale for the per-share accumulator (1e12).
pub const SCALE: u128 = 1_000_000_000_000;

/// Accumulated grace per unit of stake, scaled by [`SCALE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GracePerShare(u128);

impl GracePerShare {
    pub const ZERO: Self = Self(0);

    pub fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u128 {
        self.0
    }

    /// Fold `reward` distributed over `supply` units of stake into the
    /// accumulator. With `supply == 0` there is nobody to attribute the
    /// reward to and the accumulator is unchanged.
    pub fn accrue(self, reward: u128, supply: u128) -> Option<Self> {
        if supply == 0 {
            return Some(self);
        }
        let delta = U256::from(reward) * U256::from(SCALE) / U256::from(supply);
        let delta = narrow(delta)?;
        self.0.checked_add(delta).map(Self)
    }

    /// Total grace a position of `amount` units has been attributed since
    /// the accumulator was zero.
    pub fn entitlement(self, amount: u128) -> Option<u128> {
        narrow(U256::from(amount) * U256::from(self.0) / U256::from(SCALE))
    }
}
