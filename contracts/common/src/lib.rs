//! Pure arithmetic shared by the Grace Ledger contracts.
//!
//! This crate is intentionally free of `soroban_sdk` so the reward and fee
//! math can be reused from off-chain tooling or simulations. Every
//! computation whose intermediate values can exceed 128 bits runs through
//! `ethnum::U256` and is checked back into the native width, so callers
//! receive `Option`/`None` instead of a wrapped or saturated result.

#![no_std]

pub mod bps;
pub mod fixed_point;
pub mod schedule_math;

pub use bps::*;
pub use fixed_point::*;
pub use schedule_math::*;

use ethnum::U256;

/// Narrow a 256-bit value back to `u128`, or `None` if it does not fit.
pub(crate) fn narrow(value: U256) -> Option<u128> {
    if value <= U256::from(u128::MAX) {
        Some(value.as_u128())
    } else {
        None
    }
}
