//! Basis-point fee arithmetic.

use ethnum::U256;

use crate::narrow;

/// Fee rates are expressed out of 10000 (100%).
pub const MAX_BPS: u32 = 10_000;

/// A fee rate is acceptable only up to 100%.
pub fn is_valid_rate(rate_bps: u32) -> bool {
    rate_bps <= MAX_BPS
}

/// Fee skimmed from a flash loan of `amount` at `rate_bps`, rounded down.
pub fn flash_fee(amount: u128, rate_bps: u32) -> Option<u128> {
    narrow(U256::from(amount) * U256::from(rate_bps) / U256::from(MAX_BPS))
}
