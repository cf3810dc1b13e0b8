//! Emission-schedule arithmetic.
//!
//! A schedule is a `(grace_per_second, end_time)` pair. Reallocating a
//! schedule merges the grace that was funded but not yet emitted (the
//! "leftover") with any newly supplied amount, spread over the window from
//! now to the new end time. Leftover can exceed 128 bits mid-computation,
//! so everything stays in `U256` until the final narrowing.

use ethnum::U256;

use crate::narrow;

fn leftover(rate: u128, end_time: u64, now: u64) -> U256 {
    if end_time > now {
        U256::from(rate) * U256::from(end_time - now)
    } else {
        U256::ZERO
    }
}

/// Rate resulting from merging the current schedule's leftover with a
/// fresh `amount`, emitted over `now..new_end`.
///
/// Returns `None` when the merged rate does not fit in an unsigned
/// 128-bit integer. Callers must have checked `new_end > now`.
pub fn reallocated_rate(
    old_rate: u128,
    old_end: u64,
    amount: u128,
    now: u64,
    new_end: u64,
) -> Option<u128> {
    if new_end <= now {
        return None;
    }
    let total = leftover(old_rate, old_end, now) + U256::from(amount);
    narrow(total / U256::from(new_end - now))
}

/// Grace that must be supplied on top of the current leftover to honor a
/// directly-set `new_rate` until `new_end`. Zero when the leftover already
/// covers the new obligation; the surplus is not refunded.
///
/// Returns `None` when the shortage cannot be represented in 128 bits.
pub fn funding_shortage(
    new_rate: u128,
    old_rate: u128,
    old_end: u64,
    now: u64,
    new_end: u64,
) -> Option<u128> {
    let required = if new_end > now {
        U256::from(new_rate) * U256::from(new_end - now)
    } else {
        U256::ZERO
    };
    let left = leftover(old_rate, old_end, now);
    if required > left {
        narrow(required - left)
    } else {
        Some(0)
    }
}

/// Seconds of emission to attribute to a pool checkpointed at `last`,
/// observed at `now`, under a schedule ending at `end`. Emission never
/// accrues past the end of the schedule, and a stale or duplicate call
/// (`now <= last`) yields an empty window.
pub fn accrual_window(last: u64, now: u64, end: u64) -> u64 {
    now.min(end).saturating_sub(last)
}

/// Grace emitted to one pool over `elapsed` seconds: the global emission
/// weighted by the pool's share of the total allocation.
pub fn pool_reward(elapsed: u64, rate: u128, alloc_point: u64, total_alloc: u64) -> Option<u128> {
    if total_alloc == 0 || alloc_point == 0 {
        return Some(0);
    }
    let gross = U256::from(elapsed) * U256::from(rate) * U256::from(alloc_point);
    narrow(gross / U256::from(total_alloc))
}
