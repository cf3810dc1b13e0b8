//! Per-pool checkpoint state and reward projection.

use common::{fixed_point::GracePerShare, schedule_math};
use soroban_sdk::{contractclient, contracttype, Address, Env};

use crate::schedule::Schedule;

/// Hook contract notified after every position mutation in its pool,
/// receiving the grace paid out (zero outside harvest) and the position's
/// resulting stake.
#[contractclient(name = "RewarderClient")]
pub trait Rewarder {
    fn on_grace_reward(
        env: Env,
        pid: u32,
        user: Address,
        recipient: Address,
        grace_amount: i128,
        new_stake: i128,
    );
}

/// One pool per registered stake asset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    /// Token users stake into this pool.
    pub stake_asset: Address,
    /// The single external caller (staking wrapper) allowed to move
    /// positions in this pool.
    pub caller: Address,
    /// Optional per-pool reward hook.
    pub rewarder: Option<Address>,
    /// Share weight relative to the ledger's total allocation.
    pub alloc_point: u64,
    /// Timestamp of the last checkpoint.
    pub last_reward_time: u64,
    /// Scaled accumulator, raw value of [`GracePerShare`].
    pub acc_grace_per_share: u128,
    /// Stake-asset balance held by the ledger for this pool. Tracked
    /// explicitly so a pool staking the grace token itself cannot count
    /// schedule funding as stake.
    pub stake_supply: i128,
}

/// A depositor's stake and reward-debt snapshot in one pool.
///
/// `reward_debt` is signed: withdrawing before harvesting subtracts more
/// entitlement than was snapshotted at deposit, driving it negative while
/// the earned grace stays claimable.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserPosition {
    pub amount: i128,
    pub reward_debt: i128,
}

impl UserPosition {
    pub fn empty() -> Self {
        Self {
            amount: 0,
            reward_debt: 0,
        }
    }
}

/// The accumulator value a checkpoint at `now` would produce, without
/// mutating anything. `None` on arithmetic overflow.
pub fn projected_acc(pool: &Pool, schedule: &Schedule, total_alloc: u64, now: u64) -> Option<u128> {
    let elapsed = schedule_math::accrual_window(pool.last_reward_time, now, schedule.end_time);
    if elapsed == 0 || pool.alloc_point == 0 || pool.stake_supply <= 0 {
        return Some(pool.acc_grace_per_share);
    }
    let reward = schedule_math::pool_reward(
        elapsed,
        schedule.grace_per_second,
        pool.alloc_point,
        total_alloc,
    )?;
    GracePerShare::from_raw(pool.acc_grace_per_share)
        .accrue(reward, pool.stake_supply as u128)
        .map(GracePerShare::raw)
}

/// Grace a position is entitled to at accumulator `acc_raw`, i.e.
/// `amount * acc / SCALE`, as a signed token amount.
pub fn entitlement(acc_raw: u128, amount: i128) -> Option<i128> {
    if amount < 0 {
        return None;
    }
    let entitled = GracePerShare::from_raw(acc_raw).entitlement(amount as u128)?;
    i128::try_from(entitled).ok()
}

/// Claimable grace for `position` at accumulator `acc_raw`, clamped at
/// zero.
pub fn pending_amount(position: &UserPosition, acc_raw: u128) -> Option<i128> {
    let entitled = entitlement(acc_raw, position.amount)?;
    entitled.checked_sub(position.reward_debt).map(|p| p.max(0))
}
