#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the ledger is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub grace_token: Address,
    pub authority: Address,
    pub timestamp: u64,
}

/// Fired when a new pool is registered.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pid: u32,
    pub stake_asset: Address,
    pub alloc_point: u64,
    pub caller: Address,
    pub rewarder: Option<Address>,
    pub timestamp: u64,
}

/// Fired when a pool's weight or rewarder changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSetEvent {
    pub pid: u32,
    pub alloc_point: u64,
    pub rewarder: Option<Address>,
    pub overwrite: bool,
    pub timestamp: u64,
}

/// Fired whenever a checkpoint advances a pool's clock.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolUpdatedEvent {
    pub pid: u32,
    pub last_reward_time: u64,
    pub stake_supply: i128,
    pub acc_grace_per_share: u128,
}

/// Fired when the emission schedule is reallocated.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateChangedEvent {
    pub grace_per_second: u128,
    pub end_time: u64,
    pub timestamp: u64,
}

/// Fired when stake is credited to a position.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub pid: u32,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when stake leaves a position.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub pid: u32,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when accrued grace is paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestEvent {
    pub pid: u32,
    pub from: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when a position abandons its rewards to recover its stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub pid: u32,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired after a completed flash loan.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashLoanEvent {
    pub receiver: Address,
    pub token: Address,
    pub amount: i128,
    pub fee: i128,
    pub timestamp: u64,
}

/// Fired when the owner rescues stray tokens.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RescueEvent {
    pub token: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, grace_token: Address, authority: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            grace_token,
            authority,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pid: u32,
    stake_asset: Address,
    alloc_point: u64,
    caller: Address,
    rewarder: Option<Address>,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pid),
        PoolAddedEvent {
            pid,
            stake_asset,
            alloc_point,
            caller,
            rewarder,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_set(
    env: &Env,
    pid: u32,
    alloc_point: u64,
    rewarder: Option<Address>,
    overwrite: bool,
) {
    env.events().publish(
        (symbol_short!("POOL_SET"), pid),
        PoolSetEvent {
            pid,
            alloc_point,
            rewarder,
            overwrite,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_updated(
    env: &Env,
    pid: u32,
    last_reward_time: u64,
    stake_supply: i128,
    acc_grace_per_share: u128,
) {
    env.events().publish(
        (symbol_short!("POOL_UPD"), pid),
        PoolUpdatedEvent {
            pid,
            last_reward_time,
            stake_supply,
            acc_grace_per_share,
        },
    );
}

pub fn publish_rate_changed(env: &Env, grace_per_second: u128, end_time: u64) {
    env.events().publish(
        (symbol_short!("RATE"),),
        RateChangedEvent {
            grace_per_second,
            end_time,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposit(env: &Env, pid: u32, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), to.clone()),
        DepositEvent {
            pid,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdraw(env: &Env, pid: u32, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), to.clone()),
        WithdrawEvent {
            pid,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_harvest(env: &Env, pid: u32, from: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("HARVEST"), from.clone()),
        HarvestEvent {
            pid,
            from,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdraw(env: &Env, pid: u32, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("EMERGENCY"), to.clone()),
        EmergencyWithdrawEvent {
            pid,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_flash_loan(env: &Env, receiver: Address, token: Address, amount: i128, fee: i128) {
    env.events().publish(
        (symbol_short!("FLASH"), receiver.clone()),
        FlashLoanEvent {
            receiver,
            token,
            amount,
            fee,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rescue(env: &Env, token: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RESCUE"), token.clone()),
        RescueEvent {
            token,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
