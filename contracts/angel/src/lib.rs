#![no_std]

//! The Angel ledger: a multi-pool, time-weighted grace-emission ledger
//! with a fee-skimming flash-loan gate.
//!
//! One ledger distributes a single grace token across many pools, each
//! holding a share weight (`alloc_point`) of the global emission rate.
//! Per-pool checkpoints keep the bookkeeping O(1) per interaction: a
//! pool's `acc_grace_per_share` accumulator is advanced lazily whenever
//! the pool is touched, and every position carries a reward-debt snapshot
//! against it. Tokens held by the ledger (schedule funding and staked
//! assets alike) are flash-lendable; the skimmed fee is forwarded to the
//! authority contract.

pub mod events;
pub mod flash;
pub mod pool;
pub mod schedule;
pub mod suppress;

use common::{bps, schedule_math};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, Bytes, Env, Symbol, Vec,
};

use flash::{AuthorityClient, FlashBorrowerClient};
use pool::{Pool, RewarderClient, UserPosition};
use schedule::Schedule;
use suppress::SuppressionFlag;

// ── Storage key constants ────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const SCHEDULE: Symbol = symbol_short!("SCHEDULE");
const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");
const TOTAL_ALLOC: Symbol = symbol_short!("TOT_ALLOC");
const SUPPRESS: Symbol = symbol_short!("SUPPRESS");

// Persistent storage uses tuple keys: (prefix, pid) and (prefix, pid, user)
const POOL: Symbol = symbol_short!("POOL");
const ASSET: Symbol = symbol_short!("ASSET");
const USER: Symbol = symbol_short!("USER");

// ── Contract errors ──────────────────────────────────────────────────────────

/// Error codes, grouped by range: lifecycle 1-9, auth 10-19, not-found
/// 20-29, validation 30-39, arithmetic 40-49, funds/guard 50-59.
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    /// Administrative call from an address that is not the ledger owner.
    Unauthorized = 10,
    /// Position mutation from an address that is not the pool's
    /// registered caller.
    NotFromPoolCaller = 11,
    PoolNotFound = 20,
    ZeroGraceAmount = 30,
    EndTimeNotFuture = 31,
    /// The stake asset already backs another pool.
    StakeAssetAlreadyAdded = 32,
    /// Flash loan requested in a token the ledger does not hold for
    /// lending.
    WrongToken = 33,
    ZeroLoanAmount = 34,
    ZeroStakeAmount = 35,
    InsufficientStake = 36,
    /// A reallocated emission rate does not fit in an unsigned 128-bit
    /// integer.
    GracePerSecondOverflow = 40,
    MathOverflow = 41,
    /// The flash-loan callback returned without restoring principal plus
    /// fee.
    RepaymentShortfall = 50,
    /// Loan-affecting call attempted while a flash loan is in flight.
    ReentrantCall = 51,
}

// ── Types ────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Address allowed to administer pools and the emission schedule.
    pub owner: Address,
    /// The reward token this ledger emits.
    pub grace_token: Address,
    /// Fee registry and collector for the flash-loan gate.
    pub authority: Address,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct AngelContract;

#[contractimpl]
impl AngelContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger.
    ///
    /// * `owner`       – administrative gate for pools and the schedule.
    /// * `grace_token` – SAC address of the reward token.
    /// * `authority`   – fee registry / collector consulted by the
    ///                   flash-loan gate.
    pub fn initialize(
        env: Env,
        owner: Address,
        grace_token: Address,
        authority: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }

        let cfg = Config {
            owner: owner.clone(),
            grace_token: grace_token.clone(),
            authority: authority.clone(),
        };
        env.storage().instance().set(&CONFIG, &cfg);
        env.storage().instance().set(&SCHEDULE, &Schedule::idle());
        // POOL_COUNT and TOTAL_ALLOC start at zero; unwrap_or(0) handles
        // absent keys, so no explicit init needed.

        events::publish_initialized(&env, owner, grace_token, authority);

        Ok(())
    }

    // ── Pool administration ─────────────────────────────────────────────────

    /// Register a new pool for `stake_asset` with share weight
    /// `alloc_point`. `pool_caller` is the one external caller (the
    /// staking wrapper) allowed to move positions in the pool.
    ///
    /// Unless the suppression flag is live, every non-zero-weight pool is
    /// checkpointed first so the weight change cannot reattribute past
    /// emission.
    pub fn add_pool(
        env: Env,
        caller: Address,
        alloc_point: u64,
        stake_asset: Address,
        rewarder: Option<Address>,
        pool_caller: Address,
    ) -> Result<u32, ContractError> {
        Self::require_owner(&env, &caller)?;

        if env
            .storage()
            .persistent()
            .has(&(ASSET, stake_asset.clone()))
        {
            return Err(ContractError::StakeAssetAlreadyAdded);
        }

        let now = env.ledger().timestamp();
        Self::admin_checkpoint(&env, now)?;

        let total: u64 = env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0);
        let new_total = total
            .checked_add(alloc_point)
            .ok_or(ContractError::MathOverflow)?;
        env.storage().instance().set(&TOTAL_ALLOC, &new_total);

        let pid: u32 = env.storage().instance().get(&POOL_COUNT).unwrap_or(0);
        env.storage().instance().set(&POOL_COUNT, &(pid + 1));

        let pool = Pool {
            stake_asset: stake_asset.clone(),
            caller: pool_caller.clone(),
            rewarder: rewarder.clone(),
            alloc_point,
            last_reward_time: now,
            acc_grace_per_share: 0,
            stake_supply: 0,
        };
        Self::save_pool(&env, pid, &pool);
        env.storage().persistent().set(&(ASSET, stake_asset.clone()), &pid);

        events::publish_pool_added(&env, pid, stake_asset, alloc_point, pool_caller, rewarder);

        Ok(pid)
    }

    /// Change a pool's share weight, and its rewarder hook when
    /// `overwrite` is true.
    ///
    /// The targeted pool is always checkpointed before its weight
    /// changes; the other non-zero pools are checkpointed too unless the
    /// suppression flag is live.
    pub fn set_pool(
        env: Env,
        caller: Address,
        pid: u32,
        alloc_point: u64,
        rewarder: Option<Address>,
        overwrite: bool,
    ) -> Result<(), ContractError> {
        Self::require_owner(&env, &caller)?;

        if !env.storage().persistent().has(&(POOL, pid)) {
            return Err(ContractError::PoolNotFound);
        }

        let now = env.ledger().timestamp();
        Self::admin_checkpoint(&env, now)?;

        // Read after the mass update, which may have checkpointed this
        // pool already.
        let mut pool = Self::load_pool(&env, pid)?;
        let schedule = Self::load_schedule(&env);
        let total: u64 = env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0);
        Self::checkpoint(&env, pid, &mut pool, &schedule, total, now)?;

        let new_total = total
            .checked_sub(pool.alloc_point)
            .and_then(|t| t.checked_add(alloc_point))
            .ok_or(ContractError::MathOverflow)?;
        env.storage().instance().set(&TOTAL_ALLOC, &new_total);

        pool.alloc_point = alloc_point;
        if overwrite {
            pool.rewarder = rewarder.clone();
        }
        Self::save_pool(&env, pid, &pool);

        events::publish_pool_set(&env, pid, alloc_point, rewarder, overwrite);

        Ok(())
    }

    // ── Emission schedule ───────────────────────────────────────────────────

    /// Fund `amount` more grace and spread it, together with whatever the
    /// current schedule has not yet emitted, evenly from now until
    /// `end_time`.
    pub fn add_grace_reward(
        env: Env,
        funder: Address,
        amount: i128,
        end_time: u64,
    ) -> Result<(), ContractError> {
        let cfg = Self::require_owner(&env, &funder)?;
        flash::require_not_lending(&env)?;

        if amount <= 0 {
            return Err(ContractError::ZeroGraceAmount);
        }
        let now = env.ledger().timestamp();
        if end_time <= now {
            return Err(ContractError::EndTimeNotFuture);
        }

        // Checkpoint at the old rate first; skipping this would apply the
        // new rate retroactively to the unflushed window.
        Self::admin_checkpoint(&env, now)?;

        let schedule = Self::load_schedule(&env);
        let new_rate = schedule_math::reallocated_rate(
            schedule.grace_per_second,
            schedule.end_time,
            amount as u128,
            now,
            end_time,
        )
        .ok_or(ContractError::GracePerSecondOverflow)?;

        token::Client::new(&env, &cfg.grace_token).transfer(
            &funder,
            &env.current_contract_address(),
            &amount,
        );

        let schedule = Schedule {
            grace_per_second: new_rate,
            end_time,
        };
        env.storage().instance().set(&SCHEDULE, &schedule);

        events::publish_rate_changed(&env, new_rate, end_time);

        Ok(())
    }

    /// Directly set the emission rate until `end_time`. Any funding gap
    /// between the new obligation and the current leftover is pulled from
    /// `funder`; a surplus stays in the ledger (no refund). A zero rate
    /// halts emission until the next reallocation.
    pub fn set_grace_per_second(
        env: Env,
        funder: Address,
        rate: u128,
        end_time: u64,
    ) -> Result<(), ContractError> {
        let cfg = Self::require_owner(&env, &funder)?;
        flash::require_not_lending(&env)?;

        let now = env.ledger().timestamp();
        if end_time <= now {
            return Err(ContractError::EndTimeNotFuture);
        }

        Self::admin_checkpoint(&env, now)?;

        let schedule = Self::load_schedule(&env);
        let shortage = schedule_math::funding_shortage(
            rate,
            schedule.grace_per_second,
            schedule.end_time,
            now,
            end_time,
        )
        .ok_or(ContractError::GracePerSecondOverflow)?;

        if shortage > 0 {
            let shortage = Self::to_i128(shortage)?;
            token::Client::new(&env, &cfg.grace_token).transfer(
                &funder,
                &env.current_contract_address(),
                &shortage,
            );
        }

        let schedule = Schedule {
            grace_per_second: rate,
            end_time,
        };
        env.storage().instance().set(&SCHEDULE, &schedule);

        events::publish_rate_changed(&env, rate, end_time);

        Ok(())
    }

    // ── Checkpointing ───────────────────────────────────────────────────────

    /// Checkpoint one pool: fold the emission since its last update into
    /// `acc_grace_per_share` and advance its clock. Idempotent within a
    /// single instant; callable by anyone; a pool with zero weight or
    /// zero stake still advances its clock.
    pub fn update_pool(env: Env, pid: u32) -> Result<Pool, ContractError> {
        Self::update_pool_by_id(&env, pid)
    }

    /// Checkpoint each listed pool. Fails on the first unknown id.
    pub fn mass_update_pools(env: Env, pids: Vec<u32>) -> Result<(), ContractError> {
        for pid in pids.iter() {
            Self::update_pool_by_id(&env, pid)?;
        }
        Ok(())
    }

    /// Checkpoint each listed pool, then arm the suppression flag so the
    /// next administrative calls (within [`suppress::FLAG_LIMIT`]) skip
    /// their update-all side effect. Arming happens even for an empty
    /// list.
    pub fn mass_update_pools_and_set(
        env: Env,
        caller: Address,
        pids: Vec<u32>,
    ) -> Result<(), ContractError> {
        Self::require_owner(&env, &caller)?;

        for pid in pids.iter() {
            Self::update_pool_by_id(&env, pid)?;
        }

        let now = env.ledger().timestamp();
        env.storage()
            .instance()
            .set(&SUPPRESS, &SuppressionFlag::armed_at(now));

        Ok(())
    }

    /// Checkpoint exactly the pools with a non-zero weight.
    pub fn mass_update_pools_non_zero(env: Env) -> Result<(), ContractError> {
        let now = env.ledger().timestamp();
        Self::update_non_zero(&env, now)
    }

    // ── Position mutation (registered caller only) ──────────────────────────

    /// Credit `amount` stake to `to`'s position, pulling the tokens from
    /// the caller.
    pub fn deposit(
        env: Env,
        caller: Address,
        pid: u32,
        amount: i128,
        to: Address,
    ) -> Result<(), ContractError> {
        flash::require_not_lending(&env)?;
        let mut pool = Self::require_pool_caller(&env, pid, &caller)?;

        if amount <= 0 {
            return Err(ContractError::ZeroStakeAmount);
        }

        let now = env.ledger().timestamp();
        let schedule = Self::load_schedule(&env);
        let total: u64 = env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0);
        Self::checkpoint(&env, pid, &mut pool, &schedule, total, now)?;

        let mut position = Self::load_position(&env, pid, &to);
        position.amount = position
            .amount
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        let debt_delta = pool::entitlement(pool.acc_grace_per_share, amount)
            .ok_or(ContractError::MathOverflow)?;
        position.reward_debt = position
            .reward_debt
            .checked_add(debt_delta)
            .ok_or(ContractError::MathOverflow)?;
        Self::save_position(&env, pid, &to, &position);

        pool.stake_supply = pool
            .stake_supply
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        Self::save_pool(&env, pid, &pool);

        token::Client::new(&env, &pool.stake_asset).transfer(
            &caller,
            &env.current_contract_address(),
            &amount,
        );

        if let Some(rewarder) = &pool.rewarder {
            RewarderClient::new(&env, rewarder)
                .on_grace_reward(&pid, &to, &to, &0, &position.amount);
        }

        events::publish_deposit(&env, pid, to, amount);

        Ok(())
    }

    /// Debit `amount` stake from `to`'s position and send the tokens to
    /// `to`. Accrued grace stays claimable through `harvest`.
    pub fn withdraw(
        env: Env,
        caller: Address,
        pid: u32,
        amount: i128,
        to: Address,
    ) -> Result<(), ContractError> {
        flash::require_not_lending(&env)?;
        let mut pool = Self::require_pool_caller(&env, pid, &caller)?;

        if amount <= 0 {
            return Err(ContractError::ZeroStakeAmount);
        }

        let now = env.ledger().timestamp();
        let schedule = Self::load_schedule(&env);
        let total: u64 = env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0);
        Self::checkpoint(&env, pid, &mut pool, &schedule, total, now)?;

        let mut position = Self::load_position(&env, pid, &to);
        if position.amount < amount {
            return Err(ContractError::InsufficientStake);
        }

        let debt_delta = pool::entitlement(pool.acc_grace_per_share, amount)
            .ok_or(ContractError::MathOverflow)?;
        position.reward_debt = position
            .reward_debt
            .checked_sub(debt_delta)
            .ok_or(ContractError::MathOverflow)?;
        position.amount -= amount;
        Self::save_position(&env, pid, &to, &position);

        pool.stake_supply = pool
            .stake_supply
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;
        Self::save_pool(&env, pid, &pool);

        token::Client::new(&env, &pool.stake_asset).transfer(
            &env.current_contract_address(),
            &to,
            &amount,
        );

        if let Some(rewarder) = &pool.rewarder {
            RewarderClient::new(&env, rewarder)
                .on_grace_reward(&pid, &to, &to, &0, &position.amount);
        }

        events::publish_withdraw(&env, pid, to, amount);

        Ok(())
    }

    /// Pay all grace accrued by `from`'s position to `to` and reset the
    /// position's debt snapshot.
    pub fn harvest(
        env: Env,
        caller: Address,
        pid: u32,
        from: Address,
        to: Address,
    ) -> Result<i128, ContractError> {
        flash::require_not_lending(&env)?;
        let mut pool = Self::require_pool_caller(&env, pid, &caller)?;

        let now = env.ledger().timestamp();
        let schedule = Self::load_schedule(&env);
        let total: u64 = env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0);
        Self::checkpoint(&env, pid, &mut pool, &schedule, total, now)?;
        Self::save_pool(&env, pid, &pool);

        let mut position = Self::load_position(&env, pid, &from);
        let entitled = pool::entitlement(pool.acc_grace_per_share, position.amount)
            .ok_or(ContractError::MathOverflow)?;
        let pending = entitled
            .checked_sub(position.reward_debt)
            .ok_or(ContractError::MathOverflow)?
            .max(0);
        position.reward_debt = entitled;
        Self::save_position(&env, pid, &from, &position);

        let cfg = Self::load_config(&env)?;
        if pending > 0 {
            token::Client::new(&env, &cfg.grace_token).transfer(
                &env.current_contract_address(),
                &to,
                &pending,
            );
        }

        if let Some(rewarder) = &pool.rewarder {
            RewarderClient::new(&env, rewarder)
                .on_grace_reward(&pid, &from, &to, &pending, &position.amount);
        }

        events::publish_harvest(&env, pid, from, to, pending);

        Ok(pending)
    }

    /// Return `to`'s entire stake and discard the position, forfeiting
    /// anything accrued. No grace is computed or paid.
    pub fn emergency_withdraw(
        env: Env,
        caller: Address,
        pid: u32,
        to: Address,
    ) -> Result<(), ContractError> {
        flash::require_not_lending(&env)?;
        let mut pool = Self::require_pool_caller(&env, pid, &caller)?;

        let now = env.ledger().timestamp();
        let schedule = Self::load_schedule(&env);
        let total: u64 = env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0);
        Self::checkpoint(&env, pid, &mut pool, &schedule, total, now)?;

        let position = Self::load_position(&env, pid, &to);
        let amount = position.amount;

        env.storage().persistent().remove(&(USER, pid, to.clone()));

        pool.stake_supply = pool
            .stake_supply
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;
        Self::save_pool(&env, pid, &pool);

        if amount > 0 {
            token::Client::new(&env, &pool.stake_asset).transfer(
                &env.current_contract_address(),
                &to,
                &amount,
            );
        }

        if let Some(rewarder) = &pool.rewarder {
            RewarderClient::new(&env, rewarder).on_grace_reward(&pid, &to, &to, &0, &0);
        }

        events::publish_emergency_withdraw(&env, pid, to, amount);

        Ok(())
    }

    // ── Flash loans ─────────────────────────────────────────────────────────

    /// Lend `amount` of `token` to `receiver` for the duration of its
    /// `on_flash_loan` callback. The callback must return principal plus
    /// fee; the fee is forwarded to the authority.
    pub fn flash_loan(
        env: Env,
        receiver: Address,
        token_addr: Address,
        amount: i128,
        data: Bytes,
    ) -> Result<(), ContractError> {
        let cfg = Self::load_config(&env)?;

        if amount <= 0 {
            return Err(ContractError::ZeroLoanAmount);
        }
        let recognized = token_addr == cfg.grace_token
            || env.storage().persistent().has(&(ASSET, token_addr.clone()));
        if !recognized {
            return Err(ContractError::WrongToken);
        }

        flash::acquire_guard(&env)?;

        let this = env.current_contract_address();
        let client = token::Client::new(&env, &token_addr);
        let balance_before = client.balance(&this);

        let rate = AuthorityClient::new(&env, &cfg.authority).flash_loan_fee(&this);
        let fee = bps::flash_fee(amount as u128, rate).ok_or(ContractError::MathOverflow)?;
        let fee = Self::to_i128(fee)?;

        client.transfer(&this, &receiver, &amount);

        // Untrusted code runs here; nothing read before this line may be
        // assumed unchanged after it.
        FlashBorrowerClient::new(&env, &receiver)
            .on_flash_loan(&this, &token_addr, &amount, &fee, &data);

        let required = balance_before
            .checked_add(fee)
            .ok_or(ContractError::MathOverflow)?;
        if client.balance(&this) < required {
            return Err(ContractError::RepaymentShortfall);
        }

        if fee > 0 {
            client.transfer(&this, &cfg.authority, &fee);
        }

        flash::release_guard(&env);

        events::publish_flash_loan(&env, receiver, token_addr, amount, fee);

        Ok(())
    }

    // ── Rescue ──────────────────────────────────────────────────────────────

    /// Move up to `amount` of `token` held by the ledger to `to`; passing
    /// `i128::MAX` sweeps the full balance. Returns the amount moved.
    pub fn rescue_tokens(
        env: Env,
        caller: Address,
        token_addr: Address,
        amount: i128,
        to: Address,
    ) -> Result<i128, ContractError> {
        Self::require_owner(&env, &caller)?;
        flash::require_not_lending(&env)?;

        let this = env.current_contract_address();
        let client = token::Client::new(&env, &token_addr);
        let rescued = amount.min(client.balance(&this)).max(0);
        if rescued > 0 {
            client.transfer(&this, &to, &rescued);
        }

        events::publish_rescue(&env, token_addr, to, rescued);

        Ok(rescued)
    }

    // ── View functions ──────────────────────────────────────────────────────

    /// Claimable grace for `account` in pool `pid` as of now, computed
    /// against a hypothetical checkpoint without mutating state.
    pub fn pending_grace(env: Env, pid: u32, account: Address) -> Result<i128, ContractError> {
        let pool = Self::load_pool(&env, pid)?;
        let schedule = Self::load_schedule(&env);
        let total: u64 = env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0);
        let now = env.ledger().timestamp();

        let acc = pool::projected_acc(&pool, &schedule, total, now)
            .ok_or(ContractError::MathOverflow)?;
        let position = Self::load_position(&env, pid, &account);
        pool::pending_amount(&position, acc).ok_or(ContractError::MathOverflow)
    }

    pub fn pool_count(env: Env) -> u32 {
        env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
    }

    pub fn get_pool(env: Env, pid: u32) -> Result<Pool, ContractError> {
        Self::load_pool(&env, pid)
    }

    pub fn get_position(env: Env, pid: u32, account: Address) -> UserPosition {
        Self::load_position(&env, pid, &account)
    }

    pub fn total_alloc_point(env: Env) -> u64 {
        env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0)
    }

    pub fn grace_per_second(env: Env) -> u128 {
        Self::load_schedule(&env).grace_per_second
    }

    pub fn end_time(env: Env) -> u64 {
        Self::load_schedule(&env).end_time
    }

    pub fn get_schedule(env: Env) -> Schedule {
        Self::load_schedule(&env)
    }

    pub fn suppression_flag(env: Env) -> SuppressionFlag {
        env.storage()
            .instance()
            .get(&SUPPRESS)
            .unwrap_or_else(SuppressionFlag::inactive)
    }

    pub fn grace_token(env: Env) -> Result<Address, ContractError> {
        Ok(Self::load_config(&env)?.grace_token)
    }

    pub fn authority(env: Env) -> Result<Address, ContractError> {
        Ok(Self::load_config(&env)?.authority)
    }

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        Ok(Self::load_config(&env)?.owner)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&CONFIG)
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    fn load_config(env: &Env) -> Result<Config, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    /// Guard: authenticate `caller` and revert unless it is the ledger
    /// owner.
    fn require_owner(env: &Env, caller: &Address) -> Result<Config, ContractError> {
        caller.require_auth();
        let cfg = Self::load_config(env)?;
        if *caller != cfg.owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(cfg)
    }

    /// Guard: authenticate `caller` and revert unless it is the single
    /// registered caller for pool `pid`. Returns the pool.
    fn require_pool_caller(
        env: &Env,
        pid: u32,
        caller: &Address,
    ) -> Result<Pool, ContractError> {
        caller.require_auth();
        let pool = Self::load_pool(env, pid)?;
        if *caller != pool.caller {
            return Err(ContractError::NotFromPoolCaller);
        }
        Ok(pool)
    }

    fn load_pool(env: &Env, pid: u32) -> Result<Pool, ContractError> {
        env.storage()
            .persistent()
            .get(&(POOL, pid))
            .ok_or(ContractError::PoolNotFound)
    }

    fn save_pool(env: &Env, pid: u32, pool: &Pool) {
        env.storage().persistent().set(&(POOL, pid), pool);
    }

    fn load_position(env: &Env, pid: u32, account: &Address) -> UserPosition {
        env.storage()
            .persistent()
            .get(&(USER, pid, account.clone()))
            .unwrap_or_else(UserPosition::empty)
    }

    fn save_position(env: &Env, pid: u32, account: &Address, position: &UserPosition) {
        env.storage()
            .persistent()
            .set(&(USER, pid, account.clone()), position);
    }

    fn load_schedule(env: &Env) -> Schedule {
        env.storage()
            .instance()
            .get(&SCHEDULE)
            .unwrap_or_else(Schedule::idle)
    }

    /// Advance one pool's checkpoint to `now`. The clock advances even
    /// when no reward accrues (zero weight, zero stake, expired
    /// schedule) so later condition changes cannot reach back in time.
    fn checkpoint(
        env: &Env,
        pid: u32,
        pool: &mut Pool,
        schedule: &Schedule,
        total_alloc: u64,
        now: u64,
    ) -> Result<(), ContractError> {
        if now <= pool.last_reward_time {
            return Ok(());
        }
        let acc = pool::projected_acc(pool, schedule, total_alloc, now)
            .ok_or(ContractError::MathOverflow)?;
        pool.acc_grace_per_share = acc;
        pool.last_reward_time = now;
        events::publish_pool_updated(env, pid, now, pool.stake_supply, acc);
        Ok(())
    }

    fn update_pool_by_id(env: &Env, pid: u32) -> Result<Pool, ContractError> {
        let mut pool = Self::load_pool(env, pid)?;
        let schedule = Self::load_schedule(env);
        let total: u64 = env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0);
        let now = env.ledger().timestamp();
        Self::checkpoint(env, pid, &mut pool, &schedule, total, now)?;
        Self::save_pool(env, pid, &pool);
        Ok(pool)
    }

    /// Checkpoint every pool with a non-zero weight.
    fn update_non_zero(env: &Env, now: u64) -> Result<(), ContractError> {
        let count: u32 = env.storage().instance().get(&POOL_COUNT).unwrap_or(0);
        let schedule = Self::load_schedule(env);
        let total: u64 = env.storage().instance().get(&TOTAL_ALLOC).unwrap_or(0);
        for pid in 0..count {
            let mut pool = Self::load_pool(env, pid)?;
            if pool.alloc_point == 0 {
                continue;
            }
            Self::checkpoint(env, pid, &mut pool, &schedule, total, now)?;
            Self::save_pool(env, pid, &pool);
        }
        Ok(())
    }

    /// The update-all side effect of administrative mutations, skipped
    /// while the suppression flag is live.
    fn admin_checkpoint(env: &Env, now: u64) -> Result<(), ContractError> {
        let flag: SuppressionFlag = env
            .storage()
            .instance()
            .get(&SUPPRESS)
            .unwrap_or_else(SuppressionFlag::inactive);
        if flag.is_live(now) {
            return Ok(());
        }
        Self::update_non_zero(env, now)
    }

    fn to_i128(value: u128) -> Result<i128, ContractError> {
        i128::try_from(value).map_err(|_| ContractError::MathOverflow)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_schedule;
