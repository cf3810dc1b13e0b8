#![no_std]

//! The authority is the owner gate, flash-loan fee registry, and fee
//! collector for a set of lending ledgers. Lenders query
//! [`flash_loan_fee`](AuthorityContract::flash_loan_fee) at borrow time and
//! forward the skimmed fee to this contract's address.

pub mod events;

use common::bps;
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol};

// ── Storage keys ─────────────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");

// Per-lender fee overrides use tuple keys: (prefix, lender_address)
const LENDER_FEE: Symbol = symbol_short!("LDR_FEE");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 10,
    NoPendingOwner = 11,
    FeeRateExceeded = 30,
}

// ── Types ────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthorityConfig {
    /// Address allowed to change fee rates and sweep collected fees.
    pub owner: Address,
    /// Fee rate in basis points applied to lenders without an override.
    pub default_fee: u32,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct AuthorityContract;

#[contractimpl]
impl AuthorityContract {
    /// Bootstrap the authority with its owner and the default flash-loan
    /// fee rate (basis points, at most 10000).
    pub fn initialize(env: Env, owner: Address, default_fee: u32) -> Result<(), ContractError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(ContractError::AlreadyInitialized);
        }
        if !bps::is_valid_rate(default_fee) {
            return Err(ContractError::FeeRateExceeded);
        }

        let cfg = AuthorityConfig {
            owner: owner.clone(),
            default_fee,
        };
        env.storage().instance().set(&CONFIG, &cfg);

        events::publish_initialized(&env, owner, default_fee);

        Ok(())
    }

    // ── Fee registry ────────────────────────────────────────────────────────

    /// Change the default fee rate. Lender-specific overrides keep
    /// precedence over the new default.
    pub fn set_default_flash_loan_fee(
        env: Env,
        caller: Address,
        rate: u32,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if !bps::is_valid_rate(rate) {
            return Err(ContractError::FeeRateExceeded);
        }

        let mut cfg = Self::load_config(&env)?;
        cfg.default_fee = rate;
        env.storage().instance().set(&CONFIG, &cfg);

        events::publish_default_fee_set(&env, rate);

        Ok(())
    }

    /// Pin a fee rate for one specific lender, shadowing the default.
    pub fn set_flash_loan_fee(
        env: Env,
        caller: Address,
        lender: Address,
        rate: u32,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if !bps::is_valid_rate(rate) {
            return Err(ContractError::FeeRateExceeded);
        }

        env.storage()
            .persistent()
            .set(&(LENDER_FEE, lender.clone()), &rate);

        events::publish_lender_fee_set(&env, lender, rate);

        Ok(())
    }

    /// Effective fee rate for `lender`: its override if one was set, else
    /// the current default. Resolved live at borrow time by lenders.
    pub fn flash_loan_fee(env: Env, lender: Address) -> Result<u32, ContractError> {
        if let Some(rate) = env.storage().persistent().get(&(LENDER_FEE, lender)) {
            return Ok(rate);
        }
        Ok(Self::load_config(&env)?.default_fee)
    }

    pub fn default_flash_loan_fee(env: Env) -> Result<u32, ContractError> {
        Ok(Self::load_config(&env)?.default_fee)
    }

    // ── Fee collection ──────────────────────────────────────────────────────

    /// Drain the authority's whole balance of `token` to `to`. Returns the
    /// amount moved.
    pub fn sweep_fees(
        env: Env,
        caller: Address,
        token: Address,
        to: Address,
    ) -> Result<i128, ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let client = token::Client::new(&env, &token);
        let amount = client.balance(&env.current_contract_address());
        if amount > 0 {
            client.transfer(&env.current_contract_address(), &to, &amount);
        }

        events::publish_fees_swept(&env, token, to, amount);

        Ok(amount)
    }

    // ── Ownership (two-step) ────────────────────────────────────────────────

    /// Propose a new owner; the transfer completes when the proposed
    /// address calls `accept_owner`.
    pub fn propose_owner(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        env.storage().instance().set(&PENDING_OWNER, &new_owner);

        events::publish_owner_proposed(&env, caller, new_owner);

        Ok(())
    }

    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        new_owner.require_auth();

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_OWNER)
            .ok_or(ContractError::NoPendingOwner)?;
        if new_owner != pending {
            return Err(ContractError::Unauthorized);
        }

        let mut cfg = Self::load_config(&env)?;
        let old_owner = cfg.owner.clone();
        cfg.owner = new_owner.clone();
        env.storage().instance().set(&CONFIG, &cfg);
        env.storage().instance().remove(&PENDING_OWNER);

        events::publish_owner_accepted(&env, old_owner, new_owner);

        Ok(())
    }

    pub fn cancel_owner_transfer(env: Env, caller: Address) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_OWNER)
            .ok_or(ContractError::NoPendingOwner)?;
        env.storage().instance().remove(&PENDING_OWNER);

        events::publish_owner_cancelled(&env, caller, pending);

        Ok(())
    }

    // ── Views ───────────────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Result<Address, ContractError> {
        Ok(Self::load_config(&env)?.owner)
    }

    pub fn pending_owner(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_OWNER)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&CONFIG)
    }

    // ── Internal helpers ────────────────────────────────────────────────────

    fn load_config(env: &Env) -> Result<AuthorityConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        if *caller != Self::load_config(env)?.owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
