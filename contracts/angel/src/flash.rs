//! Flash-loan plumbing: the borrower callback interface, the authority
//! fee oracle, and the re-entrancy guard.

use soroban_sdk::{contractclient, symbol_short, Address, Bytes, Env, Symbol};

use crate::ContractError;

const LENDING: Symbol = symbol_short!("LENDING");

/// Borrower side of the flash-loan protocol. Invoked synchronously after
/// the principal has been transferred; the borrower runs arbitrary logic
/// and must return `amount + fee` of `token` to `initiator` before this
/// call unwinds.
#[contractclient(name = "FlashBorrowerClient")]
pub trait FlashBorrower {
    fn on_flash_loan(
        env: Env,
        initiator: Address,
        token: Address,
        amount: i128,
        fee: i128,
        data: Bytes,
    );
}

/// Fee-registry surface of the authority contract, consulted at borrow
/// time so override/default changes apply to in-flight schedules
/// immediately.
#[contractclient(name = "AuthorityClient")]
pub trait Authority {
    fn flash_loan_fee(env: Env, lender: Address) -> u32;
}

/// True while a flash loan is in flight in the current transaction.
pub fn guard_held(env: &Env) -> bool {
    env.storage().instance().get(&LENDING).unwrap_or(false)
}

/// Reject loan-affecting entry points while the borrower callback is on
/// the stack.
pub fn require_not_lending(env: &Env) -> Result<(), ContractError> {
    if guard_held(env) {
        return Err(ContractError::ReentrantCall);
    }
    Ok(())
}

/// Take the guard before transferring principal out. Held state never
/// survives the transaction: it is either released on the success path or
/// rolled back with everything else.
pub fn acquire_guard(env: &Env) -> Result<(), ContractError> {
    require_not_lending(env)?;
    env.storage().instance().set(&LENDING, &true);
    Ok(())
}

pub fn release_guard(env: &Env) {
    env.storage().instance().remove(&LENDING);
}
