#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env,
};

use angel::{AngelContract, AngelContractClient};
use authority::{AuthorityContract, AuthorityContractClient};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { user: u8, amount: u64 },
    Withdraw { user: u8, amount: u64 },
    Harvest { user: u8 },
    EmergencyWithdraw { user: u8 },
    UpdatePool,
    MassUpdateNonZero,
    AdvanceTime { seconds: u32 },
    AddGraceReward { amount: u64, duration: u32 },
    SetGracePerSecond { rate: u64, duration: u32 },
    SetPoolWeight { alloc_point: u16 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let grace = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let authority_id = env.register(AuthorityContract, ());
    AuthorityContractClient::new(&env, &authority_id).initialize(&Address::generate(&env), &9u32);

    let contract_id = env.register(AngelContract, ());
    let client = AngelContractClient::new(&env, &contract_id);
    let owner = Address::generate(&env);
    client.initialize(&owner, &grace.address(), &authority_id);
    StellarAssetClient::new(&env, &grace.address()).mint(&owner, &i128::MAX);

    let stake = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let wrapper = Address::generate(&env);
    let pid = client.add_pool(&owner, &10u64, &stake.address(), &None, &wrapper);
    StellarAssetClient::new(&env, &stake.address()).mint(&wrapper, &i128::MAX);

    let mut users = std::vec::Vec::new();
    for _ in 0..4 {
        users.push(Address::generate(&env));
    }

    // Drive the ledger with arbitrary interleavings and look for
    // unhandled panics (overflow, broken bookkeeping, stuck clocks).
    // All calls go through try_ so expected errors are ignored.
    let mut now = env.ledger().timestamp();
    for action in actions {
        match action {
            FuzzAction::Deposit { user, amount } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_deposit(&wrapper, &pid, &(amount as i128), who);
            }
            FuzzAction::Withdraw { user, amount } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_withdraw(&wrapper, &pid, &(amount as i128), who);
            }
            FuzzAction::Harvest { user } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_harvest(&wrapper, &pid, who, who);
            }
            FuzzAction::EmergencyWithdraw { user } => {
                let who = &users[user as usize % users.len()];
                let _ = client.try_emergency_withdraw(&wrapper, &pid, who);
            }
            FuzzAction::UpdatePool => {
                let _ = client.try_update_pool(&pid);
            }
            FuzzAction::MassUpdateNonZero => {
                let _ = client.try_mass_update_pools_non_zero();
            }
            FuzzAction::AdvanceTime { seconds } => {
                now = now.saturating_add(seconds as u64);
                env.ledger().set_timestamp(now);
            }
            FuzzAction::AddGraceReward { amount, duration } => {
                let end = now.saturating_add(duration as u64);
                let _ = client.try_add_grace_reward(&owner, &(amount as i128), &end);
            }
            FuzzAction::SetGracePerSecond { rate, duration } => {
                let end = now.saturating_add(duration as u64);
                let _ = client.try_set_grace_per_second(&owner, &(rate as u128), &end);
            }
            FuzzAction::SetPoolWeight { alloc_point } => {
                let _ = client.try_set_pool(&owner, &pid, &(alloc_point as u64), &None, &false);
            }
        }
    }

    // The supply counter must survive any interleaving.
    let pool = client.get_pool(&pid);
    let total: i128 = users
        .iter()
        .map(|u| client.get_position(&pid, u).amount)
        .sum();
    assert_eq!(pool.stake_supply, total);
});
