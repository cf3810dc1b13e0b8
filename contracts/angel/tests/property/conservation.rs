//! Token-conservation properties.
//!
//! Invariants tested:
//! - the sum of all pending entitlements never exceeds the grace funded
//!   into the schedule, and never exceeds the ledger's grace balance
//! - harvesting everyone pays out no more than was funded
//! - pool `stake_supply` always equals the sum of position amounts

use angel::{AngelContract, AngelContractClient};
use authority::{AuthorityContract, AuthorityContractClient};
use proptest::prelude::*;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

const FUNDED: i128 = 864_000; // 10/s over 86_400s

// ── Helpers ───────────────────────────────────────────────────────────────────

fn setup() -> (
    Env,
    AngelContractClient<'static>,
    Address, // wrapper
    Address, // grace token
    u32,     // pid
) {
    let env = Env::default();
    env.mock_all_auths();

    let grace = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let authority_id = env.register(AuthorityContract, ());
    AuthorityContractClient::new(&env, &authority_id).initialize(&Address::generate(&env), &0u32);

    let contract_id = env.register(AngelContract, ());
    let client = AngelContractClient::new(&env, &contract_id);
    let owner = Address::generate(&env);
    client.initialize(&owner, &grace.address(), &authority_id);

    StellarAssetClient::new(&env, &grace.address()).mint(&owner, &FUNDED);
    env.ledger().set_timestamp(0);
    client.add_grace_reward(&owner, &FUNDED, &86_400);

    let stake = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let wrapper = Address::generate(&env);
    let pid = client.add_pool(&owner, &10, &stake.address(), &None, &wrapper);
    StellarAssetClient::new(&env, &stake.address()).mint(&wrapper, &1_000_000_000i128);

    (env, client, wrapper, grace.address(), pid)
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// However deposits and time interleave, the pool can never promise
    /// more grace than was funded, and the ledger always holds enough to
    /// honor every pending claim.
    #[test]
    fn prop_pending_bounded_by_funding(
        steps in proptest::collection::vec((0u64..20_000u64, 1i128..50_000i128), 1..10),
        tail in 0u64..200_000u64,
    ) {
        let (env, client, wrapper, grace, pid) = setup();
        let users = [
            Address::generate(&env),
            Address::generate(&env),
            Address::generate(&env),
        ];

        let mut now = 0u64;
        for (i, (dt, amount)) in steps.iter().enumerate() {
            now += dt;
            env.ledger().set_timestamp(now);
            client.deposit(&wrapper, &pid, amount, &users[i % users.len()]);
        }

        // Let the schedule run out past its end, then settle the books.
        env.ledger().set_timestamp(now + tail);
        client.update_pool(&pid);

        let total_pending: i128 = users
            .iter()
            .map(|u| client.pending_grace(&pid, u))
            .sum();
        prop_assert!(total_pending <= FUNDED);
        prop_assert!(
            total_pending <= TokenClient::new(&env, &grace).balance(&client.address)
        );

        // Settling every claim pays out at most what was funded.
        let mut paid = 0i128;
        for user in users.iter() {
            paid += client.harvest(&wrapper, &pid, user, user);
        }
        prop_assert_eq!(paid, total_pending);
        for user in users.iter() {
            prop_assert_eq!(client.pending_grace(&pid, user), 0);
        }
    }

    /// `stake_supply` stays in lockstep with the positions it aggregates
    /// across arbitrary deposit/withdraw interleavings.
    #[test]
    fn prop_stake_supply_matches_positions(
        ops in proptest::collection::vec(
            (0usize..2usize, 1i128..10_000i128, proptest::bool::ANY),
            1..16
        )
    ) {
        let (env, client, wrapper, _grace, pid) = setup();
        let users = [Address::generate(&env), Address::generate(&env)];
        let mut model = [0i128, 0i128];

        let mut now = 0u64;
        for (who, amount, is_deposit) in ops {
            now += 100;
            env.ledger().set_timestamp(now);
            if is_deposit {
                client.deposit(&wrapper, &pid, &amount, &users[who]);
                model[who] += amount;
            } else if model[who] >= amount {
                client.withdraw(&wrapper, &pid, &amount, &users[who]);
                model[who] -= amount;
            }

            prop_assert_eq!(client.get_position(&pid, &users[who]).amount, model[who]);
            prop_assert_eq!(
                client.get_pool(&pid).stake_supply,
                model[0] + model[1]
            );
        }
    }
}
