#![cfg(test)]

//! Shared test scaffolding: a mock price-feed contract implementing the
//! same interface the production [`crate::oracle::PriceFeedClient`] calls,
//! plus token-creation helpers used across the test modules.

extern crate std;

use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env};

use crate::oracle::{PriceData, ORACLE_DECIMALS};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FeedKey {
    Price(Address),
    Decimals,
}

/// In-memory price feed with owner-settable quotes.
///
/// Defaults to [`ORACLE_DECIMALS`] precision; `set_decimals` lets tests
/// exercise the rescaling path. Negative prices are storable on purpose so
/// tests can drive the invalid-quote rejection.
#[contract]
pub struct MockPriceFeed;

#[contractimpl]
impl MockPriceFeed {
    pub fn set_price(env: Env, asset: Address, price: i128) {
        env.storage().instance().set(&FeedKey::Price(asset), &price);
    }

    pub fn set_decimals(env: Env, decimals: u32) {
        env.storage().instance().set(&FeedKey::Decimals, &decimals);
    }

    pub fn clear_price(env: Env, asset: Address) {
        env.storage().instance().remove(&FeedKey::Price(asset));
    }

    pub fn lastprice(env: Env, asset: Address) -> Option<PriceData> {
        let price: Option<i128> = env.storage().instance().get(&FeedKey::Price(asset));
        price.map(|price| PriceData {
            price,
            timestamp: env.ledger().timestamp(),
        })
    }

    pub fn decimals(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&FeedKey::Decimals)
            .unwrap_or(ORACLE_DECIMALS)
    }
}

/// Register a Stellar asset contract and hand back transfer + admin clients.
pub fn create_token<'a>(
    env: &Env,
    admin: &Address,
) -> (token::Client<'a>, token::StellarAssetClient<'a>) {
    let contract = env.register_stellar_asset_contract_v2(admin.clone());
    (
        token::Client::new(env, &contract.address()),
        token::StellarAssetClient::new(env, &contract.address()),
    )
}

/// Register a mock price feed.
pub fn register_feed<'a>(env: &Env) -> (Address, MockPriceFeedClient<'a>) {
    let feed_id = env.register(MockPriceFeed, ());
    let client = MockPriceFeedClient::new(env, &feed_id);
    (feed_id, client)
}
