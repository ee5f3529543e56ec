extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Events},
    vec, Address, Env, IntoVal, TryIntoVal, Val, Vec,
};

use crate::events::{
    EndTimeUpdated, FundsWithdrawn, SaleFinalized, StageAdded, StageAdvanced, TokensPurchased,
};
use crate::testutils;
use crate::{TokenSale, TokenSaleClient, PRICE_SCALE};
use soroban_sdk::{symbol_short, token};

const DAY: u64 = 86_400;

struct EventFixture<'a> {
    env: Env,
    client: TokenSaleClient<'a>,
    contract_id: Address,
    owner: Address,
    buyer: Address,
    treasury: Address,
    native: token::Client<'a>,
}

fn setup() -> EventFixture<'static> {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(TokenSale, ());
    let client = TokenSaleClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    let treasury = Address::generate(&env);
    let buyer = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let (sale_token, sale_admin) = testutils::create_token(&env, &token_admin);
    let (native, native_admin) = testutils::create_token(&env, &token_admin);
    let (feed_id, feed) = testutils::register_feed(&env);
    feed.set_price(&native.address, &PRICE_SCALE);

    client.init(
        &owner,
        &sale_token.address,
        &treasury,
        &native.address,
        &feed_id,
        &0,
        &DAY,
        &1_000_000,
    );
    sale_admin.mint(&contract_id, &1_000_000);
    native_admin.mint(&buyer, &1_000_000);

    EventFixture {
        env,
        client,
        contract_id,
        owner,
        buyer,
        treasury,
        native,
    }
}

/// Events published by the sale contract during the last invocation,
/// excluding the token contracts' own transfer events.
fn sale_events(env: &Env, contract_id: &Address) -> std::vec::Vec<(Address, Vec<Val>, Val)> {
    env.events()
        .all()
        .iter()
        .filter(|(addr, _, _)| addr == contract_id)
        .collect()
}

#[test]
fn test_purchase_event() {
    let f = setup();
    f.client.add_stage(&f.owner, &2, &10_000);

    f.client.buy_with_native(&f.buyer, &100);

    let events = sale_events(&f.env, &f.contract_id);
    let (_, topics, data) = events.last().expect("No events found").clone();

    let expected_topics = vec![
        &f.env,
        symbol_short!("purchase").into_val(&f.env),
        f.buyer.clone().into_val(&f.env),
    ];
    assert_eq!(topics, expected_topics);

    let event_data: TokensPurchased = data.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        TokensPurchased {
            buyer: f.buyer.clone(),
            pay_token: f.native.address.clone(),
            usd_amount: 100,
            token_amount: 200,
        }
    );
}

#[test]
fn test_stage_added_event() {
    let f = setup();
    f.client.add_stage(&f.owner, &2, &10_000);

    let events = sale_events(&f.env, &f.contract_id);
    let (_, topics, data) = events.last().expect("No events found").clone();

    let expected_topics = vec![
        &f.env,
        symbol_short!("stage_add").into_val(&f.env),
        0u32.into_val(&f.env),
    ];
    assert_eq!(topics, expected_topics);

    let event_data: StageAdded = data.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        StageAdded {
            index: 0,
            rate: 2,
            cap: 10_000,
        }
    );
}

#[test]
fn test_stage_advanced_event_on_boundary_fill() {
    let f = setup();
    f.client.add_stage(&f.owner, &2, &1_000);
    f.client.add_stage(&f.owner, &3, &5_000);

    f.client.buy_with_native(&f.buyer, &500);

    // The advancement event precedes the purchase event in the same
    // invocation.
    let events = sale_events(&f.env, &f.contract_id);
    assert!(events.len() >= 2);
    let (_, topics, data) = events[events.len() - 2].clone();

    let expected_topics = vec![
        &f.env,
        symbol_short!("stage_adv").into_val(&f.env),
        1u32.into_val(&f.env),
    ];
    assert_eq!(topics, expected_topics);

    let event_data: StageAdvanced = data.try_into_val(&f.env).unwrap();
    assert_eq!(event_data, StageAdvanced { index: 1 });
}

#[test]
fn test_finalized_event_on_last_stage_fill() {
    let f = setup();
    f.client.add_stage(&f.owner, &2, &1_000);

    f.client.buy_with_native(&f.buyer, &500);

    let events = sale_events(&f.env, &f.contract_id);
    assert!(events.len() >= 2);
    let (_, topics, data) = events[events.len() - 2].clone();

    let expected_topics = vec![&f.env, symbol_short!("finalized").into_val(&f.env)];
    assert_eq!(topics, expected_topics);

    let event_data: SaleFinalized = data.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        SaleFinalized {
            total_raised: 500,
            total_tokens_sold: 1_000,
        }
    );
}

#[test]
fn test_finalized_event_on_owner_finalize() {
    let f = setup();
    f.client.finalize(&f.owner);

    let events = sale_events(&f.env, &f.contract_id);
    let (_, topics, data) = events.last().expect("No events found").clone();

    let expected_topics = vec![&f.env, symbol_short!("finalized").into_val(&f.env)];
    assert_eq!(topics, expected_topics);

    let event_data: SaleFinalized = data.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        SaleFinalized {
            total_raised: 0,
            total_tokens_sold: 0,
        }
    );
}

#[test]
fn test_funds_withdrawn_event() {
    let f = setup();
    let token_admin = Address::generate(&f.env);
    let (stray, stray_admin) = testutils::create_token(&f.env, &token_admin);
    stray_admin.mint(&f.contract_id, &777);

    f.client
        .withdraw_token(&f.owner, &stray.address, &f.treasury);

    let events = sale_events(&f.env, &f.contract_id);
    let (_, topics, data) = events.last().expect("No events found").clone();

    let expected_topics = vec![
        &f.env,
        symbol_short!("withdrawn").into_val(&f.env),
        stray.address.clone().into_val(&f.env),
    ];
    assert_eq!(topics, expected_topics);

    let event_data: FundsWithdrawn = data.try_into_val(&f.env).unwrap();
    assert_eq!(
        event_data,
        FundsWithdrawn {
            token: stray.address.clone(),
            to: f.treasury.clone(),
            amount: 777,
        }
    );
}

#[test]
fn test_end_time_updated_event() {
    let f = setup();
    f.client.update_end_time(&f.owner, &(2 * DAY));

    let events = sale_events(&f.env, &f.contract_id);
    let (_, topics, data) = events.last().expect("No events found").clone();

    let expected_topics = vec![&f.env, symbol_short!("end_time").into_val(&f.env)];
    assert_eq!(topics, expected_topics);

    let event_data: EndTimeUpdated = data.try_into_val(&f.env).unwrap();
    assert_eq!(event_data, EndTimeUpdated { end_time: 2 * DAY });
}
