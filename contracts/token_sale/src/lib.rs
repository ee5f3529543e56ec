//! # Staged Token-Sale Contract
//!
//! This is the root crate of the staged token sale. It exposes the single
//! Soroban contract `TokenSale` whose entry points cover the full sale
//! lifecycle:
//!
//! | Phase         | Entry Point(s)                                    |
//! |---------------|---------------------------------------------------|
//! | Bootstrap     | [`TokenSale::init`]                               |
//! | Registry      | `register_payment_token`, `enable_payment_token`, `disable_payment_token` |
//! | Stages        | [`TokenSale::add_stage`], `advance_stage`         |
//! | Purchasing    | [`TokenSale::buy_with_native`], [`TokenSale::buy_with_token`] |
//! | Lifecycle     | `pause`, `unpause`, `finalize`, `update_end_time`, `update_max_purchase` |
//! | Recovery      | `withdraw_native`, `withdraw_token`               |
//! | Queries       | `get_sale`, `get_stage`, `get_purchased`, `current_rate` |
//!
//! ## Architecture
//!
//! Authorization is fully delegated to [`ownable`].  Storage access is fully
//! delegated to [`storage`].  Price lookups are fully delegated to
//! [`oracle`].  This file contains the public entry points, the purchase
//! engine, and the stage-advancement logic.
//!
//! A purchase converts the payment amount into reference-currency units via
//! the asset's price feed, multiplies by the active stage's rate to obtain
//! the token allocation, enforces the stage cap and the per-address limit,
//! settles the payment to the treasury, and releases tokens from the
//! contract's own inventory. Filling the last stage finalizes the sale.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, Env,
};

pub mod events;
pub mod oracle;
pub mod ownable;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod testutils;

pub use oracle::{PriceData, ORACLE_DECIMALS, PRICE_SCALE};
use storage::{load_config, load_state, save_state};
use types::PaymentAsset;
pub use types::{Sale, SaleConfig, SaleStage, SaleState};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotAuthorized = 2,
    SaleNotStarted = 3,
    SaleEnded = 4,
    SalePaused = 5,
    AlreadyFinalized = 6,
    InvalidAmount = 7,
    InvalidTimeRange = 8,
    PastTimestamp = 9,
    BeforeStart = 10,
    NonPositiveRate = 11,
    NoActiveStage = 12,
    FinalStageReached = 13,
    StageCapExceeded = 14,
    PaymentNotAccepted = 15,
    AlreadyEnabled = 16,
    AlreadyDisabled = 17,
    StaleOrInvalidPrice = 18,
    InsufficientSupply = 19,
    LimitExceeded = 20,
    AmountTooSmall = 21,
    Overflow = 22,
    ReentrantCall = 23,
}

#[contract]
pub struct TokenSale;

#[contractimpl]
impl TokenSale {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the sale and set its owner.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls panic with `Error::AlreadyInitialized`.
    ///
    /// - `owner` gates every administrative mutation and must sign.
    /// - `sale_token` is released from the contract's own balance; fund the
    ///   contract with inventory before opening the first stage.
    /// - `treasury` receives every settled payment.
    /// - `native_token` / `native_feed` serve the native purchase path.
    /// - `start_time` must precede `end_time`.
    /// - `max_purchase` caps cumulative tokens per buyer address.
    pub fn init(
        env: Env,
        owner: Address,
        sale_token: Address,
        treasury: Address,
        native_token: Address,
        native_feed: Address,
        start_time: u64,
        end_time: u64,
        max_purchase: i128,
    ) {
        owner.require_auth();
        if storage::has_config(&env) {
            panic_with_error!(&env, Error::AlreadyInitialized);
        }
        if start_time >= end_time {
            panic_with_error!(&env, Error::InvalidTimeRange);
        }
        if max_purchase <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }

        ownable::init_owner(&env, &owner);
        storage::save_config(
            &env,
            &SaleConfig {
                sale_token,
                treasury,
                native_token,
                native_feed,
                start_time,
            },
        );
        save_state(
            &env,
            &SaleState {
                end_time,
                paused: false,
                finalized: false,
                current_stage: 0,
                total_raised: 0,
                total_tokens_sold: 0,
                max_purchase,
            },
        );
    }

    // ─────────────────────────────────────────────────────────
    // Ownership
    // ─────────────────────────────────────────────────────────

    /// Transfer ownership of the sale to `new_owner`.
    ///
    /// - `current_owner` must authorize and be the stored owner.
    pub fn transfer_ownership(env: Env, current_owner: Address, new_owner: Address) {
        ownable::transfer_ownership(&env, &current_owner, &new_owner);
    }

    /// Return the owner address.
    pub fn get_owner(env: Env) -> Address {
        match ownable::get_owner(&env) {
            Some(owner) => owner,
            None => panic_with_error!(&env, Error::NotAuthorized),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Payment-token registry
    // ─────────────────────────────────────────────────────────

    /// Register `token` as a payment asset quoted by `feed`.
    ///
    /// Idempotent upsert: re-registering overwrites the feed and leaves the
    /// asset disabled, so a feed change always requires an explicit
    /// `enable_payment_token`.
    pub fn register_payment_token(env: Env, caller: Address, token: Address, feed: Address) {
        ownable::require_owner(&env, &caller);
        storage::save_payment_asset(
            &env,
            &token,
            &PaymentAsset {
                active: false,
                feed: feed.clone(),
            },
        );
        events::emit_payment_token_registered(&env, token, feed);
    }

    /// Accept `token` for purchases.
    ///
    /// Panics with `Error::AlreadyEnabled` when the asset is already active
    /// or was never registered.
    pub fn enable_payment_token(env: Env, caller: Address, token: Address) {
        ownable::require_owner(&env, &caller);
        match storage::load_payment_asset(&env, &token) {
            Some(mut asset) if !asset.active => {
                asset.active = true;
                storage::save_payment_asset(&env, &token, &asset);
                events::emit_payment_token_enabled(&env, token);
            }
            _ => panic_with_error!(&env, Error::AlreadyEnabled),
        }
    }

    /// Stop accepting `token` for purchases.
    ///
    /// Panics with `Error::AlreadyDisabled` when the asset is already
    /// inactive or was never registered.
    pub fn disable_payment_token(env: Env, caller: Address, token: Address) {
        ownable::require_owner(&env, &caller);
        match storage::load_payment_asset(&env, &token) {
            Some(mut asset) if asset.active => {
                asset.active = false;
                storage::save_payment_asset(&env, &token, &asset);
                events::emit_payment_token_disabled(&env, token);
            }
            _ => panic_with_error!(&env, Error::AlreadyDisabled),
        }
    }

    /// Return `true` iff `token` is registered and currently accepted.
    pub fn is_payment_token_accepted(env: Env, token: Address) -> bool {
        storage::load_payment_asset(&env, &token)
            .map(|asset| asset.active)
            .unwrap_or(false)
    }

    // ─────────────────────────────────────────────────────────
    // Stage ledger
    // ─────────────────────────────────────────────────────────

    /// Append a sale stage with the given exchange rate and token cap.
    ///
    /// - `rate` is the sale-token amount credited per whole unit of
    ///   reference currency; must be positive.
    /// - `cap` bounds the tokens sellable in the stage; must be positive.
    /// - Blocked once the sale is finalized.
    pub fn add_stage(env: Env, caller: Address, rate: i128, cap: i128) -> u32 {
        ownable::require_owner(&env, &caller);
        let state = load_state(&env);
        if state.finalized {
            panic_with_error!(&env, Error::AlreadyFinalized);
        }
        if rate <= 0 {
            panic_with_error!(&env, Error::NonPositiveRate);
        }
        if cap <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        let index = storage::push_stage(&env, &SaleStage { rate, cap, sold: 0 });
        events::emit_stage_added(&env, index, rate, cap);
        index
    }

    /// Force advancement to the next stage regardless of remaining capacity.
    ///
    /// Panics with `Error::FinalStageReached` when the active stage is the
    /// last one.
    pub fn advance_stage(env: Env, caller: Address) {
        ownable::require_owner(&env, &caller);
        let mut state = load_state(&env);
        if state.finalized {
            panic_with_error!(&env, Error::AlreadyFinalized);
        }
        let next = state.current_stage + 1;
        if next >= storage::stage_count(&env) {
            panic_with_error!(&env, Error::FinalStageReached);
        }
        state.current_stage = next;
        save_state(&env, &state);
        events::emit_stage_advanced(&env, next);
    }

    /// Return the stage at `index`.
    pub fn get_stage(env: Env, index: u32) -> SaleStage {
        match storage::load_stage(&env, index) {
            Some(stage) => stage,
            None => panic_with_error!(&env, Error::NoActiveStage),
        }
    }

    /// Number of stages appended so far.
    pub fn stage_count(env: Env) -> u32 {
        storage::stage_count(&env)
    }

    /// Exchange rate of the active stage.
    ///
    /// Panics with `Error::NoActiveStage` when no stages exist or the
    /// active stage carries a zero rate.
    pub fn current_rate(env: Env) -> i128 {
        let state = load_state(&env);
        Self::active_stage(&env, &state).rate
    }

    // ─────────────────────────────────────────────────────────
    // Purchasing
    // ─────────────────────────────────────────────────────────

    /// Purchase tokens with the chain's native token.
    ///
    /// The payment is priced through the feed configured at `init` and
    /// settles to the treasury; tokens are released from the contract's
    /// inventory in the same invocation.
    pub fn buy_with_native(env: Env, buyer: Address, amount: i128) {
        buyer.require_auth();
        let config = load_config(&env);
        Self::execute_purchase(
            &env,
            &config,
            buyer,
            config.native_token.clone(),
            config.native_feed.clone(),
            amount,
        );
    }

    /// Purchase tokens with an approved payment asset.
    ///
    /// The asset must be registered and enabled; it is priced through its
    /// registered feed.
    pub fn buy_with_token(env: Env, buyer: Address, pay_token: Address, amount: i128) {
        buyer.require_auth();
        let asset = match storage::load_payment_asset(&env, &pay_token) {
            Some(asset) if asset.active => asset,
            _ => panic_with_error!(&env, Error::PaymentNotAccepted),
        };
        let config = load_config(&env);
        Self::execute_purchase(&env, &config, buyer, pay_token, asset.feed, amount);
    }

    /// Cumulative tokens purchased by `buyer` across the whole sale.
    pub fn get_purchased(env: Env, buyer: Address) -> i128 {
        storage::load_purchased(&env, &buyer)
    }

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────

    /// Pause purchasing. Owner-only; rejected once finalized.
    pub fn pause(env: Env, caller: Address) {
        ownable::require_owner(&env, &caller);
        let mut state = load_state(&env);
        if state.finalized {
            panic_with_error!(&env, Error::AlreadyFinalized);
        }
        state.paused = true;
        save_state(&env, &state);
        events::emit_sale_paused(&env, caller);
    }

    /// Resume purchasing. Owner-only; rejected once finalized.
    pub fn unpause(env: Env, caller: Address) {
        ownable::require_owner(&env, &caller);
        let mut state = load_state(&env);
        if state.finalized {
            panic_with_error!(&env, Error::AlreadyFinalized);
        }
        state.paused = false;
        save_state(&env, &state);
        events::emit_sale_unpaused(&env, caller);
    }

    /// Return true if purchasing is paused.
    pub fn is_paused(env: Env) -> bool {
        load_state(&env).paused
    }

    /// Finalize the sale. Terminal: no purchase or stage/end-time/limit
    /// mutation succeeds afterwards. A second call panics with
    /// `Error::AlreadyFinalized` rather than passing silently.
    ///
    /// Also triggered automatically when the last stage fills.
    pub fn finalize(env: Env, caller: Address) {
        ownable::require_owner(&env, &caller);
        let mut state = load_state(&env);
        if state.finalized {
            panic_with_error!(&env, Error::AlreadyFinalized);
        }
        state.finalized = true;
        save_state(&env, &state);
        events::emit_sale_finalized(&env, state.total_raised, state.total_tokens_sold);
    }

    /// Move the closing timestamp of the sale window.
    ///
    /// - `new_end` must lie in the future (`Error::PastTimestamp`) and
    ///   after the start time (`Error::BeforeStart`).
    /// - Blocked once finalized.
    pub fn update_end_time(env: Env, caller: Address, new_end: u64) {
        ownable::require_owner(&env, &caller);
        let config = load_config(&env);
        let mut state = load_state(&env);
        if state.finalized {
            panic_with_error!(&env, Error::AlreadyFinalized);
        }
        if new_end <= env.ledger().timestamp() {
            panic_with_error!(&env, Error::PastTimestamp);
        }
        if new_end <= config.start_time {
            panic_with_error!(&env, Error::BeforeStart);
        }
        state.end_time = new_end;
        save_state(&env, &state);
        events::emit_end_time_updated(&env, new_end);
    }

    /// Change the per-address purchase limit.
    ///
    /// Takes effect for subsequent purchases only; existing purchaser
    /// records are never reduced. Blocked once finalized.
    pub fn update_max_purchase(env: Env, caller: Address, limit: i128) {
        ownable::require_owner(&env, &caller);
        let mut state = load_state(&env);
        if state.finalized {
            panic_with_error!(&env, Error::AlreadyFinalized);
        }
        if limit <= 0 {
            panic_with_error!(&env, Error::InvalidAmount);
        }
        state.max_purchase = limit;
        save_state(&env, &state);
        events::emit_max_purchase_updated(&env, limit);
    }

    // ─────────────────────────────────────────────────────────
    // Recovery
    // ─────────────────────────────────────────────────────────

    /// Sweep the contract's full native-token balance to `to`.
    pub fn withdraw_native(env: Env, caller: Address, to: Address) {
        ownable::require_owner(&env, &caller);
        let config = load_config(&env);
        Self::sweep(&env, config.native_token, to);
    }

    /// Sweep the contract's full balance of `token` to `to`.
    ///
    /// Covers stray transfers in any lifecycle state and the unsold
    /// sale-token inventory after finalization.
    pub fn withdraw_token(env: Env, caller: Address, token: Address, to: Address) {
        ownable::require_owner(&env, &caller);
        Self::sweep(&env, token, to);
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Full view of the sale, reconstructed from config and state.
    pub fn get_sale(env: Env) -> Sale {
        let config = load_config(&env);
        let state = load_state(&env);
        Sale {
            sale_token: config.sale_token,
            treasury: config.treasury,
            native_token: config.native_token,
            native_feed: config.native_feed,
            start_time: config.start_time,
            end_time: state.end_time,
            paused: state.paused,
            finalized: state.finalized,
            current_stage: state.current_stage,
            total_raised: state.total_raised,
            total_tokens_sold: state.total_tokens_sold,
            max_purchase: state.max_purchase,
            stage_count: storage::stage_count(&env),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Purchase engine (internal)
    // ─────────────────────────────────────────────────────────

    /// Run one purchase end to end.
    ///
    /// Validation happens before any external call; payment settlement
    /// precedes token release; the mutual-exclusion flag is held across
    /// both external transfers and cleared only after state is final. A
    /// panic anywhere traps the invocation and discards every write.
    fn execute_purchase(
        env: &Env,
        config: &SaleConfig,
        buyer: Address,
        pay_token: Address,
        feed: Address,
        amount: i128,
    ) {
        if storage::is_locked(env) {
            panic_with_error!(env, Error::ReentrantCall);
        }
        storage::set_locked(env);

        let mut state = load_state(env);
        if state.finalized {
            panic_with_error!(env, Error::AlreadyFinalized);
        }
        if state.paused {
            panic_with_error!(env, Error::SalePaused);
        }
        let now = env.ledger().timestamp();
        if now < config.start_time {
            panic_with_error!(env, Error::SaleNotStarted);
        }
        if now > state.end_time {
            panic_with_error!(env, Error::SaleEnded);
        }
        if amount <= 0 {
            panic_with_error!(env, Error::InvalidAmount);
        }

        let stage_index = state.current_stage;
        let mut stage = Self::active_stage(env, &state);

        let price = match oracle::fetch_price(env, &feed, &pay_token) {
            Some(price) => price,
            None => panic_with_error!(env, Error::StaleOrInvalidPrice),
        };

        // usd_amount = amount * price / 10^ORACLE_DECIMALS, truncating.
        let usd_amount = match amount
            .checked_mul(price)
            .and_then(|v| v.checked_div(PRICE_SCALE))
        {
            Some(usd) => usd,
            None => panic_with_error!(env, Error::Overflow),
        };
        let token_amount = match usd_amount.checked_mul(stage.rate) {
            Some(tokens) => tokens,
            None => panic_with_error!(env, Error::Overflow),
        };
        if token_amount <= 0 {
            panic_with_error!(env, Error::AmountTooSmall);
        }

        // Stage capacity is validated here, in the same invocation that
        // records the sale below.
        let new_sold = match stage.sold.checked_add(token_amount) {
            Some(sold) => sold,
            None => panic_with_error!(env, Error::Overflow),
        };
        if new_sold > stage.cap {
            panic_with_error!(env, Error::StageCapExceeded);
        }

        let sale_token = token::Client::new(env, &config.sale_token);
        let inventory = sale_token.balance(&env.current_contract_address());
        if inventory < token_amount {
            panic_with_error!(env, Error::InsufficientSupply);
        }

        let purchased = storage::load_purchased(env, &buyer);
        let new_purchased = match purchased.checked_add(token_amount) {
            Some(total) => total,
            None => panic_with_error!(env, Error::Overflow),
        };
        if new_purchased > state.max_purchase {
            panic_with_error!(env, Error::LimitExceeded);
        }

        // Settle the payment to the treasury before releasing anything.
        let pay_client = token::Client::new(env, &pay_token);
        pay_client.transfer(&buyer, &config.treasury, &amount);

        state.total_raised = match state.total_raised.checked_add(usd_amount) {
            Some(total) => total,
            None => panic_with_error!(env, Error::Overflow),
        };
        state.total_tokens_sold = match state.total_tokens_sold.checked_add(token_amount) {
            Some(total) => total,
            None => panic_with_error!(env, Error::Overflow),
        };
        stage.sold = new_sold;
        storage::save_stage(env, stage_index, &stage);
        storage::save_purchased(env, &buyer, new_purchased);

        // Release tokens from the contract's inventory.
        sale_token.transfer(&env.current_contract_address(), &buyer, &token_amount);

        Self::try_advance(env, &mut state, &stage);
        save_state(env, &state);

        events::emit_tokens_purchased(env, buyer, pay_token, usd_amount, token_amount);
        storage::clear_locked(env);
    }

    /// Advance the stage pointer when the active stage has filled.
    ///
    /// Moves forward by exactly one stage per call; filling the last stage
    /// finalizes the sale instead.
    fn try_advance(env: &Env, state: &mut SaleState, stage: &SaleStage) {
        if !stage.is_full() {
            return;
        }
        let next = state.current_stage + 1;
        if next < storage::stage_count(env) {
            state.current_stage = next;
            events::emit_stage_advanced(env, next);
        } else {
            state.finalized = true;
            events::emit_sale_finalized(env, state.total_raised, state.total_tokens_sold);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    /// Load the active stage, rejecting an empty ledger, an out-of-range
    /// stage pointer, and a zero rate alike.
    fn active_stage(env: &Env, state: &SaleState) -> SaleStage {
        match storage::load_stage(env, state.current_stage) {
            Some(stage) if stage.rate > 0 => stage,
            _ => panic_with_error!(env, Error::NoActiveStage),
        }
    }

    /// Transfer the contract's full balance of `token` to `to`.
    ///
    /// Holds the mutual-exclusion flag across the external transfer, like
    /// the purchase path.
    fn sweep(env: &Env, token: Address, to: Address) {
        if storage::is_locked(env) {
            panic_with_error!(env, Error::ReentrantCall);
        }
        storage::set_locked(env);
        let client = token::Client::new(env, &token);
        let balance = client.balance(&env.current_contract_address());
        if balance <= 0 {
            panic_with_error!(env, Error::InvalidAmount);
        }
        client.transfer(&env.current_contract_address(), &to, &balance);
        events::emit_funds_withdrawn(env, token, to, balance);
        storage::clear_locked(env);
    }
}
