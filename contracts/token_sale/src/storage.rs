//! # Storage
//!
//! Typed helpers over Soroban's storage tiers used by the sale:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key          | Type         | Description                         |
//! |--------------|--------------|-------------------------------------|
//! | `Config`     | `SaleConfig` | Immutable sale configuration        |
//! | `State`      | `SaleState`  | Mutable sale counters and flags     |
//! | `StageCount` | `u32`        | Number of stages appended so far    |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                     | Type           | Description                  |
//! |-------------------------|----------------|------------------------------|
//! | `Stage(index)`          | `SaleStage`    | One sale stage               |
//! | `PaymentAsset(token)`   | `PaymentAsset` | Accepted-asset registry entry|
//! | `Purchased(buyer)`      | `i128`         | Cumulative tokens per buyer  |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! ## Temporary storage
//!
//! | Key      | Type | Description                                        |
//! |----------|------|----------------------------------------------------|
//! | `Locked` | `()` | Mutual-exclusion flag held across external calls   |
//!
//! ## Why split Config and State?
//!
//! Purchases are high-frequency writes. `SaleState` holds only the counters
//! and flags a purchase touches, so the immutable addresses in `SaleConfig`
//! are never rewritten after initialisation.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{PaymentAsset, SaleConfig, SaleStage, SaleState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
///
/// Instance-tier keys (`Config`, `State`, `StageCount`) live as long as the
/// contract and are extended together. Persistent-tier keys (`Stage`,
/// `PaymentAsset`, `Purchased`) hold per-stage and per-address data with
/// independent TTLs. `Locked` lives in temporary storage and only ever
/// exists for the duration of a single purchase invocation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable sale configuration (Instance).
    Config,
    /// Mutable sale state (Instance).
    State,
    /// Number of stages appended so far (Instance).
    StageCount,
    /// One sale stage keyed by index (Persistent).
    Stage(u32),
    /// Accepted payment asset keyed by token address (Persistent).
    PaymentAsset(Address),
    /// Cumulative tokens purchased keyed by buyer address (Persistent).
    Purchased(Address),
    /// Re-entrancy flag (Temporary).
    Locked,
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// True once `init` has stored the sale configuration.
pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

/// Store the immutable sale configuration. Written exactly once.
pub fn save_config(env: &Env, config: &SaleConfig) {
    bump_instance(env);
    env.storage().instance().set(&DataKey::Config, config);
}

/// Load the immutable sale configuration.
/// Panics if the contract has not been initialised.
pub fn load_config(env: &Env) -> SaleConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("sale not initialized")
}

/// Store the mutable sale state.
pub fn save_state(env: &Env, state: &SaleState) {
    bump_instance(env);
    env.storage().instance().set(&DataKey::State, state);
}

/// Load the mutable sale state.
/// Panics if the contract has not been initialised.
pub fn load_state(env: &Env) -> SaleState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .expect("sale not initialized")
}

// ─────────────────────────────────────────────────────────
// Stage ledger
// ─────────────────────────────────────────────────────────

/// Number of stages appended so far.
pub fn stage_count(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::StageCount)
        .unwrap_or(0)
}

/// Append a stage and return its index.
pub fn push_stage(env: &Env, stage: &SaleStage) -> u32 {
    let index = stage_count(env);
    let key = DataKey::Stage(index);
    env.storage().persistent().set(&key, stage);
    bump_persistent(env, &key);
    env.storage()
        .instance()
        .set(&DataKey::StageCount, &(index + 1));
    index
}

/// Load the stage at `index`, or `None` when `index` is out of range.
///
/// Every stage read goes through this bounds check so that a bad
/// `current_stage` can never index past the end of the ledger.
pub fn load_stage(env: &Env, index: u32) -> Option<SaleStage> {
    if index >= stage_count(env) {
        return None;
    }
    let key = DataKey::Stage(index);
    let stage = env.storage().persistent().get(&key);
    if stage.is_some() {
        bump_persistent(env, &key);
    }
    stage
}

/// Overwrite the stage at `index`. The index must already exist.
pub fn save_stage(env: &Env, index: u32, stage: &SaleStage) {
    let key = DataKey::Stage(index);
    env.storage().persistent().set(&key, stage);
    bump_persistent(env, &key);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ─────────────────────────────────────────────────────────
// Payment-asset registry
// ─────────────────────────────────────────────────────────

/// Load the registry entry for `token`, if any.
pub fn load_payment_asset(env: &Env, token: &Address) -> Option<PaymentAsset> {
    let key = DataKey::PaymentAsset(token.clone());
    let asset: Option<PaymentAsset> = env.storage().persistent().get(&key);
    if asset.is_some() {
        bump_persistent(env, &key);
    }
    asset
}

/// Store (or overwrite) the registry entry for `token`.
pub fn save_payment_asset(env: &Env, token: &Address, asset: &PaymentAsset) {
    let key = DataKey::PaymentAsset(token.clone());
    env.storage().persistent().set(&key, asset);
    bump_persistent(env, &key);
}

// ─────────────────────────────────────────────────────────
// Purchaser records
// ─────────────────────────────────────────────────────────

/// Cumulative tokens purchased by `buyer`. Defaults to 0.
pub fn load_purchased(env: &Env, buyer: &Address) -> i128 {
    let key = DataKey::Purchased(buyer.clone());
    let purchased = env.storage().persistent().get(&key).unwrap_or(0);
    bump_persistent(env, &key);
    purchased
}

/// Store the cumulative tokens purchased by `buyer`.
pub fn save_purchased(env: &Env, buyer: &Address, purchased: i128) {
    let key = DataKey::Purchased(buyer.clone());
    env.storage().persistent().set(&key, &purchased);
    bump_persistent(env, &key);
}

// ─────────────────────────────────────────────────────────
// Re-entrancy flag
// ─────────────────────────────────────────────────────────

/// True while a purchase holds the mutual-exclusion flag.
pub fn is_locked(env: &Env) -> bool {
    env.storage().temporary().has(&DataKey::Locked)
}

/// Set the mutual-exclusion flag. The caller must have checked `is_locked`.
pub fn set_locked(env: &Env) {
    env.storage().temporary().set(&DataKey::Locked, &());
}

/// Clear the mutual-exclusion flag on the success path. A trap anywhere
/// discards the flag together with every other write of the transaction.
pub fn clear_locked(env: &Env) {
    env.storage().temporary().remove(&DataKey::Locked);
}
