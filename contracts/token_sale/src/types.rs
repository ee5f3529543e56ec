//! # Types
//!
//! Shared data structures used across all modules of the token sale.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! The sale is internally stored as two separate ledger entries:
//!
//! - [`SaleConfig`] — written once at initialisation; never mutated.
//! - [`SaleState`] — written on every purchase and on administrative updates.
//!
//! The public API exposes the reconstructed [`Sale`] struct for convenience.
//!
//! ### Lifecycle as a Finite-State Machine
//!
//! The sale enforces a strict forward-only lifecycle:
//!
//! ```text
//! Pending ──► Open ◄──► Paused
//!               │          │
//!               └──────────┴──► Finalized
//! ```
//!
//! `Pending`/`Open` are derived from the time window; `Paused` and
//! `Finalized` are explicit flags on [`SaleState`]. Once `finalized` is set
//! it never reverts, and every purchase or configuration mutation is
//! rejected from that point on.

use soroban_sdk::{contracttype, Address};

/// One sale stage: a contiguous phase with a fixed exchange rate and a cap
/// on the tokens it may sell.
///
/// Stages are append-only and immutable after creation except for `sold`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleStage {
    /// Sale-token units credited per whole unit of reference currency.
    pub rate: i128,
    /// Maximum tokens sellable in this stage.
    pub cap: i128,
    /// Tokens sold so far in this stage. Always `0 <= sold <= cap`.
    pub sold: i128,
}

impl SaleStage {
    /// True once the stage has sold out.
    pub fn is_full(&self) -> bool {
        self.sold >= self.cap
    }
}

/// An external payment asset accepted by the sale.
///
/// Every record carries the price-feed contract that quotes the asset, so
/// an `active` asset always has a feed to price against.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentAsset {
    /// Whether the asset is currently accepted for purchases.
    pub active: bool,
    /// Price-feed contract quoting this asset in the reference currency.
    pub feed: Address,
}

/// Immutable sale configuration, written once at initialisation.
///
/// Stored separately from mutable state so that purchases only rewrite the
/// small [`SaleState`] entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    /// Token being sold; released from the contract's own balance.
    pub sale_token: Address,
    /// Recipient of all settled payments.
    pub treasury: Address,
    /// The chain's native token, used by the native purchase path.
    pub native_token: Address,
    /// Price feed quoting the native token.
    pub native_feed: Address,
    /// Ledger timestamp at which purchases open.
    pub start_time: u64,
}

/// Mutable sale state, updated on purchases and administrative changes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleState {
    /// Ledger timestamp after which purchases are rejected. Always greater
    /// than `SaleConfig::start_time`.
    pub end_time: u64,
    /// Owner-toggled pause flag.
    pub paused: bool,
    /// Terminal flag; never reverts to `false` once set.
    pub finalized: bool,
    /// Index of the active stage. Strictly non-decreasing.
    pub current_stage: u32,
    /// Cumulative reference-currency value of all settled purchases.
    pub total_raised: i128,
    /// Cumulative tokens released across all stages.
    pub total_tokens_sold: i128,
    /// Maximum cumulative tokens a single buyer may acquire.
    pub max_purchase: i128,
}

/// Full view of the sale — returned by `get_sale`.
///
/// Reconstructed from the split `SaleConfig` + `SaleState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sale {
    pub sale_token: Address,
    pub treasury: Address,
    pub native_token: Address,
    pub native_feed: Address,
    pub start_time: u64,
    pub end_time: u64,
    pub paused: bool,
    pub finalized: bool,
    pub current_stage: u32,
    pub total_raised: i128,
    pub total_tokens_sold: i128,
    pub max_purchase: i128,
    /// Number of stages appended so far.
    pub stage_count: u32,
}
