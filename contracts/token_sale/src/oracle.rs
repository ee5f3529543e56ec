//! # Oracle
//!
//! Cross-contract client for the external price feeds that quote payment
//! assets in the reference currency.
//!
//! The feed interface is the single-read shape common to Soroban price
//! oracles:
//!
//! ```text
//! lastprice(asset: Address) -> Option<PriceData { price: i128, timestamp: u64 }>
//! decimals() -> u32
//! ```
//!
//! `#[contractclient]` generates the typed [`PriceFeedClient`] from the
//! trait at compile time. Every purchase re-queries the feed; nothing is
//! cached. The only validity gate applied here is positivity — a missing
//! report or `price <= 0` fails the purchase. Staleness detection is
//! delegated to the feed itself.

use soroban_sdk::{contractclient, contracttype, Address, Env};

/// Contract-wide price precision: every feed quote is rescaled to this many
/// decimal places before use. 1.0 == 100_000_000.
pub const ORACLE_DECIMALS: u32 = 8;

/// `10^ORACLE_DECIMALS`, the divisor applied when converting a payment
/// amount into reference-currency units.
pub const PRICE_SCALE: i128 = 100_000_000;

/// One price report as published by a feed contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    /// Quote in the reference currency, scaled by the feed's `decimals()`.
    pub price: i128,
    /// Ledger timestamp of the report.
    pub timestamp: u64,
}

/// Trait mirroring the on-chain price-feed public interface.
/// `contractclient` generates [`PriceFeedClient`] from this.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    /// Latest report for `asset`, or `None` when the feed has no quote.
    fn lastprice(env: Env, asset: Address) -> Option<PriceData>;

    /// Decimal places used by this feed's `price` values.
    fn decimals(env: Env) -> u32;
}

/// Fetch the current price of `asset` from the feed at `feed`, rescaled to
/// [`ORACLE_DECIMALS`] precision.
///
/// Returns `None` when the feed has no report, reports a non-positive
/// price, or the rescaling overflows. The caller maps `None` to its own
/// error and aborts.
pub fn fetch_price(env: &Env, feed: &Address, asset: &Address) -> Option<i128> {
    let client = PriceFeedClient::new(env, feed);
    let report = client.lastprice(asset)?;
    if report.price <= 0 {
        return None;
    }
    let feed_decimals = client.decimals();
    rescale(report.price, feed_decimals, ORACLE_DECIMALS)
}

/// Rescale `price` from `from` to `to` decimal places.
///
/// Scaling up multiplies by a power of ten (checked); scaling down divides,
/// truncating toward zero.
fn rescale(price: i128, from: u32, to: u32) -> Option<i128> {
    if from == to {
        return Some(price);
    }
    if from < to {
        let factor = pow10(to - from)?;
        price.checked_mul(factor)
    } else {
        let factor = pow10(from - to)?;
        price.checked_div(factor)
    }
}

fn pow10(exp: u32) -> Option<i128> {
    10i128.checked_pow(exp)
}
