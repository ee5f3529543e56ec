//! # Ownable — single-owner authorization
//!
//! Every administrative mutation on the sale is gated on one stored
//! principal. A caller proves control of its address through Soroban's
//! `require_auth`, and [`require_owner`] then compares that address against
//! the stored owner.
//!
//! ## Storage layout
//!
//! - `OwnerKey::Owner` → `Address` — the one and only owner.
//!
//! ## Event emissions
//!
//! | Event topic | Trigger |
//! |-------------|---------|
//! | `own_xfer`  | Ownership transferred |
//!
//! The owner can hand the sale over with [`transfer_ownership`]; the
//! previous owner loses all privileges immediately.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::Error;

// ─────────────────────────────────────────────────────────
// Storage keys
// ─────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OwnerKey {
    /// The one and only owner address.
    Owner,
}

// ─────────────────────────────────────────────────────────
// Initialisation
// ─────────────────────────────────────────────────────────

/// Set the initial owner. Must be called exactly once (during contract
/// initialisation). Panics with `Error::AlreadyInitialized` if called again.
pub fn init_owner(env: &Env, owner: &Address) {
    if env.storage().instance().has(&OwnerKey::Owner) {
        panic_with_error_ownable(env, Error::AlreadyInitialized);
    }
    env.storage().instance().set(&OwnerKey::Owner, owner);
}

/// Read the owner address, returning `None` before init.
pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OwnerKey::Owner)
}

// ─────────────────────────────────────────────────────────
// Access guard (called from lib.rs handlers)
// ─────────────────────────────────────────────────────────

/// Assert that `caller` has authorized this invocation and is the stored
/// owner. Panics with `Error::NotAuthorized` on failure.
pub fn require_owner(env: &Env, caller: &Address) {
    caller.require_auth();
    match get_owner(env) {
        Some(ref owner) if owner == caller => {}
        _ => panic_with_error_ownable(env, Error::NotAuthorized),
    }
}

// ─────────────────────────────────────────────────────────
// Ownership transfer
// ─────────────────────────────────────────────────────────

/// Transfer ownership to `new_owner`.
///
/// - `current` must authorize and must be the stored owner.
/// - The previous owner loses all privileges immediately.
///
/// Emits an `own_xfer` event.
pub fn transfer_ownership(env: &Env, current: &Address, new_owner: &Address) {
    require_owner(env, current);
    env.storage().instance().set(&OwnerKey::Owner, new_owner);
    env.events().publish(
        (symbol_short!("own_xfer"), new_owner.clone()),
        current.clone(),
    );
}

/// Thin wrapper so we can call panic_with_error from inside ownable.rs
/// without importing the macro from the parent.
#[inline(always)]
fn panic_with_error_ownable(env: &Env, err: Error) -> ! {
    soroban_sdk::panic_with_error!(env, err)
}
