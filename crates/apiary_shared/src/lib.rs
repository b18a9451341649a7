//! # Apiary Shared
//!
//! Constants and identity types used by every consumer of the apiary ledger.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER contain engine logic. If it mutates an apiary or
//! reads the catalog, it belongs in `apiary_economy`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;

pub use alloy_primitives::Address;
pub use constants::{
    BASIS_POINTS, BEE_TYPES, DEFAULT_MOOD_RECOVERY_TIME, DEFAULT_SLOTS, MAX_MOOD, MIN_MOOD,
    SECONDS_PER_DAY,
};

/// Account identity of an apiary owner or a caller.
pub type AccountId = Address;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Returns true if the account is the zero identity ("no account").
#[inline]
#[must_use]
pub fn is_zero_account(account: &AccountId) -> bool {
    account.is_zero()
}
