//! # Product Constants
//!
//! Values every apiary consumer must agree on.
//!
//! **CRITICAL:** Changing these changes the economy for every account.
//! Tunable values (profit rates, recovery time) live in the catalog config;
//! the ones here are the fallbacks and the fixed shape of the game.

// =============================================================================
// SHAPE
// =============================================================================

/// Number of bee types (and therefore bee slots, item slots).
pub const BEE_TYPES: usize = 7;

/// Slots granted to a freshly created apiary.
pub const DEFAULT_SLOTS: u32 = 10;

// =============================================================================
// ARITHMETIC
// =============================================================================

/// Basis-point denominator (10000 = 100%).
pub const BASIS_POINTS: u32 = 10_000;

/// Seconds in one accrual day.
pub const SECONDS_PER_DAY: u64 = 86_400;

// =============================================================================
// MOOD
// =============================================================================

/// Mood right after creation or a claim.
pub const MAX_MOOD: u32 = 10_000;

/// Mood once the recovery time has fully elapsed.
///
/// Mood never goes negative.
pub const MIN_MOOD: u32 = 0;

/// Default mood recovery time: one week.
pub const DEFAULT_MOOD_RECOVERY_TIME: u64 = 7 * SECONDS_PER_DAY;
