//! # Mood Engine
//!
//! Mood starts at `MAX_MOOD` right after a claim and decays linearly to
//! `MIN_MOOD` over the recovery time:
//!
//! ```text
//! mood = MAX - (MAX - MIN) * min(elapsed, T) / T
//! ```
//!
//! The recovery time is read from the catalog at call time, so an admin
//! change applies to every apiary immediately.

use apiary_shared::{Timestamp, MAX_MOOD, MIN_MOOD};

/// Seconds since `last_claim`, zero if the clock is behind.
#[inline]
#[must_use]
pub const fn elapsed_since(last_claim: Timestamp, now: Timestamp) -> u64 {
    now.saturating_sub(last_claim)
}

/// Mood at `now` for an apiary last claimed at `last_claim`.
///
/// A zero `recovery_time` yields `MIN_MOOD` for any positive elapsed time.
#[must_use]
pub fn mood_of(last_claim: Timestamp, now: Timestamp, recovery_time: u64) -> u32 {
    let elapsed = elapsed_since(last_claim, now);
    if elapsed == 0 {
        return MAX_MOOD;
    }
    if recovery_time == 0 || elapsed >= recovery_time {
        return MIN_MOOD;
    }

    let range = u128::from(MAX_MOOD - MIN_MOOD);
    let decay = range * u128::from(elapsed) / u128::from(recovery_time);
    // decay < range because elapsed < recovery_time
    MAX_MOOD - u32::try_from(decay).unwrap_or(MAX_MOOD - MIN_MOOD)
}
