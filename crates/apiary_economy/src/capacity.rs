//! # Capacity Manager
//!
//! Bees occupy slots: `Σ bees[i] * slot_cost[i] ≤ slots` must hold after
//! every mutation. Adding bees validates the new total against capacity
//! before anything is written.

use crate::apiary::Apiary;
use crate::bee::{BeeArray, BeeSlot};
use crate::catalog::Catalog;
use crate::error::{LandError, LandResult};

/// Converts parallel `(bee id, amount)` slices into per-slot deltas.
///
/// Duplicate ids accumulate. Ids with a zero amount are ignored, even if
/// unknown.
///
/// # Errors
///
/// - `InvalidInput` if the slices differ in length
/// - `UnknownBeeType` for an id outside `1..=7` with a non-zero amount
/// - `ArithmeticOverflow` if accumulated amounts overflow
pub fn bee_deltas(bee_ids: &[u32], amounts: &[u32]) -> LandResult<BeeArray<u32>> {
    if bee_ids.len() != amounts.len() {
        return Err(LandError::InvalidInput(format!(
            "{} bee ids but {} amounts",
            bee_ids.len(),
            amounts.len()
        )));
    }

    let mut deltas = [0u32; apiary_shared::BEE_TYPES];
    for (&bee_id, &amount) in bee_ids.iter().zip(amounts) {
        if amount == 0 {
            continue;
        }
        let slot = BeeSlot::from_bee_id(bee_id)?;
        deltas[slot.index()] = deltas[slot.index()]
            .checked_add(amount)
            .ok_or(LandError::ArithmeticOverflow)?;
    }
    Ok(deltas)
}

/// Adds bees to an apiary if they fit.
///
/// On success only `bees` changes. On failure the apiary is untouched.
///
/// # Errors
///
/// - `InsufficientSlots` if the new used-slot total exceeds capacity
/// - `ArithmeticOverflow` if a bee count would overflow
pub fn try_add_bees(apiary: &mut Apiary, catalog: &Catalog, deltas: &BeeArray<u32>) -> LandResult<()> {
    let added = BeeSlot::ALL.iter().fold(0u64, |acc, &slot| {
        let cost = u64::from(catalog.bee(slot).slot_cost);
        acc.saturating_add(u64::from(deltas[slot.index()]).saturating_mul(cost))
    });
    let required = apiary.used_slots(catalog).saturating_add(added);
    if required > u64::from(apiary.slots) {
        return Err(LandError::InsufficientSlots {
            required,
            available: apiary.slots,
        });
    }

    let mut bees = apiary.bees;
    for (count, &delta) in bees.iter_mut().zip(deltas) {
        *count = count.checked_add(delta).ok_or(LandError::ArithmeticOverflow)?;
    }
    apiary.bees = bees;
    Ok(())
}

/// Grants extra slot capacity. No upper bound beyond the integer width.
///
/// # Errors
///
/// Returns `ArithmeticOverflow` if the slot count would overflow.
pub fn add_slots(apiary: &mut Apiary, amount: u32) -> LandResult<()> {
    apiary.slots = apiary
        .slots
        .checked_add(amount)
        .ok_or(LandError::ArithmeticOverflow)?;
    Ok(())
}
