//! # Item Equip Engine
//!
//! **Full-replace diff with all-or-nothing semantics**
//!
//! The caller sends the complete target configuration (one item id per bee
//! slot, 0 = unequip). The engine compares it to what is equipped and
//! reports, per slot:
//!
//! ```text
//! target == current        -> nothing
//! target == 0              -> released[i] = current
//! target != current, != 0  -> acquired[i] = target, released[i] = current (if any)
//! ```
//!
//! Every slot is validated before the first write. The engine never moves
//! items itself: `released` goes back to the owner, `acquired` is taken from
//! the owner, both by the custody layer.

use crate::apiary::Apiary;
use crate::bee::BeeSlot;
use crate::catalog::{Catalog, ItemArray, ItemId, EMPTY_ITEM};
use crate::error::{LandError, LandResult};

/// What the custody layer must move after a `set_items`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EquipDiff {
    /// Items taken off, per slot (0 = nothing released there).
    pub released: ItemArray,
    /// Items put on, per slot (0 = nothing acquired there).
    pub acquired: ItemArray,
}

impl EquipDiff {
    /// True if nothing has to move.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.released.iter().chain(&self.acquired).all(|&id| id == EMPTY_ITEM)
    }

    /// Non-zero released ids.
    pub fn released_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.released.iter().copied().filter(|&id| id != EMPTY_ITEM)
    }

    /// Non-zero acquired ids.
    pub fn acquired_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.acquired.iter().copied().filter(|&id| id != EMPTY_ITEM)
    }
}

/// Computes the diff without touching the apiary.
///
/// # Errors
///
/// - `ItemNotFound` if a target id is not in the catalog
/// - `BeeDoesNotSupportItem` if the item fits another slot, or the slot has
///   no bees
pub fn plan_items(apiary: &Apiary, catalog: &Catalog, target: &ItemArray) -> LandResult<EquipDiff> {
    let mut diff = EquipDiff::default();

    for slot in BeeSlot::ALL {
        let i = slot.index();
        let current = apiary.items[i];
        let wanted = target[i];

        if wanted == current {
            continue;
        }

        if wanted != EMPTY_ITEM {
            let item = catalog.item(wanted).ok_or(LandError::ItemNotFound(wanted))?;
            if item.supports != slot || apiary.bees[i] == 0 {
                return Err(LandError::BeeDoesNotSupportItem { slot, item_id: wanted });
            }
            diff.acquired[i] = wanted;
        }

        diff.released[i] = current;
    }

    Ok(diff)
}

/// Validates and applies a target configuration atomically.
///
/// Applying the current configuration is a no-op returning an empty diff.
///
/// # Errors
///
/// Same as [`plan_items`]; the apiary is untouched on error.
pub fn set_items(apiary: &mut Apiary, catalog: &Catalog, target: &ItemArray) -> LandResult<EquipDiff> {
    let diff = plan_items(apiary, catalog, target)?;
    apiary.items = *target;
    Ok(diff)
}
