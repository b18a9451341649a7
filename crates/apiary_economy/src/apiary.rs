//! # Apiary Record
//!
//! One record per owning account. The store hands out clones; the record
//! only changes through the capacity, equip and claim operations.

use apiary_shared::{AccountId, Timestamp};

use crate::bee::{BeeArray, BeeSlot};
use crate::catalog::{Catalog, ItemArray, EMPTY_ITEM};
use crate::error::{LandError, LandResult};

/// Per-account economic entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Apiary {
    pub(crate) owner: AccountId,
    pub(crate) bees: BeeArray<u32>,
    pub(crate) items: ItemArray,
    pub(crate) slots: u32,
    pub(crate) last_claim_timestamp: Timestamp,
    pub(crate) created_at: Timestamp,
}

impl Apiary {
    /// Creates a fresh apiary: no bees, no items, `slots` capacity.
    #[must_use]
    pub const fn new(owner: AccountId, slots: u32, now: Timestamp) -> Self {
        Self {
            owner,
            bees: [0; apiary_shared::BEE_TYPES],
            items: [EMPTY_ITEM; apiary_shared::BEE_TYPES],
            slots,
            last_claim_timestamp: now,
            created_at: now,
        }
    }

    /// Owner account. Zero means "not created".
    #[inline]
    #[must_use]
    pub const fn owner(&self) -> AccountId {
        self.owner
    }

    /// Bee count per slot.
    #[inline]
    #[must_use]
    pub const fn bees(&self) -> &BeeArray<u32> {
        &self.bees
    }

    /// Bee count of one slot.
    #[inline]
    #[must_use]
    pub const fn bee_count(&self, slot: BeeSlot) -> u32 {
        self.bees[slot.index()]
    }

    /// Equipped item per slot.
    #[inline]
    #[must_use]
    pub const fn items(&self) -> &ItemArray {
        &self.items
    }

    /// Total slot capacity.
    #[inline]
    #[must_use]
    pub const fn slots(&self) -> u32 {
        self.slots
    }

    /// Timestamp of the last claim (creation time until the first claim).
    #[inline]
    #[must_use]
    pub const fn last_claim_timestamp(&self) -> Timestamp {
        self.last_claim_timestamp
    }

    /// Creation timestamp.
    #[inline]
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// True unless the owner is the zero identity.
    #[inline]
    #[must_use]
    pub fn is_created(&self) -> bool {
        !apiary_shared::is_zero_account(&self.owner)
    }

    /// Number of slots with an item equipped.
    #[must_use]
    pub fn equipped_count(&self) -> usize {
        self.items.iter().filter(|&&id| id != EMPTY_ITEM).count()
    }

    /// Slots occupied by bees: `Σ bees[i] * slot_cost[i]`.
    #[must_use]
    pub fn used_slots(&self, catalog: &Catalog) -> u64 {
        BeeSlot::ALL.iter().fold(0u64, |used, &slot| {
            let cost = u64::from(catalog.bee(slot).slot_cost);
            used.saturating_add(u64::from(self.bees[slot.index()]).saturating_mul(cost))
        })
    }

    /// Checks every record invariant against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a `LandError`.
    pub fn check_invariants(&self, catalog: &Catalog) -> LandResult<()> {
        if !self.is_created() {
            return Err(LandError::ApiaryNotFound(self.owner));
        }

        let used = self.used_slots(catalog);
        if used > u64::from(self.slots) {
            return Err(LandError::InsufficientSlots {
                required: used,
                available: self.slots,
            });
        }

        for slot in BeeSlot::ALL {
            let item_id = self.items[slot.index()];
            if item_id == EMPTY_ITEM {
                continue;
            }
            let item = catalog.item(item_id).ok_or(LandError::ItemNotFound(item_id))?;
            if item.supports != slot || self.bees[slot.index()] == 0 {
                return Err(LandError::BeeDoesNotSupportItem { slot, item_id });
            }
        }

        if self.last_claim_timestamp < self.created_at {
            return Err(LandError::InvalidInput(format!(
                "last claim {} precedes creation {}",
                self.last_claim_timestamp, self.created_at
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_apiary() {
        let owner = AccountId::repeat_byte(1);
        let apiary = Apiary::new(owner, 10, 1_000);
        assert!(apiary.is_created());
        assert_eq!(apiary.bees(), &[0; 7]);
        assert_eq!(apiary.items(), &[0; 7]);
        assert_eq!(apiary.last_claim_timestamp(), apiary.created_at());
        assert!(apiary.check_invariants(&Catalog::default()).is_ok());
    }

    #[test]
    fn test_used_slots() {
        let catalog = Catalog::default();
        let mut apiary = Apiary::new(AccountId::repeat_byte(1), 100, 0);
        apiary.bees = [2, 0, 1, 0, 0, 0, 3];
        // slot costs are 1..=7
        assert_eq!(apiary.used_slots(&catalog), 2 + 3 + 21);
    }

    #[test]
    fn test_invariant_violations() {
        let catalog = Catalog::default();

        let zero = Apiary::new(AccountId::ZERO, 10, 0);
        assert!(matches!(zero.check_invariants(&catalog), Err(LandError::ApiaryNotFound(_))));

        let mut crowded = Apiary::new(AccountId::repeat_byte(1), 1, 0);
        crowded.bees[1] = 1;
        assert!(matches!(
            crowded.check_invariants(&catalog),
            Err(LandError::InsufficientSlots { required: 2, available: 1 })
        ));

        let mut dangling = Apiary::new(AccountId::repeat_byte(1), 10, 0);
        dangling.items[0] = 77;
        assert_eq!(dangling.check_invariants(&catalog), Err(LandError::ItemNotFound(77)));
    }
}
