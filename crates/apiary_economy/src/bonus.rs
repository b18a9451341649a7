//! # Bonus Calculator
//!
//! Total bonus of an equipped configuration, in basis points:
//!
//! ```text
//! bonus = Σ item.bonus_percent_bp            (non-empty slots)
//!       + Σ set.set_bonus_percent_bp         (every completed set)
//! ```
//!
//! Sets stack additively when several are completed at once. There is no
//! upper clamp.

use crate::catalog::{Catalog, ItemArray, EMPTY_ITEM};

/// Item bonuses only. Unknown ids contribute nothing.
#[must_use]
pub fn item_bonus_percent_bp(catalog: &Catalog, items: &ItemArray) -> u32 {
    items
        .iter()
        .filter(|&&id| id != EMPTY_ITEM)
        .filter_map(|&id| catalog.item(id))
        .fold(0u32, |acc, item| acc.saturating_add(item.bonus_percent_bp))
}

/// Bonuses of every set `items` completes.
#[must_use]
pub fn set_bonus_percent_bp(catalog: &Catalog, items: &ItemArray) -> u32 {
    catalog
        .sets()
        .filter(|set| set.is_completed_by(items))
        .fold(0u32, |acc, set| acc.saturating_add(set.set_bonus_percent_bp))
}

/// Item bonuses plus completed-set bonuses.
#[must_use]
pub fn calc_bonus_percent_bp(catalog: &Catalog, items: &ItemArray) -> u32 {
    item_bonus_percent_bp(catalog, items).saturating_add(set_bonus_percent_bp(catalog, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.save_set(1, 1000, [1, 2, 3, 4, 5, 6, 7], [100; 7]).unwrap();
        catalog.save_set(2, 300, [1, 0, 0, 0, 0, 0, 0], [100; 7]).unwrap();
        catalog.save_set(3, 50, [0, 0, 0, 0, 0, 0, 8], [25; 7]).unwrap();
        catalog
    }

    #[test]
    fn test_no_items() {
        assert_eq!(calc_bonus_percent_bp(&catalog(), &[0; 7]), 0);
    }

    #[test]
    fn test_items_only() {
        // item 2 alone completes no set
        assert_eq!(calc_bonus_percent_bp(&catalog(), &[0, 2, 3, 0, 0, 0, 0]), 200);
    }

    #[test]
    fn test_sets_stack() {
        let catalog = catalog();
        // full set 1 + single-item set 2
        let items = [1, 2, 3, 4, 5, 6, 7];
        assert_eq!(item_bonus_percent_bp(&catalog, &items), 700);
        assert_eq!(set_bonus_percent_bp(&catalog, &items), 1300);
        assert_eq!(calc_bonus_percent_bp(&catalog, &items), 2000);
    }

    #[test]
    fn test_breaking_one_slot_removes_only_that_set() {
        let catalog = catalog();
        let complete = calc_bonus_percent_bp(&catalog, &[1, 2, 3, 4, 5, 6, 7]);
        let broken = calc_bonus_percent_bp(&catalog, &[1, 2, 3, 4, 5, 6, 8]);
        // item 7 (100) swapped for item 8 (25) completing set 3 (50); set 1 (1000) lost
        assert_eq!(complete - broken, 1000 + 100 - 25 - 50);
        assert_eq!(set_bonus_percent_bp(&catalog, &[1, 2, 3, 4, 5, 6, 8]), 300 + 50);
    }

    #[test]
    fn test_unknown_items_ignored() {
        assert_eq!(calc_bonus_percent_bp(&catalog(), &[0, 0, 99, 0, 0, 0, 0]), 0);
    }

    #[test]
    fn test_no_clamp() {
        let mut catalog = Catalog::default();
        catalog.save_set(1, 30_000, [1, 0, 0, 0, 0, 0, 0], [20_000; 7]).unwrap();
        assert_eq!(calc_bonus_percent_bp(&catalog, &[1, 0, 0, 0, 0, 0, 0]), 50_000);
    }
}
