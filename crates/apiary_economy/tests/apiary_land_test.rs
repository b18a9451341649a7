//! Integration tests for the apiary store.

use apiary_economy::{
    AccountId, Amount, ApiaryLand, BeeSlot, Catalog, ErrorKind, LandError, LandEvent, Role, RoleRegistry,
};
use apiary_shared::{DEFAULT_MOOD_RECOVERY_TIME, DEFAULT_SLOTS, MAX_MOOD, MIN_MOOD, SECONDS_PER_DAY};
use std::sync::Arc;
use std::thread;

const DAY: u64 = SECONDS_PER_DAY;

fn admin() -> AccountId {
    AccountId::repeat_byte(0xAD)
}

fn owner() -> AccountId {
    AccountId::repeat_byte(0x01)
}

fn stranger() -> AccountId {
    AccountId::repeat_byte(0x03)
}

/// Store with the fallback catalog and one apiary owned by `owner()`.
fn land_with_apiary() -> ApiaryLand<RoleRegistry> {
    let land = ApiaryLand::new(RoleRegistry::with_admin(admin()), Catalog::default());
    land.create_apiary(&admin(), &owner(), 0).unwrap();
    land
}

/// Apiary with room for one bee of every type and set 1 (items 1..=7) saved.
fn equipped_fixture() -> ApiaryLand<RoleRegistry> {
    let land = land_with_apiary();
    land.add_slots(&admin(), &owner(), 100).unwrap();
    land.add_bees(&admin(), &owner(), &[1, 2, 3, 4, 5, 6, 7], &[1; 7]).unwrap();
    land.save_set(&admin(), 1, 10_000, [1, 2, 3, 4, 5, 6, 7], [1_000; 7]).unwrap();
    land.drain_events();
    land
}

// ============================================================================
// Lifecycle and permissions
// ============================================================================

#[test]
fn test_create_apiary() {
    let land = ApiaryLand::new(RoleRegistry::with_admin(admin()), Catalog::bundled().unwrap());
    assert!(land.get_apiary(&owner()).is_none());

    land.create_apiary(&admin(), &owner(), 42).unwrap();

    let apiary = land.get_apiary(&owner()).unwrap();
    assert_eq!(apiary.owner(), owner());
    assert_eq!(apiary.slots(), DEFAULT_SLOTS);
    assert_eq!(apiary.items(), &[0; 7]);
    assert_eq!(land.mood_recovery_time(), DEFAULT_MOOD_RECOVERY_TIME);
}

#[test]
fn test_create_requires_operator() {
    let land = land_with_apiary();
    let err = land.create_apiary(&stranger(), &stranger(), 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(land.get_apiary(&stranger()).is_none());
}

#[test]
fn test_create_twice_rejected() {
    let land = land_with_apiary();
    let err = land.create_apiary(&admin(), &owner(), 10).unwrap_err();
    assert_eq!(err, LandError::ApiaryAlreadyExists(owner()));
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[test]
fn test_minter_may_add_bees_and_slots_only() {
    let land = land_with_apiary();
    let minter = AccountId::repeat_byte(0x0E);
    land.access().grant(Role::Minter, minter);

    land.add_bees(&minter, &owner(), &[1], &[1]).unwrap();
    land.add_slots(&minter, &owner(), 5).unwrap();

    assert_eq!(land.set_items(&minter, &owner(), &[0; 7]).unwrap_err().kind(), ErrorKind::Unauthorized);
    assert_eq!(land.claim(&minter, &owner(), DAY).unwrap_err().kind(), ErrorKind::Unauthorized);
    assert_eq!(land.create_apiary(&minter, &minter, 0).unwrap_err().kind(), ErrorKind::Unauthorized);
}

#[test]
fn test_owner_alone_cannot_mutate() {
    let land = land_with_apiary();
    let err = land.add_bees(&owner(), &owner(), &[1], &[1]).unwrap_err();
    assert_eq!(err, LandError::Unauthorized { caller: owner(), action: "add_bees" });
    assert_eq!(land.add_slots(&owner(), &owner(), 10).unwrap_err().kind(), ErrorKind::Unauthorized);
}

#[test]
fn test_operations_on_missing_apiary() {
    let land = land_with_apiary();
    let missing = stranger();

    assert_eq!(land.add_bees(&admin(), &missing, &[1], &[2]), Err(LandError::ApiaryNotFound(missing)));
    assert_eq!(land.add_slots(&admin(), &missing, 10), Err(LandError::ApiaryNotFound(missing)));
    assert_eq!(land.set_items(&admin(), &missing, &[0; 7]), Err(LandError::ApiaryNotFound(missing)));
    assert_eq!(land.claim(&admin(), &missing, DAY), Err(LandError::ApiaryNotFound(missing)));
    assert_eq!(land.get_apiary_mood(&missing, 0).unwrap_err().kind(), ErrorKind::NotFound);
}

// ============================================================================
// Capacity
// ============================================================================

#[test]
fn test_add_bees_and_slots() {
    let land = land_with_apiary();
    land.add_bees(&admin(), &owner(), &[1], &[2]).unwrap();
    assert_eq!(land.get_apiary(&owner()).unwrap().bee_count(BeeSlot::Bee1), 2);

    land.add_slots(&admin(), &owner(), 100).unwrap();
    assert_eq!(land.get_apiary(&owner()).unwrap().slots(), DEFAULT_SLOTS + 100);

    let costs = land.get_bee_slot_costs();
    let before = land.get_used_slots(&owner()).unwrap();
    land.add_bees(&admin(), &owner(), &[1], &[2]).unwrap();
    assert_eq!(land.get_used_slots(&owner()).unwrap(), before + u64::from(costs[0]) * 2);
}

#[test]
fn test_not_enough_slots() {
    let land = land_with_apiary();
    land.add_slots(&admin(), &owner(), 100).unwrap();
    land.add_bees(&admin(), &owner(), &[1], &[4]).unwrap();
    let before = land.get_apiary(&owner()).unwrap();

    let err = land.add_bees(&admin(), &owner(), &[6], &[100]).unwrap_err();
    assert_eq!(err, LandError::InsufficientSlots { required: 604, available: 110 });
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    assert_eq!(land.get_apiary(&owner()).unwrap(), before);
}

#[test]
fn test_unknown_bee_id() {
    let land = land_with_apiary();
    assert_eq!(land.add_bees(&admin(), &owner(), &[42], &[1]), Err(LandError::UnknownBeeType(42)));
    assert!(matches!(land.add_bees(&admin(), &owner(), &[1, 2], &[1]), Err(LandError::InvalidInput(_))));
    assert_eq!(land.get_apiary(&owner()).unwrap().bees(), &[0; 7]);
}

// ============================================================================
// Sets and items
// ============================================================================

#[test]
fn test_save_and_update_set() {
    let land = land_with_apiary();
    assert_eq!(
        land.save_set(&stranger(), 1, 100, [1, 2, 3, 4, 5, 6, 7], [1, 2, 3, 4, 5, 6, 7])
            .unwrap_err()
            .kind(),
        ErrorKind::Unauthorized
    );

    land.save_set(&admin(), 1, 10_000, [1, 2, 3, 4, 5, 6, 7], [1_000; 7]).unwrap();
    let view = land.get_set(1).unwrap();
    assert_eq!(view.set.set_id, 1);
    assert_eq!(view.set.set_bonus_percent_bp, 10_000);
    assert_eq!(view.set.item_ids, [1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(view.item_bonuses_bp, [1_000; 7]);

    land.save_set(&admin(), 1, 20_000, [1, 2, 3, 4, 8, 6, 7], [700; 7]).unwrap();
    let view = land.get_set(1).unwrap();
    assert_eq!(view.set.set_bonus_percent_bp, 20_000);
    assert_eq!(view.set.item_ids, [1, 2, 3, 4, 8, 6, 7]);
    assert_eq!(view.item_bonuses_bp, [700; 7]);
    assert_eq!(land.get_set(2), Err(LandError::SetNotFound(2)));
}

#[test]
fn test_set_items_diffs() {
    let land = equipped_fixture();

    let diff = land.set_items(&admin(), &owner(), &[0; 7]).unwrap();
    assert!(diff.is_empty());

    let diff = land.set_items(&admin(), &owner(), &[1, 0, 0, 4, 0, 0, 0]).unwrap();
    assert_eq!(diff.released, [0; 7]);
    assert_eq!(diff.acquired, [1, 0, 0, 4, 0, 0, 0]);
    assert_eq!(land.get_apiary(&owner()).unwrap().items(), &[1, 0, 0, 4, 0, 0, 0]);

    let diff = land.set_items(&admin(), &owner(), &[1, 2, 0, 0, 0, 6, 0]).unwrap();
    assert_eq!(diff.acquired, [0, 2, 0, 0, 0, 6, 0]);
    assert_eq!(diff.released, [0, 0, 0, 4, 0, 0, 0]);

    let diff = land.set_items(&admin(), &owner(), &[0, 2, 0, 0, 0, 6, 0]).unwrap();
    assert_eq!(diff.acquired, [0; 7]);
    assert_eq!(diff.released, [1, 0, 0, 0, 0, 0, 0]);

    let events = land.drain_events();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| matches!(e, LandEvent::ItemsChanged { .. })));
}

#[test]
fn test_set_items_rejections_are_atomic() {
    let land = equipped_fixture();
    land.set_items(&admin(), &owner(), &[1, 0, 0, 0, 0, 0, 0]).unwrap();
    let before = land.get_apiary(&owner()).unwrap();

    let err = land.set_items(&admin(), &owner(), &[1, 2, 99, 0, 0, 6, 0]).unwrap_err();
    assert_eq!(err, LandError::ItemNotFound(99));

    let err = land.set_items(&admin(), &owner(), &[1, 2, 4, 0, 0, 6, 0]).unwrap_err();
    assert_eq!(err, LandError::BeeDoesNotSupportItem { slot: BeeSlot::Bee3, item_id: 4 });
    assert_eq!(err.kind(), ErrorKind::IncompatibleItem);

    assert_eq!(land.get_apiary(&owner()).unwrap(), before);
}

#[test]
fn test_equip_on_empty_bee_slot() {
    let land = land_with_apiary();
    land.save_set(&admin(), 1, 100, [1, 2, 3, 4, 5, 6, 7], [10; 7]).unwrap();
    land.add_bees(&admin(), &owner(), &[1], &[1]).unwrap();

    let err = land.set_items(&admin(), &owner(), &[1, 2, 0, 0, 0, 0, 0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompatibleItem);
    land.set_items(&admin(), &owner(), &[1, 0, 0, 0, 0, 0, 0]).unwrap();
}

#[test]
fn test_bonus_of_full_set() {
    let land = equipped_fixture();
    let full = [1, 2, 3, 4, 5, 6, 7];
    assert_eq!(land.calc_bonus_percent_bp(&full), 7 * 1_000 + 10_000);
    assert_eq!(land.calc_bonus_percent_bp(&[1, 2, 3, 4, 5, 6, 0]), 6 * 1_000);

    land.set_item_bonus_percents(&admin(), &[1, 2], &[0, 0]).unwrap();
    assert_eq!(land.get_item_bonus_percents(&[1, 2, 3]).unwrap(), vec![0, 0, 1_000]);
    assert_eq!(land.calc_bonus_percent_bp(&full), 5 * 1_000 + 10_000);
}

// ============================================================================
// Mood and profit
// ============================================================================

#[test]
fn test_mood_recovery_time() {
    let land = land_with_apiary();
    assert_eq!(land.mood_recovery_time(), DEFAULT_MOOD_RECOVERY_TIME);

    let two_weeks = 14 * DAY;
    land.set_mood_recovery_time(&admin(), two_weeks).unwrap();
    assert_eq!(land.mood_recovery_time(), two_weeks);

    assert_eq!(land.set_mood_recovery_time(&stranger(), 0).unwrap_err().kind(), ErrorKind::Unauthorized);
    assert_eq!(land.set_mood_recovery_time(&admin(), 0).unwrap_err().kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_mood_over_time() {
    let land = land_with_apiary();
    assert_eq!(land.get_apiary_mood(&owner(), 0).unwrap(), MAX_MOOD);
    assert_eq!(land.get_apiary_mood(&owner(), DEFAULT_MOOD_RECOVERY_TIME / 2).unwrap(), 5_000);
    assert_eq!(land.get_apiary_mood(&owner(), DEFAULT_MOOD_RECOVERY_TIME).unwrap(), MIN_MOOD);

    // A longer recovery time applies to existing apiaries immediately
    land.set_mood_recovery_time(&admin(), 2 * DEFAULT_MOOD_RECOVERY_TIME).unwrap();
    assert_eq!(land.get_apiary_mood(&owner(), DEFAULT_MOOD_RECOVERY_TIME).unwrap(), 5_000);
}

#[test]
fn test_bee_daily_profits() {
    let land = land_with_apiary();
    let profits = [1u128, 2, 3, 4, 5, 6, 7].map(Amount::from_whole);

    assert_eq!(land.set_bee_daily_profits(&stranger(), [Amount::ZERO; 7]).unwrap_err().kind(), ErrorKind::Unauthorized);
    land.set_bee_daily_profits(&admin(), profits).unwrap();
    assert_eq!(land.get_bee_daily_profits(), profits);
}

#[test]
fn test_pure_profit() {
    let land = land_with_apiary();
    let r = land.get_bee_daily_profits();

    assert_eq!(land.calc_pure_profit(&[1, 0, 0, 0, 0, 0, 0], DAY).unwrap(), r[0]);

    let expected = 12 * (r[0].to_wei() + r[1].to_wei() + 3 * r[2].to_wei() + 4 * r[3].to_wei());
    assert_eq!(
        land.calc_pure_profit(&[1, 1, 3, 4, 0, 0, 0], 12 * DAY).unwrap(),
        Amount::from_wei(expected)
    );
}

#[test]
fn test_claim_full_set() {
    let land = equipped_fixture();
    land.set_items(&admin(), &owner(), &[1, 2, 3, 4, 5, 6, 7]).unwrap();

    let preview = land.pending_profit(&owner(), DAY / 2).unwrap();
    assert_eq!(preview.bonus_percent_bp, 17_000);
    assert_eq!(preview.mood, MAX_MOOD - MAX_MOOD / 14);

    let receipt = land.claim(&admin(), &owner(), DAY / 2).unwrap();
    assert_eq!(receipt.amount, preview.total);
    assert_eq!(receipt.elapsed, DAY / 2);
    assert!(receipt.amount > preview.pure);

    assert_eq!(land.get_apiary(&owner()).unwrap().last_claim_timestamp(), DAY / 2);
    assert_eq!(land.get_apiary_mood(&owner(), DAY / 2).unwrap(), MAX_MOOD);

    let events = land.drain_events();
    assert!(events.contains(&LandEvent::ProfitClaimed {
        owner: owner(),
        amount: receipt.amount,
        at: DAY / 2,
    }));
}

#[test]
fn test_claim_after_recovery_time_pays_nothing() {
    let land = equipped_fixture();
    let receipt = land.claim(&admin(), &owner(), DEFAULT_MOOD_RECOVERY_TIME).unwrap();
    assert_eq!(receipt.mood, MIN_MOOD);
    assert_eq!(receipt.amount, Amount::ZERO);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_apiaries() {
    let land = Arc::new(ApiaryLand::new(RoleRegistry::with_admin(admin()), Catalog::default()));
    let owners: Vec<AccountId> = (1..=16u8).map(AccountId::repeat_byte).collect();
    for owner in &owners {
        land.create_apiary(&admin(), owner, 0).unwrap();
    }

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let land = Arc::clone(&land);
            let owners = owners.clone();
            thread::spawn(move || {
                for round in 0..50u32 {
                    let owner = owners[(t + round as usize) % owners.len()];
                    land.add_slots(&admin(), &owner, 3).unwrap();
                    // May fail for lack of slots; must never break the invariant
                    let _ = land.add_bees(&admin(), &owner, &[round % 7 + 1], &[1]);
                    let _ = land.claim(&admin(), &owner, u64::from(round) * 60);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let catalog = land.catalog();
    let total_slots: u32 = owners.iter().map(|o| land.get_apiary(o).unwrap().slots()).sum();
    assert_eq!(total_slots, 16 * DEFAULT_SLOTS + 8 * 50 * 3);
    for owner in &owners {
        let apiary = land.get_apiary(owner).unwrap();
        assert!(apiary.check_invariants(&catalog).is_ok());
        assert!(apiary.used_slots(&catalog) <= u64::from(apiary.slots()));
    }
}

#[test]
fn test_concurrent_set_items_events_replay_in_order() {
    for _ in 0..50 {
        let land = Arc::new(equipped_fixture());
        land.save_set(&admin(), 2, 500, [8, 9, 10, 11, 12, 13, 14], [100; 7]).unwrap();
        land.drain_events();

        let handles: Vec<_> = (0..4usize)
            .map(|t| {
                let land = Arc::clone(&land);
                thread::spawn(move || {
                    for round in 0..50usize {
                        let mut target = [0u32; 7];
                        for (i, item) in target.iter_mut().enumerate() {
                            *item = match (t * 7 + round + i) % 3 {
                                0 => 0,
                                1 => i as u32 + 1,
                                _ => i as u32 + 8,
                            };
                        }
                        land.set_items(&admin(), &owner(), &target).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Custody view: start empty, apply every diff in queue order
        let mut held = [0u32; 7];
        for event in land.drain_events() {
            let LandEvent::ItemsChanged { diff, .. } = event else {
                panic!("unexpected event {event:?}");
            };
            for i in 0..7 {
                if diff.released[i] != 0 {
                    assert_eq!(held[i], diff.released[i], "released an item not held");
                    held[i] = 0;
                }
                if diff.acquired[i] != 0 {
                    assert_eq!(held[i], 0, "acquired onto an occupied slot");
                    held[i] = diff.acquired[i];
                }
            }
        }
        assert_eq!(&held, land.get_apiary(&owner()).unwrap().items());
    }
}

#[test]
fn test_created_event_precedes_apiary_events() {
    for _ in 0..50 {
        let land = Arc::new(ApiaryLand::new(RoleRegistry::with_admin(admin()), Catalog::default()));

        let minter = {
            let land = Arc::clone(&land);
            thread::spawn(move || {
                // Retry until the apiary exists
                while land.add_slots(&admin(), &owner(), 1).is_err() {
                    thread::yield_now();
                }
            })
        };
        land.create_apiary(&admin(), &owner(), 0).unwrap();
        minter.join().unwrap();

        let events = land.drain_events();
        assert!(matches!(events[0], LandEvent::ApiaryCreated { .. }), "{events:?}");
        assert!(matches!(events[1], LandEvent::SlotsAdded { total, .. } if total == DEFAULT_SLOTS + 1));
    }
}
