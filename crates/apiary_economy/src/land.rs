//! # Apiary Land
//!
//! **The store.** Every mutation of an apiary or the catalog goes through
//! here.
//!
//! ```text
//! caller ──> ApiaryLand::<op>() ──> AccessControl (role check)
//!                 │
//!                 ▼
//!          lock apiary record ──> snapshot catalog ──> working copy
//!                 │
//!                 ▼
//!      capacity / equip / profit engine on the copy
//!                 │
//!         ok ─────┴───── err
//!          │               │
//!          ▼               ▼
//!   commit + LandEvent   record untouched
//! ```
//!
//! ## Thread Safety
//!
//! `ApiaryLand` is `Send + Sync`. Each apiary sits behind its own mutex, so
//! operations on different owners run in parallel. The catalog is an
//! `Arc<Catalog>` swapped on admin updates; readers never see a half-applied
//! change.

use std::collections::HashMap;
use std::sync::Arc;

use apiary_shared::{AccountId, Timestamp};
use parking_lot::{Mutex, RwLock};

use crate::access::{require_any, AccessControl, Role};
use crate::amount::Amount;
use crate::apiary::Apiary;
use crate::bee::BeeArray;
use crate::bonus;
use crate::capacity;
use crate::catalog::{Catalog, ItemArray, ItemDef, ItemId, SetId, SetView};
use crate::equip::{self, EquipDiff};
use crate::error::{LandError, LandResult};
use crate::events::LandEvent;
use crate::mood::mood_of;
use crate::profit::{self, Accrual};

/// Result of a successful claim. The custody layer pays `amount`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimReceipt {
    /// Claimed amount.
    pub amount: Amount,
    /// Seconds accrued since the previous claim.
    pub elapsed: u64,
    /// Mood applied.
    pub mood: u32,
    /// Bonus applied, in basis points.
    pub bonus_percent_bp: u32,
}

impl From<Accrual> for ClaimReceipt {
    fn from(accrual: Accrual) -> Self {
        Self {
            amount: accrual.total,
            elapsed: accrual.elapsed,
            mood: accrual.mood,
            bonus_percent_bp: accrual.bonus_percent_bp,
        }
    }
}

/// Apiary store and catalog owner.
///
/// ## Usage
///
/// ```rust,ignore
/// let land = ApiaryLand::new(RoleRegistry::with_admin(server), Catalog::bundled()?);
///
/// land.create_apiary(&server, &player, now)?;
/// land.add_bees(&server, &player, &[1], &[2])?;
///
/// let receipt = land.claim(&server, &player, now + 86_400)?;
/// for event in land.drain_events() {
///     custody.apply(event);
/// }
/// ```
pub struct ApiaryLand<A: AccessControl> {
    /// Role lookup.
    access: A,
    /// Current catalog snapshot.
    catalog: RwLock<Arc<Catalog>>,
    /// Apiaries by owner.
    apiaries: RwLock<HashMap<AccountId, Arc<Mutex<Apiary>>>>,
    /// Events for the custody layer.
    event_buffer: Mutex<Vec<LandEvent>>,
}

impl<A: AccessControl> ApiaryLand<A> {
    /// Creates an empty store.
    pub fn new(access: A, catalog: Catalog) -> Self {
        Self {
            access,
            catalog: RwLock::new(Arc::new(catalog)),
            apiaries: RwLock::new(HashMap::new()),
            event_buffer: Mutex::new(Vec::with_capacity(256)),
        }
    }

    /// The role lookup.
    pub fn access(&self) -> &A {
        &self.access
    }

    /// Current catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.read().clone()
    }

    // ========================================================================
    // Apiary lifecycle
    // ========================================================================

    /// Registers a new apiary with the catalog's default slots.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the caller is an operator
    /// - `InvalidInput` for the zero owner
    /// - `ApiaryAlreadyExists` if the owner already has one
    pub fn create_apiary(&self, caller: &AccountId, owner: &AccountId, now: Timestamp) -> LandResult<()> {
        require_any(&self.access, caller, &[Role::Operator], "create_apiary")?;
        if apiary_shared::is_zero_account(owner) {
            return Err(LandError::InvalidInput("owner is the zero account".to_string()));
        }

        let slots = self.catalog().default_slots();
        {
            let mut apiaries = self.apiaries.write();
            if apiaries.contains_key(owner) {
                tracing::debug!(owner = %owner, "Apiary already exists");
                return Err(LandError::ApiaryAlreadyExists(*owner));
            }
            apiaries.insert(*owner, Arc::new(Mutex::new(Apiary::new(*owner, slots, now))));
            // Queued before any other thread can reach the new record
            self.push_event(LandEvent::ApiaryCreated { owner: *owner, slots, at: now });
        }

        tracing::info!(owner = %owner, slots, "Apiary created");
        Ok(())
    }

    /// Adds bees given as parallel `(bee id, amount)` slices.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the caller is an operator or minter
    /// - `InvalidInput` / `UnknownBeeType` for malformed input
    /// - `ApiaryNotFound`, `InsufficientSlots`, `ArithmeticOverflow`
    pub fn add_bees(
        &self,
        caller: &AccountId,
        owner: &AccountId,
        bee_ids: &[u32],
        amounts: &[u32],
    ) -> LandResult<()> {
        require_any(&self.access, caller, &[Role::Operator, Role::Minter], "add_bees")?;
        let deltas = capacity::bee_deltas(bee_ids, amounts)?;

        let used = self.mutate(
            owner,
            |apiary, catalog| {
                capacity::try_add_bees(apiary, catalog, &deltas)?;
                Ok(apiary.used_slots(catalog))
            },
            |_| Some(LandEvent::BeesAdded { owner: *owner, added: deltas }),
        )?;

        tracing::info!(owner = %owner, ?deltas, used, "Bees added");
        Ok(())
    }

    /// Grants extra slot capacity.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the caller is an operator or minter
    /// - `ApiaryNotFound`, `ArithmeticOverflow`
    pub fn add_slots(&self, caller: &AccountId, owner: &AccountId, amount: u32) -> LandResult<()> {
        require_any(&self.access, caller, &[Role::Operator, Role::Minter], "add_slots")?;

        let total = self.mutate(
            owner,
            |apiary, _| {
                capacity::add_slots(apiary, amount)?;
                Ok(apiary.slots())
            },
            |&total| Some(LandEvent::SlotsAdded { owner: *owner, amount, total }),
        )?;

        tracing::info!(owner = %owner, amount, total, "Slots added");
        Ok(())
    }

    /// Replaces the equipped configuration.
    ///
    /// Returns what the custody layer must move. An `ItemsChanged` event is
    /// queued only if something moves.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the caller is an operator
    /// - `ApiaryNotFound`, `ItemNotFound`, `BeeDoesNotSupportItem`
    pub fn set_items(&self, caller: &AccountId, owner: &AccountId, target: &ItemArray) -> LandResult<EquipDiff> {
        require_any(&self.access, caller, &[Role::Operator], "set_items")?;

        let diff = self.mutate(
            owner,
            |apiary, catalog| equip::set_items(apiary, catalog, target),
            |&diff| (!diff.is_empty()).then_some(LandEvent::ItemsChanged { owner: *owner, diff }),
        )?;

        if !diff.is_empty() {
            tracing::info!(owner = %owner, items = ?target, "Items changed");
        }
        Ok(diff)
    }

    /// Settles accrued profit and restarts the accrual period.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless the caller is an operator
    /// - `ApiaryNotFound`, `ArithmeticOverflow`
    pub fn claim(&self, caller: &AccountId, owner: &AccountId, now: Timestamp) -> LandResult<ClaimReceipt> {
        require_any(&self.access, caller, &[Role::Operator], "claim")?;

        let receipt = self.mutate(
            owner,
            |apiary, catalog| {
                let accrual = profit::calc_total_profit(catalog, apiary, now)?;
                apiary.last_claim_timestamp = apiary.last_claim_timestamp.max(now);
                Ok(ClaimReceipt::from(accrual))
            },
            |receipt| {
                Some(LandEvent::ProfitClaimed {
                    owner: *owner,
                    amount: receipt.amount,
                    at: now,
                })
            },
        )?;

        tracing::info!(
            owner = %owner,
            amount = %receipt.amount,
            elapsed = receipt.elapsed,
            mood = receipt.mood,
            "Profit claimed"
        );
        Ok(receipt)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Bee yield over `elapsed` seconds at current rates.
    ///
    /// Takes no items: they only act through the bonus, which pure profit
    /// excludes.
    ///
    /// # Errors
    ///
    /// Returns `LandError::ArithmeticOverflow` on overflow.
    pub fn calc_pure_profit(&self, bees: &BeeArray<u32>, elapsed: u64) -> LandResult<Amount> {
        profit::calc_pure_profit(&self.catalog(), bees, elapsed)
    }

    /// What a claim at `now` would pay, without claiming.
    ///
    /// # Errors
    ///
    /// `ApiaryNotFound`, `ArithmeticOverflow`
    pub fn pending_profit(&self, owner: &AccountId, now: Timestamp) -> LandResult<Accrual> {
        let apiary = self.require_apiary(owner)?;
        profit::calc_total_profit(&self.catalog(), &apiary, now)
    }

    /// Copy of an apiary, `None` if the owner has none.
    #[must_use]
    pub fn get_apiary(&self, owner: &AccountId) -> Option<Apiary> {
        let record = self.apiaries.read().get(owner).cloned()?;
        let apiary = record.lock().clone();
        Some(apiary)
    }

    /// Slots occupied by bees.
    ///
    /// # Errors
    ///
    /// Returns `LandError::ApiaryNotFound` if the owner has no apiary.
    pub fn get_used_slots(&self, owner: &AccountId) -> LandResult<u64> {
        let apiary = self.require_apiary(owner)?;
        Ok(apiary.used_slots(&self.catalog()))
    }

    /// Mood at `now`.
    ///
    /// # Errors
    ///
    /// Returns `LandError::ApiaryNotFound` if the owner has no apiary.
    pub fn get_apiary_mood(&self, owner: &AccountId, now: Timestamp) -> LandResult<u32> {
        let apiary = self.require_apiary(owner)?;
        Ok(mood_of(
            apiary.last_claim_timestamp(),
            now,
            self.catalog().mood_recovery_time(),
        ))
    }

    /// Bonus of an arbitrary configuration, in basis points.
    #[must_use]
    pub fn calc_bonus_percent_bp(&self, items: &ItemArray) -> u32 {
        bonus::calc_bonus_percent_bp(&self.catalog(), items)
    }

    /// Number of registered apiaries.
    #[must_use]
    pub fn apiary_count(&self) -> usize {
        self.apiaries.read().len()
    }

    // ========================================================================
    // Catalog reads
    // ========================================================================

    /// Daily profit of each bee type.
    #[must_use]
    pub fn get_bee_daily_profits(&self) -> BeeArray<Amount> {
        self.catalog().bee_daily_profits()
    }

    /// Slot cost of each bee type.
    #[must_use]
    pub fn get_bee_slot_costs(&self) -> BeeArray<u32> {
        self.catalog().bee_slot_costs()
    }

    /// A set and its item bonuses.
    ///
    /// # Errors
    ///
    /// Returns `LandError::SetNotFound` if the set does not exist.
    pub fn get_set(&self, set_id: SetId) -> LandResult<SetView> {
        self.catalog().get_set(set_id)
    }

    /// Bonus of each requested item.
    ///
    /// # Errors
    ///
    /// Returns `LandError::ItemNotFound` for the first unknown id.
    pub fn get_item_bonus_percents(&self, item_ids: &[ItemId]) -> LandResult<Vec<u32>> {
        self.catalog().item_bonus_percents(item_ids)
    }

    /// Current mood recovery time in seconds.
    #[must_use]
    pub fn mood_recovery_time(&self) -> u64 {
        self.catalog().mood_recovery_time()
    }

    /// Slots granted to new apiaries.
    #[must_use]
    pub fn default_slots(&self) -> u32 {
        self.catalog().default_slots()
    }

    // ========================================================================
    // Admin setters
    // ========================================================================

    /// Replaces the daily profit of every bee type.
    ///
    /// # Errors
    ///
    /// Returns `LandError::Unauthorized` unless the caller is an admin.
    pub fn set_bee_daily_profits(&self, caller: &AccountId, profits: BeeArray<Amount>) -> LandResult<()> {
        self.update_catalog(caller, "set_bee_daily_profits", |catalog| {
            catalog.set_bee_daily_profits(profits);
            Ok(())
        })
    }

    /// Saves a set and registers its seven items (index `i` fits bee slot `i`).
    ///
    /// # Errors
    ///
    /// `Unauthorized`, plus any error of [`Catalog::save_set`].
    pub fn save_set(
        &self,
        caller: &AccountId,
        set_id: SetId,
        set_bonus_percent_bp: u32,
        item_ids: ItemArray,
        item_bonuses_bp: BeeArray<u32>,
    ) -> LandResult<()> {
        self.update_catalog(caller, "save_set", |catalog| {
            catalog.save_set(set_id, set_bonus_percent_bp, item_ids, item_bonuses_bp)
        })
    }

    /// Defines or updates a single item.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, plus any error of [`Catalog::save_item`].
    pub fn save_item(&self, caller: &AccountId, item: ItemDef) -> LandResult<()> {
        self.update_catalog(caller, "save_item", |catalog| catalog.save_item(item))
    }

    /// Updates the bonus of existing items.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, plus any error of [`Catalog::set_item_bonus_percents`].
    pub fn set_item_bonus_percents(
        &self,
        caller: &AccountId,
        item_ids: &[ItemId],
        percents_bp: &[u32],
    ) -> LandResult<()> {
        self.update_catalog(caller, "set_item_bonus_percents", |catalog| {
            catalog.set_item_bonus_percents(item_ids, percents_bp)
        })
    }

    /// Changes the mood recovery time for every apiary.
    ///
    /// # Errors
    ///
    /// `Unauthorized`, or `InvalidInput` for zero.
    pub fn set_mood_recovery_time(&self, caller: &AccountId, seconds: u64) -> LandResult<()> {
        self.update_catalog(caller, "set_mood_recovery_time", |catalog| {
            catalog.set_mood_recovery_time(seconds)
        })
    }

    // ========================================================================
    // Custody layer
    // ========================================================================

    /// Drains all pending events.
    pub fn drain_events(&self) -> Vec<LandEvent> {
        let mut events = self.event_buffer.lock();
        std::mem::take(&mut *events)
    }

    /// Number of undrained events.
    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.event_buffer.lock().len()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn require_apiary(&self, owner: &AccountId) -> LandResult<Apiary> {
        self.get_apiary(owner).ok_or(LandError::ApiaryNotFound(*owner))
    }

    /// Runs `op` on a working copy of the owner's apiary and commits it only
    /// if `op` succeeds. The catalog is snapshotted after the record lock is
    /// taken, so the committed state was validated against a catalog at
    /// least as new as the one it was last checked with.
    ///
    /// The event built by `event` is queued before the record lock is
    /// released: events of one apiary are queued in commit order.
    fn mutate<T>(
        &self,
        owner: &AccountId,
        op: impl FnOnce(&mut Apiary, &Catalog) -> LandResult<T>,
        event: impl FnOnce(&T) -> Option<LandEvent>,
    ) -> LandResult<T> {
        let record = self
            .apiaries
            .read()
            .get(owner)
            .cloned()
            .ok_or(LandError::ApiaryNotFound(*owner))?;

        let mut apiary = record.lock();
        let catalog = self.catalog();
        let mut working = apiary.clone();

        match op(&mut working, &catalog) {
            Ok(value) => {
                debug_assert_eq!(working.check_invariants(&catalog), Ok(()));
                *apiary = working;
                if let Some(event) = event(&value) {
                    self.push_event(event);
                }
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(owner = %owner, error = %err, "Apiary operation rejected");
                Err(err)
            }
        }
    }

    /// Applies `change` to a copy of the catalog and swaps it in on success.
    fn update_catalog(
        &self,
        caller: &AccountId,
        action: &'static str,
        change: impl FnOnce(&mut Catalog) -> LandResult<()>,
    ) -> LandResult<()> {
        require_any(&self.access, caller, &[Role::Admin], action)?;

        {
            let mut current = self.catalog.write();
            let mut next = Catalog::clone(&current);
            if let Err(err) = change(&mut next) {
                tracing::warn!(action, error = %err, "Catalog update rejected");
                return Err(err);
            }
            *current = Arc::new(next);
            self.push_event(LandEvent::CatalogUpdated { change: action });
        }

        tracing::info!(action, "Catalog updated");
        Ok(())
    }

    /// Lock order: record (or map, or catalog) first, then the buffer.
    fn push_event(&self, event: LandEvent) {
        self.event_buffer.lock().push(event);
    }
}
