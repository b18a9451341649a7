//! # Catalog
//!
//! Admin-owned balance tables, read by every engine operation:
//!
//! - Bee types: daily profit rate and slot cost per `BeeSlot`
//! - Items: which bee slot an item fits and its bonus (basis points)
//! - Sets: seven per-slot item requirements and a set bonus
//! - Mood recovery time and default slots for new apiaries
//!
//! The catalog is a plain value. The store keeps it behind an `Arc` and
//! swaps in a modified copy on admin updates, so an operation in flight
//! always reads one consistent snapshot.
//!
//! ## Config
//!
//! ```toml
//! default_slots = 10
//! mood_recovery_time_secs = 604800
//!
//! [[bees]]
//! id = 1
//! daily_profit = "1.5"
//! slot_cost = 1
//!
//! [[sets]]
//! id = 1
//! name = "Honey Hunter"
//! bonus_percent_bp = 1000
//! items = [1, 2, 3, 4, 5, 6, 7]
//! item_bonuses_bp = [1000, 1000, 1000, 1000, 1000, 1000, 1000]
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use apiary_shared::{DEFAULT_MOOD_RECOVERY_TIME, DEFAULT_SLOTS};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::bee::{BeeArray, BeeSlot};
use crate::error::{LandError, LandResult};

/// Unique identifier for an item type. `0` means "empty slot".
pub type ItemId = u32;

/// Unique identifier for a set.
pub type SetId = u32;

/// One item id per bee slot.
pub type ItemArray = BeeArray<ItemId>;

/// Reserved "no item" id.
pub const EMPTY_ITEM: ItemId = 0;

/// Catalog bundled with the crate (production balance).
const BUNDLED_CATALOG: &str = include_str!("../data/catalog.toml");

/// Fallback bee table: daily profit (whole tokens), slot cost.
const DEFAULT_BEES: BeeArray<(u128, u32)> =
    [(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6), (7, 7)];

/// Static data of one bee type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeeType {
    /// Yield of one bee over one full day.
    pub daily_profit: Amount,
    /// Slots one bee of this type occupies.
    pub slot_cost: u32,
}

/// An equippable item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemDef {
    /// Item id (never 0).
    pub item_id: ItemId,
    /// The only bee slot this item can be equipped on.
    pub supports: BeeSlot,
    /// Flat bonus while equipped, in basis points.
    pub bonus_percent_bp: u32,
}

/// A set of per-slot item requirements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetDef {
    /// Set id.
    pub set_id: SetId,
    /// Required item per slot, `EMPTY_ITEM` = no requirement.
    pub item_ids: ItemArray,
    /// Bonus granted when every requirement is met, in basis points.
    pub set_bonus_percent_bp: u32,
}

impl SetDef {
    /// Number of slots with a requirement.
    #[must_use]
    pub fn required_slots(&self) -> usize {
        self.item_ids.iter().filter(|&&id| id != EMPTY_ITEM).count()
    }

    /// True if `items` meets every requirement and at least one exists.
    #[must_use]
    pub fn is_completed_by(&self, items: &ItemArray) -> bool {
        self.required_slots() > 0
            && self
                .item_ids
                .iter()
                .zip(items)
                .all(|(&required, &equipped)| required == EMPTY_ITEM || required == equipped)
    }
}

/// A set together with the bonus of each required item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetView {
    /// The set definition.
    pub set: SetDef,
    /// Bonus of the item required at each slot (0 where nothing is required).
    pub item_bonuses_bp: BeeArray<u32>,
}

/// The balance tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    bees: BeeArray<BeeType>,
    items: HashMap<ItemId, ItemDef>,
    sets: BTreeMap<SetId, SetDef>,
    mood_recovery_time: u64,
    default_slots: u32,
}

impl Catalog {
    /// Creates a catalog with the given bee table and no items or sets.
    ///
    /// # Errors
    ///
    /// Returns `LandError::InvalidInput` if `mood_recovery_time` is zero.
    pub fn new(
        bees: BeeArray<BeeType>,
        default_slots: u32,
        mood_recovery_time: u64,
    ) -> LandResult<Self> {
        check_recovery_time(mood_recovery_time)?;
        Ok(Self {
            bees,
            items: HashMap::new(),
            sets: BTreeMap::new(),
            mood_recovery_time,
            default_slots,
        })
    }

    /// Loads the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `LandError::InvalidConfig` if the bundled file is malformed.
    pub fn bundled() -> LandResult<Self> {
        Self::from_toml_str(BUNDLED_CATALOG)
    }

    /// Parses and validates a TOML catalog.
    ///
    /// # Errors
    ///
    /// Returns `LandError::InvalidConfig` on syntax or validation errors.
    pub fn from_toml_str(source: &str) -> LandResult<Self> {
        let config: CatalogConfig =
            toml::from_str(source).map_err(|e| LandError::InvalidConfig(e.to_string()))?;
        Self::from_config(&config)
    }

    /// Reads, parses and validates a TOML catalog file.
    ///
    /// # Errors
    ///
    /// Returns `LandError::InvalidConfig` if the file cannot be read or is invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> LandResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| LandError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Validates a deserialized config into a catalog.
    ///
    /// # Errors
    ///
    /// Returns `LandError::InvalidConfig` if a bee id is missing, unknown or
    /// duplicated, an item or set id is duplicated, or any item/set is invalid.
    pub fn from_config(config: &CatalogConfig) -> LandResult<Self> {
        let mut bees: BeeArray<Option<BeeType>> = [None; apiary_shared::BEE_TYPES];
        for bee in &config.bees {
            let slot = BeeSlot::from_bee_id(bee.id).map_err(into_config_error)?;
            if bees[slot.index()].is_some() {
                return Err(LandError::InvalidConfig(format!("bee {} defined twice", bee.id)));
            }
            bees[slot.index()] = Some(BeeType {
                daily_profit: bee.daily_profit,
                slot_cost: bee.slot_cost,
            });
        }

        let mut table = [BeeType { daily_profit: Amount::ZERO, slot_cost: 0 }; apiary_shared::BEE_TYPES];
        for slot in BeeSlot::ALL {
            table[slot.index()] = bees[slot.index()].ok_or_else(|| {
                LandError::InvalidConfig(format!("bee {} is not defined", slot.bee_id()))
            })?;
        }

        let mut catalog = Self::new(table, config.default_slots, config.mood_recovery_time_secs)
            .map_err(into_config_error)?;

        for item in &config.items {
            if catalog.items.contains_key(&item.id) {
                return Err(LandError::InvalidConfig(format!("item {} defined twice", item.id)));
            }
            let supports = BeeSlot::from_bee_id(item.bee).map_err(into_config_error)?;
            catalog
                .save_item(ItemDef {
                    item_id: item.id,
                    supports,
                    bonus_percent_bp: item.bonus_percent_bp,
                })
                .map_err(into_config_error)?;
        }

        for set in &config.sets {
            if catalog.sets.contains_key(&set.id) {
                return Err(LandError::InvalidConfig(format!("set {} defined twice", set.id)));
            }
            catalog
                .save_set(set.id, set.bonus_percent_bp, set.items, set.item_bonuses_bp)
                .map_err(into_config_error)?;
            tracing::debug!(set_id = set.id, name = set.name.as_deref().unwrap_or(""), "Loaded set");
        }

        Ok(catalog)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Static data of one bee type.
    #[inline]
    #[must_use]
    pub const fn bee(&self, slot: BeeSlot) -> &BeeType {
        &self.bees[slot.index()]
    }

    /// Daily profit of every bee type.
    #[must_use]
    pub fn bee_daily_profits(&self) -> BeeArray<Amount> {
        self.bees.map(|bee| bee.daily_profit)
    }

    /// Slot cost of every bee type.
    #[must_use]
    pub fn bee_slot_costs(&self) -> BeeArray<u32> {
        self.bees.map(|bee| bee.slot_cost)
    }

    /// Looks up an item definition.
    #[inline]
    #[must_use]
    pub fn item(&self, item_id: ItemId) -> Option<&ItemDef> {
        self.items.get(&item_id)
    }

    /// Looks up a set definition.
    #[inline]
    #[must_use]
    pub fn set(&self, set_id: SetId) -> Option<&SetDef> {
        self.sets.get(&set_id)
    }

    /// All sets in id order.
    pub fn sets(&self) -> impl Iterator<Item = &SetDef> {
        self.sets.values()
    }

    /// Number of defined items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns a set with the bonus of each of its required items.
    ///
    /// # Errors
    ///
    /// Returns `LandError::SetNotFound` if the set does not exist.
    pub fn get_set(&self, set_id: SetId) -> LandResult<SetView> {
        let set = self.sets.get(&set_id).ok_or(LandError::SetNotFound(set_id))?;
        let item_bonuses_bp = set
            .item_ids
            .map(|id| self.items.get(&id).map_or(0, |item| item.bonus_percent_bp));
        Ok(SetView { set: set.clone(), item_bonuses_bp })
    }

    /// Bonus percent of each requested item.
    ///
    /// # Errors
    ///
    /// Returns `LandError::ItemNotFound` for the first unknown id.
    pub fn item_bonus_percents(&self, item_ids: &[ItemId]) -> LandResult<Vec<u32>> {
        item_ids
            .iter()
            .map(|&id| {
                self.items
                    .get(&id)
                    .map(|item| item.bonus_percent_bp)
                    .ok_or(LandError::ItemNotFound(id))
            })
            .collect()
    }

    /// Time (seconds) for mood to decay from max to min.
    #[inline]
    #[must_use]
    pub const fn mood_recovery_time(&self) -> u64 {
        self.mood_recovery_time
    }

    /// Slots granted to a new apiary.
    #[inline]
    #[must_use]
    pub const fn default_slots(&self) -> u32 {
        self.default_slots
    }

    // ========================================================================
    // Admin updates (authorization is checked by the store)
    // ========================================================================

    /// Replaces the daily profit of every bee type.
    pub fn set_bee_daily_profits(&mut self, profits: BeeArray<Amount>) {
        for (bee, profit) in self.bees.iter_mut().zip(profits) {
            bee.daily_profit = profit;
        }
    }

    /// Defines or updates an item.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the id is `EMPTY_ITEM`
    /// - `InvalidInput` if the item already exists for another bee slot
    ///   (apiaries may have it equipped on its current slot)
    pub fn save_item(&mut self, item: ItemDef) -> LandResult<()> {
        self.check_item(&item)?;
        self.items.insert(item.item_id, item);
        Ok(())
    }

    /// Saves a set and the seven items it names.
    ///
    /// The item at index `i` is defined (or updated) as supporting bee slot
    /// `i` with bonus `item_bonuses_bp[i]`. An existing set with the same id
    /// is replaced.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the set requires no item at all
    /// - `InvalidInput` if an item id appears in more than one slot
    /// - any error of [`Catalog::save_item`]; nothing is written in that case
    pub fn save_set(
        &mut self,
        set_id: SetId,
        set_bonus_percent_bp: u32,
        item_ids: ItemArray,
        item_bonuses_bp: BeeArray<u32>,
    ) -> LandResult<()> {
        if item_ids.iter().all(|&id| id == EMPTY_ITEM) {
            return Err(LandError::InvalidInput(format!("set {set_id} requires no items")));
        }
        for (i, &id) in item_ids.iter().enumerate() {
            if id != EMPTY_ITEM && item_ids[..i].contains(&id) {
                return Err(LandError::InvalidInput(format!(
                    "set {set_id} names item {id} in more than one slot"
                )));
            }
        }

        let items: Vec<ItemDef> = BeeSlot::ALL
            .iter()
            .filter(|slot| item_ids[slot.index()] != EMPTY_ITEM)
            .map(|&slot| ItemDef {
                item_id: item_ids[slot.index()],
                supports: slot,
                bonus_percent_bp: item_bonuses_bp[slot.index()],
            })
            .collect();

        // Validate everything before the first write.
        for item in &items {
            self.check_item(item)?;
        }
        for item in items {
            self.items.insert(item.item_id, item);
        }

        self.sets.insert(
            set_id,
            SetDef {
                set_id,
                item_ids,
                set_bonus_percent_bp,
            },
        );
        Ok(())
    }

    /// Updates the bonus of existing items.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the slices differ in length
    /// - `ItemNotFound` if any id is unknown; nothing is written in that case
    pub fn set_item_bonus_percents(&mut self, item_ids: &[ItemId], percents_bp: &[u32]) -> LandResult<()> {
        if item_ids.len() != percents_bp.len() {
            return Err(LandError::InvalidInput(format!(
                "{} item ids but {} percents",
                item_ids.len(),
                percents_bp.len()
            )));
        }
        if let Some(&missing) = item_ids.iter().find(|id| !self.items.contains_key(id)) {
            return Err(LandError::ItemNotFound(missing));
        }

        for (id, &percent) in item_ids.iter().zip(percents_bp) {
            if let Some(item) = self.items.get_mut(id) {
                item.bonus_percent_bp = percent;
            }
        }
        Ok(())
    }

    /// Changes the mood recovery time for every apiary.
    ///
    /// # Errors
    ///
    /// Returns `LandError::InvalidInput` if `seconds` is zero.
    pub fn set_mood_recovery_time(&mut self, seconds: u64) -> LandResult<()> {
        check_recovery_time(seconds)?;
        self.mood_recovery_time = seconds;
        Ok(())
    }

    fn check_item(&self, item: &ItemDef) -> LandResult<()> {
        if item.item_id == EMPTY_ITEM {
            return Err(LandError::InvalidInput("item id 0 is reserved".to_string()));
        }
        match self.items.get(&item.item_id) {
            Some(existing) if existing.supports != item.supports => Err(LandError::InvalidInput(format!(
                "item {} already supports bee {}, cannot move it to bee {}",
                item.item_id, existing.supports, item.supports
            ))),
            _ => Ok(()),
        }
    }
}

impl Default for Catalog {
    /// Fallback catalog: fixed bee table, no items, no sets.
    fn default() -> Self {
        Self {
            bees: DEFAULT_BEES.map(|(profit, slot_cost)| BeeType {
                daily_profit: Amount::from_whole(profit),
                slot_cost,
            }),
            items: HashMap::new(),
            sets: BTreeMap::new(),
            mood_recovery_time: DEFAULT_MOOD_RECOVERY_TIME,
            default_slots: DEFAULT_SLOTS,
        }
    }
}

fn check_recovery_time(seconds: u64) -> LandResult<()> {
    if seconds == 0 {
        return Err(LandError::InvalidInput("mood recovery time must be positive".to_string()));
    }
    Ok(())
}

fn into_config_error(err: LandError) -> LandError {
    match err {
        LandError::InvalidConfig(_) => err,
        other => LandError::InvalidConfig(other.to_string()),
    }
}

// ============================================================================
// Config file schema
// ============================================================================

/// Catalog as written in TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Slots granted to a new apiary.
    #[serde(default = "default_slots")]
    pub default_slots: u32,
    /// Mood recovery time in seconds.
    #[serde(default = "default_mood_recovery_time")]
    pub mood_recovery_time_secs: u64,
    /// One entry per bee id 1..=7.
    pub bees: Vec<BeeConfig>,
    /// Stand-alone items.
    #[serde(default)]
    pub items: Vec<ItemConfig>,
    /// Sets (their items are defined implicitly).
    #[serde(default)]
    pub sets: Vec<SetConfig>,
}

/// Bee type entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeeConfig {
    /// Bee id (1..=7).
    pub id: u32,
    /// Daily profit as a decimal string.
    pub daily_profit: Amount,
    /// Slots per bee.
    pub slot_cost: u32,
}

/// Item entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemConfig {
    /// Item id.
    pub id: ItemId,
    /// Bee id (1..=7) the item fits.
    pub bee: u32,
    /// Bonus in basis points.
    pub bonus_percent_bp: u32,
}

/// Set entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetConfig {
    /// Set id.
    pub id: SetId,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Set bonus in basis points.
    pub bonus_percent_bp: u32,
    /// Required item per bee slot (0 = none).
    pub items: ItemArray,
    /// Bonus of each item, in basis points.
    pub item_bonuses_bp: BeeArray<u32>,
}

const fn default_slots() -> u32 {
    DEFAULT_SLOTS
}

const fn default_mood_recovery_time() -> u64 {
    DEFAULT_MOOD_RECOVERY_TIME
}
