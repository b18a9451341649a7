//! # Apiary Economy
//!
//! Server-side economy of the apiary game: owners keep bees that yield a
//! token over time, equip items that boost the yield, and claim the result.
//!
//! ## Design Principles
//!
//! 1. **Zero floating point** - Every amount is an 18-decimal fixed-point `Amount`
//! 2. **All-or-nothing operations** - A failed call leaves the apiary untouched
//! 3. **No custody** - The engine reports what to move (`EquipDiff`, `ClaimReceipt`,
//!    `LandEvent`); moving tokens and items is someone else's job
//! 4. **External configuration** - Balance data lives in TOML (`data/catalog.toml`)
//!
//! ## Accrual
//!
//! ```text
//! pure   = Σ bees[i] * daily_profit[i] * elapsed / 86400
//! total  = pure * (10000 + bonus_bp) / 10000 * mood / 10000
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use apiary_economy::{ApiaryLand, Catalog, RoleRegistry};
//!
//! let land = ApiaryLand::new(RoleRegistry::with_admin(server), Catalog::bundled()?);
//! land.create_apiary(&server, &player, now)?;
//! land.add_bees(&server, &player, &[1, 2], &[3, 1])?;
//! land.set_items(&server, &player, &[1, 2, 0, 0, 0, 0, 0])?;
//!
//! let receipt = land.claim(&server, &player, now + 86_400)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod access;
pub mod amount;
pub mod apiary;
pub mod bee;
pub mod bonus;
pub mod capacity;
pub mod catalog;
pub mod equip;
pub mod error;
pub mod events;
pub mod land;
pub mod mood;
pub mod profit;

pub use access::{AccessControl, Role, RoleRegistry};
pub use amount::Amount;
pub use apiary::Apiary;
pub use bee::{BeeArray, BeeSlot};
pub use catalog::{
    BeeConfig, BeeType, Catalog, CatalogConfig, ItemArray, ItemConfig, ItemDef, ItemId, SetConfig, SetDef, SetId,
    SetView, EMPTY_ITEM,
};
pub use equip::EquipDiff;
pub use error::{ErrorKind, LandError, LandResult};
pub use events::LandEvent;
pub use land::{ApiaryLand, ClaimReceipt};
pub use profit::Accrual;

pub use apiary_shared::{AccountId, Timestamp};
