//! Events queued by the store for the custody layer.
//!
//! The engine never moves tokens or items. Whoever owns custody drains these
//! events and performs the transfers they describe.

use apiary_shared::{AccountId, Timestamp};

use crate::amount::Amount;
use crate::bee::BeeArray;
use crate::equip::EquipDiff;

/// A committed state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LandEvent {
    /// New apiary registered.
    ApiaryCreated {
        /// Owner account.
        owner: AccountId,
        /// Starting capacity.
        slots: u32,
        /// Creation time.
        at: Timestamp,
    },
    /// Bees were added.
    BeesAdded {
        /// Owner account.
        owner: AccountId,
        /// Bees added per slot.
        added: BeeArray<u32>,
    },
    /// Slot capacity grew.
    SlotsAdded {
        /// Owner account.
        owner: AccountId,
        /// Slots added.
        amount: u32,
        /// Capacity after the change.
        total: u32,
    },
    /// Equipped items changed. Custody returns `diff.released` to the owner
    /// and takes `diff.acquired` from them.
    ItemsChanged {
        /// Owner account.
        owner: AccountId,
        /// Per-slot items to move.
        diff: EquipDiff,
    },
    /// Profit was claimed. Custody pays `amount` to the owner.
    ProfitClaimed {
        /// Owner account.
        owner: AccountId,
        /// Amount owed.
        amount: Amount,
        /// Claim time.
        at: Timestamp,
    },
    /// An admin changed the catalog.
    CatalogUpdated {
        /// Which setter ran.
        change: &'static str,
    },
}

impl LandEvent {
    /// Owner the event concerns, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<AccountId> {
        match self {
            Self::ApiaryCreated { owner, .. }
            | Self::BeesAdded { owner, .. }
            | Self::SlotsAdded { owner, .. }
            | Self::ItemsChanged { owner, .. }
            | Self::ProfitClaimed { owner, .. } => Some(*owner),
            Self::CatalogUpdated { .. } => None,
        }
    }
}
