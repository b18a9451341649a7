//! # Apiary Error Types
//!
//! All errors that can occur in the apiary economy.
//!
//! Every error aborts the single requested operation with no state change.
//! None of them is fatal to the process-wide state.

use apiary_shared::AccountId;
use thiserror::Error;

use crate::bee::BeeSlot;
use crate::catalog::{ItemId, SetId};

/// Errors that can occur in the apiary economy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LandError {
    /// No apiary exists for this owner.
    #[error("apiary not found for {0}")]
    ApiaryNotFound(AccountId),

    /// The owner already has an apiary.
    #[error("apiary is already created for {0}")]
    ApiaryAlreadyExists(AccountId),

    /// Caller lacks the role required by the operation.
    #[error("{caller} is not allowed to {action}")]
    Unauthorized {
        /// The rejected caller.
        caller: AccountId,
        /// What the caller tried to do.
        action: &'static str,
    },

    /// Bee id outside the catalog (valid ids are 1..=7).
    #[error("unknown bee type: {0}")]
    UnknownBeeType(u32),

    /// Adding bees would use more slots than the apiary has.
    #[error("not enough slots: {required} required, {available} available")]
    InsufficientSlots {
        /// Used slots after the addition.
        required: u64,
        /// Total slots of the apiary.
        available: u32,
    },

    /// Item id not present in the catalog.
    #[error("item does not exist: {0}")]
    ItemNotFound(ItemId),

    /// Set id not present in the catalog.
    #[error("set does not exist: {0}")]
    SetNotFound(SetId),

    /// Item cannot be equipped on this bee slot (wrong slot, or no bees).
    #[error("bee {slot} does not support item {item_id}")]
    BeeDoesNotSupportItem {
        /// Target bee slot.
        slot: BeeSlot,
        /// Rejected item.
        item_id: ItemId,
    },

    /// Malformed request (length mismatch, zero identity, zero duration).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid catalog configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Arithmetic overflow in an economic calculation.
    #[error("arithmetic overflow in economic calculation")]
    ArithmeticOverflow,
}

/// Coarse error taxonomy exposed to collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Apiary or catalog entry absent.
    NotFound,
    /// Double creation.
    AlreadyExists,
    /// Caller lacks the required role.
    Unauthorized,
    /// Slot invariant violation.
    CapacityExceeded,
    /// Item/bee-slot mismatch or equipping onto an empty bee slot.
    IncompatibleItem,
    /// Malformed input, unknown ids, bad config, overflow.
    InvalidInput,
}

impl LandError {
    /// Maps the error onto the collaborator-facing taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ApiaryNotFound(_) | Self::ItemNotFound(_) | Self::SetNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::ApiaryAlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InsufficientSlots { .. } => ErrorKind::CapacityExceeded,
            Self::BeeDoesNotSupportItem { .. } => ErrorKind::IncompatibleItem,
            Self::UnknownBeeType(_)
            | Self::InvalidInput(_)
            | Self::InvalidConfig(_)
            | Self::ArithmeticOverflow => ErrorKind::InvalidInput,
        }
    }
}

/// Result type for apiary operations.
pub type LandResult<T> = Result<T, LandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(LandError::ApiaryNotFound(AccountId::ZERO).kind(), ErrorKind::NotFound);
        assert_eq!(
            LandError::InsufficientSlots { required: 11, available: 10 }.kind(),
            ErrorKind::CapacityExceeded
        );
        assert_eq!(
            LandError::BeeDoesNotSupportItem { slot: BeeSlot::Bee1, item_id: 3 }.kind(),
            ErrorKind::IncompatibleItem
        );
        assert_eq!(LandError::UnknownBeeType(42).kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_messages() {
        let err = LandError::InsufficientSlots { required: 600, available: 114 };
        assert_eq!(err.to_string(), "not enough slots: 600 required, 114 available");
        assert_eq!(LandError::ItemNotFound(99).to_string(), "item does not exist: 99");
    }
}
