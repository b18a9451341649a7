//! # Bee Slots
//!
//! The seven bee types are a closed set. Every per-bee table (counts,
//! equipped items, profit rates, slot costs) is a `BeeArray` indexed by
//! `BeeSlot`, never by a bare integer.
//!
//! External callers address bee types by id `1..=7`; the slot index is
//! `id - 1`.

use std::fmt;

use apiary_shared::BEE_TYPES;

use crate::error::{LandError, LandResult};

/// One value per bee slot.
pub type BeeArray<T> = [T; BEE_TYPES];

/// Bee type / bee slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BeeSlot {
    /// Bee id 1.
    Bee1 = 0,
    /// Bee id 2.
    Bee2 = 1,
    /// Bee id 3.
    Bee3 = 2,
    /// Bee id 4.
    Bee4 = 3,
    /// Bee id 5.
    Bee5 = 4,
    /// Bee id 6.
    Bee6 = 5,
    /// Bee id 7.
    Bee7 = 6,
}

impl BeeSlot {
    /// All slots in index order.
    pub const ALL: BeeArray<Self> = [
        Self::Bee1,
        Self::Bee2,
        Self::Bee3,
        Self::Bee4,
        Self::Bee5,
        Self::Bee6,
        Self::Bee7,
    ];

    /// Array index of this slot (0..=6).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// External bee id of this slot (1..=7).
    #[inline]
    #[must_use]
    pub const fn bee_id(self) -> u32 {
        self as u32 + 1
    }

    /// Converts an array index to a slot.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < BEE_TYPES {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Converts an external bee id to a slot.
    ///
    /// # Errors
    ///
    /// Returns `LandError::UnknownBeeType` for ids outside `1..=7`.
    pub fn from_bee_id(bee_id: u32) -> LandResult<Self> {
        bee_id
            .checked_sub(1)
            .and_then(|index| Self::from_index(index as usize))
            .ok_or(LandError::UnknownBeeType(bee_id))
    }
}

impl fmt::Display for BeeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.bee_id())
    }
}
