//! Bag capacity counting.
//!
//! Each distinct item name occupies one slot no matter how many are held.
//! Stacking onto an existing row never needs a free slot.

use ficha_core::InventoryItem;
use serde::{Deserialize, Serialize};

use crate::error::{SheetError, SheetResult};

/// A character's inventory with its capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    /// Item rows, sorted by name.
    pub items: Vec<InventoryItem>,
    /// Slot count.
    pub capacity: u32,
}

impl Bag {
    /// Slots in use.
    pub fn occupied(&self) -> usize {
        self.items.len()
    }

    /// Slots left. Zero if the bag is over capacity.
    pub fn free(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.occupied())
    }

    /// Returns true if no new stack fits.
    pub fn is_full(&self) -> bool {
        self.free() == 0
    }
}

/// Item names are stored trimmed and lowercased.
pub fn normalize_item_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check that a new stack fits.
pub fn ensure_room(occupied: usize, capacity: u32) -> SheetResult<()> {
    if occupied >= capacity as usize {
        return Err(SheetError::CapacityExceeded { capacity });
    }
    Ok(())
}

/// Remove `quantity` from a stack. Returns what is left.
pub fn take(item: &mut InventoryItem, quantity: u32) -> SheetResult<u32> {
    if item.quantity < quantity {
        return Err(SheetError::InsufficientQuantity {
            item: item.name.clone(),
            held: item.quantity,
            requested: quantity,
        });
    }
    item.quantity -= quantity;
    Ok(item.quantity)
}
