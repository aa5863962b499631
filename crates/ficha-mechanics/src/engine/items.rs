use ficha_core::{CharacterKey, CharacterStore, InventoryItem};

use super::Engine;
use crate::error::{SheetError, SheetResult};
use crate::inventory::{self, Bag};

impl<S: CharacterStore> Engine<S> {
    /// Add items to the bag. A new item name needs a free slot; stacking
    /// onto an existing one does not. Returns the stack after adding.
    pub fn add_item(&self, key: &CharacterKey, name: &str, quantity: u32) -> SheetResult<InventoryItem> {
        let name = inventory::normalize_item_name(name);
        if name.is_empty() {
            return Err(SheetError::InvalidResult("item name cannot be empty".to_string()));
        }
        self.exclusive(key, || {
            let c = self.load(key)?;
            let item = match self.store.item(key, &name)? {
                Some(mut existing) => {
                    existing.quantity = existing.quantity.saturating_add(quantity);
                    existing
                }
                None => {
                    inventory::ensure_room(self.store.inventory(key)?.len(), c.bag_capacity)?;
                    InventoryItem {
                        name: name.clone(),
                        quantity,
                    }
                }
            };
            if item.quantity > 0 {
                self.store.upsert_item(key, &item)?;
            }
            tracing::debug!(owner = %key.owner, character = %key.name, item = %item.name, quantity = item.quantity, "item added");
            Ok(item)
        })
    }

    /// Use up items. A stack that reaches zero is removed. Returns how many
    /// are left.
    pub fn use_item(&self, key: &CharacterKey, name: &str, quantity: u32) -> SheetResult<u32> {
        let name = inventory::normalize_item_name(name);
        self.exclusive(key, || {
            self.load(key)?;
            let mut item = self
                .store
                .item(key, &name)?
                .ok_or_else(|| SheetError::not_found("item", name.clone()))?;
            let left = inventory::take(&mut item, quantity)?;
            if left == 0 {
                self.store.delete_item(key, &item.name)?;
            } else {
                self.store.upsert_item(key, &item)?;
            }
            tracing::debug!(owner = %key.owner, character = %key.name, item = %item.name, left, "item used");
            Ok(left)
        })
    }

    /// Grow the bag by `slots`. Returns the new capacity.
    pub fn expand_bag(&self, key: &CharacterKey, slots: u32) -> SheetResult<u32> {
        self.update(key, |c| {
            c.bag_capacity = c.bag_capacity.saturating_add(slots);
            tracing::debug!(owner = %key.owner, character = %key.name, capacity = c.bag_capacity, "bag expanded");
            Ok(c.bag_capacity)
        })
    }

    /// The bag contents with capacity.
    pub fn inventory(&self, key: &CharacterKey) -> SheetResult<Bag> {
        let c = self.load(key)?;
        Ok(Bag {
            items: self.store.inventory(key)?,
            capacity: c.bag_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{engine, kael};
    use super::*;

    #[test]
    fn stacking_needs_no_slot() {
        let engine = engine();
        let key = kael(&engine);
        for i in 0..6 {
            engine.add_item(&key, &format!("item{i}"), 1).unwrap();
        }
        assert!(matches!(
            engine.add_item(&key, "rope", 1),
            Err(SheetError::CapacityExceeded { capacity: 6 })
        ));
        let stacked = engine.add_item(&key, "ITEM0", 4).unwrap();
        assert_eq!(stacked.quantity, 5);

        assert_eq!(engine.expand_bag(&key, 2).unwrap(), 8);
        engine.add_item(&key, "rope", 1).unwrap();
        let bag = engine.inventory(&key).unwrap();
        assert_eq!((bag.occupied(), bag.capacity), (7, 8));
    }

    #[test]
    fn using_items() {
        let engine = engine();
        let key = kael(&engine);
        engine.add_item(&key, "Potion", 2).unwrap();
        assert_eq!(engine.use_item(&key, "potion", 1).unwrap(), 1);
        assert!(matches!(
            engine.use_item(&key, "potion", 5),
            Err(SheetError::InsufficientQuantity { held: 1, .. })
        ));
        assert_eq!(engine.use_item(&key, "potion", 1).unwrap(), 0);
        assert!(engine.inventory(&key).unwrap().items.is_empty());
        assert!(matches!(
            engine.use_item(&key, "potion", 1),
            Err(SheetError::NotFound { .. })
        ));
    }
}
