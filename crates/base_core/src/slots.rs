//! Typed accessors over a base's four equipment slots.

use crate::{BaseState, ItemCategory, ItemInstance};

impl BaseState {
    /// Current occupant of `category`'s slot.
    pub fn get(&self, category: ItemCategory) -> Option<&ItemInstance> {
        match category.extra_index() {
            None => self.cpu_slot.as_ref(),
            Some(index) => self.extra_slots[index].as_ref(),
        }
    }

    /// Unconditional overwrite. Invariants are the caller's responsibility.
    pub(crate) fn set(&mut self, category: ItemCategory, instance: Option<ItemInstance>) {
        match category.extra_index() {
            None => self.cpu_slot = instance,
            Some(index) => self.extra_slots[index] = instance,
        }
    }

    pub(crate) fn get_mut(&mut self, category: ItemCategory) -> Option<&mut ItemInstance> {
        match category.extra_index() {
            None => self.cpu_slot.as_mut(),
            Some(index) => self.extra_slots[index].as_mut(),
        }
    }

    /// Every filled slot, CPU first.
    pub fn occupants(&self) -> impl Iterator<Item = (ItemCategory, &ItemInstance)> {
        ItemCategory::ALL
            .into_iter()
            .filter_map(|category| self.get(category).map(|instance| (category, instance)))
    }

    /// Occupant of `category`, only if construction has finished.
    pub fn completed(&self, category: ItemCategory) -> Option<&ItemInstance> {
        self.get(category).filter(|instance| instance.done)
    }
}
