//! CPU room accounting: what fits, how to offer a bounded count, floor area.

use crate::{BaseState, GameContent, ItemTypeId};

/// Bounded choice of CPU units to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSelector {
    pub max: u32,
    /// Coarse increment for paging through the range.
    pub step: u32,
    pub default: u32,
}

impl CountSelector {
    pub fn for_space(space_left: u32) -> Self {
        Self {
            max: space_left,
            step: space_left / 10 + 1,
            default: u32::from(space_left > 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomUsage {
    pub used_m2: f64,
    pub total_m2: f64,
    /// Every capacity unit is occupied.
    pub at_max: bool,
}

/// Units of `item_type` that can still be added to the CPU slot.
///
/// Units of a different type do not count against the room: assigning a new
/// type replaces them outright.
pub fn cpu_space_left(base: &BaseState, content: &GameContent, item_type: &ItemTypeId) -> u32 {
    let Some(base_type) = content.base_type(&base.type_id) else {
        return 0;
    };
    match &base.cpu_slot {
        Some(existing) if &existing.item_type == item_type => {
            base_type.size.saturating_sub(existing.count)
        }
        _ => base_type.size,
    }
}

/// Floor area taken by the CPU slot. `None` for single-unit bases, where room
/// is not a meaningful figure.
pub fn room_usage(base: &BaseState, content: &GameContent) -> Option<RoomUsage> {
    let base_type = content.base_type(&base.type_id)?;
    if base_type.size <= 1 {
        return None;
    }
    let used = base.cpu_slot.as_ref().map_or(0, |cpu| cpu.count);
    let per_unit = content.constants.room_m2_per_unit;
    Some(RoomUsage {
        used_m2: f64::from(used) * per_unit,
        total_m2: f64::from(base_type.size) * per_unit,
        at_max: used == base_type.size,
    })
}
