//! The only path that changes what occupies a slot.
//!
//! CPU assignments stack onto a matching type and replace anything else.
//! Reactor, network and security assignments replace a different type and
//! are a no-op for the type already installed. Every failure leaves the base
//! exactly as it was.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    BaseId, BaseTypeDef, BaseTypeId, Event, EventEnvelope, GameContent, GameState, ItemCategory,
    ItemDef, ItemInstance, ItemTypeId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub category: ItemCategory,
    pub item_type: ItemTypeId,
    /// Units to build. Only read for the CPU slot.
    pub count: i64,
}

impl AssignRequest {
    pub fn new(category: ItemCategory, item_type: impl Into<String>, count: i64) -> Self {
        Self {
            category,
            item_type: ItemTypeId(item_type.into()),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("unknown base '{0}'")]
    UnknownBase(BaseId),
    #[error("unknown base type '{0}'")]
    UnknownBaseType(BaseTypeId),
    #[error("unknown item type '{0}'")]
    UnknownItemType(ItemTypeId),
    #[error("item type '{item_type}' is a {actual} item, not {expected}")]
    CategoryMismatch {
        item_type: ItemTypeId,
        expected: ItemCategory,
        actual: ItemCategory,
    },
    #[error("count must be positive, got {0}")]
    InvalidCount(i64),
    #[error("requested {requested} units but only {available} fit")]
    CapacityExceeded { requested: u32, available: u32 },
    #[error("the cpu slot of base '{0}' is fixed by its base type")]
    SlotLocked(BaseId),
    #[error("pending assignment {0} no longer matches the base")]
    StalePending(u64),
}

/// A mutation that went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub category: ItemCategory,
    pub instance: ItemInstance,
    /// Units were stacked onto an existing allocation of the same type.
    pub merged: bool,
    pub power_satisfied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    Applied(Applied),
    /// The requested type is already installed; nothing changed.
    Unchanged,
    /// Stacking onto completed CPUs takes them offline until the new units
    /// finish. Nothing changes until `confirm_and_assign` is called.
    NeedsConfirmation(PendingAssignment),
}

/// Token for a CPU merge awaiting an explicit decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAssignment {
    pub id: u64,
    pub base_id: BaseId,
    pub item_type: ItemTypeId,
    pub count: u32,
    /// CPU slot contents when the token was issued.
    snapshot: ItemInstance,
}

impl PendingAssignment {
    /// The completed allocation that would be taken offline.
    pub fn existing(&self) -> &ItemInstance {
        &self.snapshot
    }
}

/// Validate and apply `request` to the base's slot.
pub fn assign(
    state: &mut GameState,
    base_id: &BaseId,
    request: &AssignRequest,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) -> Result<Assignment, AssignError> {
    let base_idx = base_index(state, base_id)?;
    let base = &state.bases[base_idx];
    let base_type = content
        .base_type(&base.type_id)
        .ok_or_else(|| AssignError::UnknownBaseType(base.type_id.clone()))?;

    if request.category == ItemCategory::Cpu {
        ensure_unlocked(base_id, base_type)?;
    }

    let def = content
        .item_def(&request.item_type)
        .ok_or_else(|| AssignError::UnknownItemType(request.item_type.clone()))?;
    if def.category != request.category {
        return Err(AssignError::CategoryMismatch {
            item_type: def.id.clone(),
            expected: request.category,
            actual: def.category,
        });
    }

    if request.category != ItemCategory::Cpu {
        return Ok(assign_extra(state, base_idx, def, content, events));
    }

    let units = validate_cpu(base_id, base_type, def, request.count)?;
    let plan = plan_cpu(&state.bases[base_idx], base_type.size, &def.id, units)?;

    if plan.merged {
        if let Some(existing) = state.bases[base_idx].cpu_slot.clone().filter(|e| e.done) {
            return Ok(Assignment::NeedsConfirmation(propose(
                state, base_id, def, units, existing, events,
            )));
        }
    }

    Ok(Assignment::Applied(apply_cpu(
        state, base_idx, def, units, plan, content, events,
    )))
}

/// Apply a merge that was held back for confirmation.
pub fn confirm_and_assign(
    state: &mut GameState,
    pending: PendingAssignment,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) -> Result<Applied, AssignError> {
    let base_idx = base_index(state, &pending.base_id)?;
    let base = &state.bases[base_idx];
    let base_type = content
        .base_type(&base.type_id)
        .ok_or_else(|| AssignError::UnknownBaseType(base.type_id.clone()))?;
    let def = content
        .item_def(&pending.item_type)
        .ok_or_else(|| AssignError::UnknownItemType(pending.item_type.clone()))?;
    let units = validate_cpu(&pending.base_id, base_type, def, i64::from(pending.count))?;

    // The token only ever stacks onto the allocation it was issued against.
    let stale = pending.snapshot.item_type != def.id
        || base.cpu_slot.as_ref() != Some(&pending.snapshot);
    if stale {
        return Err(AssignError::StalePending(pending.id));
    }
    let plan = plan_cpu(base, base_type.size, &def.id, units)?;

    Ok(apply_cpu(state, base_idx, def, units, plan, content, events))
}

/// Discard a pending merge. The base is left untouched.
pub fn cancel(state: &mut GameState, pending: PendingAssignment, events: &mut Vec<EventEnvelope>) {
    events.push(crate::emit(
        &mut state.counters,
        state.meta.tick,
        Event::AssignmentCancelled {
            base_id: pending.base_id,
            pending_id: pending.id,
        },
    ));
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct CpuPlan {
    merged: bool,
    /// Resulting occupancy of the CPU slot.
    total: u32,
}

fn base_index(state: &GameState, base_id: &BaseId) -> Result<usize, AssignError> {
    state
        .bases
        .iter()
        .position(|base| &base.id == base_id)
        .ok_or_else(|| AssignError::UnknownBase(base_id.clone()))
}

fn ensure_unlocked(base_id: &BaseId, base_type: &BaseTypeDef) -> Result<(), AssignError> {
    if base_type.force_cpu {
        return Err(AssignError::SlotLocked(base_id.clone()));
    }
    Ok(())
}

/// Structural checks shared by direct assignments and confirmed merges.
/// Returns the unit count to build.
fn validate_cpu(
    base_id: &BaseId,
    base_type: &BaseTypeDef,
    def: &ItemDef,
    count: i64,
) -> Result<u32, AssignError> {
    ensure_unlocked(base_id, base_type)?;
    if def.category != ItemCategory::Cpu {
        return Err(AssignError::CategoryMismatch {
            item_type: def.id.clone(),
            expected: ItemCategory::Cpu,
            actual: def.category,
        });
    }
    if count <= 0 {
        return Err(AssignError::InvalidCount(count));
    }
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

fn plan_cpu(
    base: &crate::BaseState,
    size: u32,
    item_type: &ItemTypeId,
    units: u32,
) -> Result<CpuPlan, AssignError> {
    match &base.cpu_slot {
        Some(existing) if &existing.item_type == item_type => {
            let available = size.saturating_sub(existing.count);
            if units > available {
                return Err(AssignError::CapacityExceeded {
                    requested: units,
                    available,
                });
            }
            Ok(CpuPlan {
                merged: true,
                total: existing.count.saturating_add(units),
            })
        }
        _ => {
            if units > size {
                return Err(AssignError::CapacityExceeded {
                    requested: units,
                    available: size,
                });
            }
            Ok(CpuPlan {
                merged: false,
                total: units,
            })
        }
    }
}

fn propose(
    state: &mut GameState,
    base_id: &BaseId,
    def: &ItemDef,
    units: u32,
    existing: ItemInstance,
    events: &mut Vec<EventEnvelope>,
) -> PendingAssignment {
    let pending = PendingAssignment {
        id: state.counters.next_pending_id,
        base_id: base_id.clone(),
        item_type: def.id.clone(),
        count: units,
        snapshot: existing,
    };
    state.counters.next_pending_id += 1;
    events.push(crate::emit(
        &mut state.counters,
        state.meta.tick,
        Event::AssignmentPending {
            base_id: base_id.clone(),
            pending_id: pending.id,
        },
    ));
    pending
}

fn apply_cpu(
    state: &mut GameState,
    base_idx: usize,
    def: &ItemDef,
    units: u32,
    plan: CpuPlan,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) -> Applied {
    let base = &mut state.bases[base_idx];
    // A merge keeps what is left of the existing build and queues the new units.
    let carried = if plan.merged {
        base.cpu_slot.as_ref().map_or(0, |existing| existing.cost_left)
    } else {
        0
    };
    let cost_left = carried.saturating_add(def.build_ticks.saturating_mul(u64::from(units)));
    let instance = ItemInstance {
        item_type: def.id.clone(),
        count: plan.total,
        done: cost_left == 0,
        cost_left,
    };
    base.set(ItemCategory::Cpu, Some(instance.clone()));
    finish(state, base_idx, ItemCategory::Cpu, instance, plan.merged, content, events)
}

fn assign_extra(
    state: &mut GameState,
    base_idx: usize,
    def: &ItemDef,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) -> Assignment {
    let category = def.category;
    let base = &mut state.bases[base_idx];
    if base
        .get(category)
        .is_some_and(|existing| existing.item_type == def.id)
    {
        return Assignment::Unchanged;
    }
    let instance = ItemInstance {
        item_type: def.id.clone(),
        count: 1,
        done: def.build_ticks == 0,
        cost_left: def.build_ticks,
    };
    base.set(category, Some(instance.clone()));
    Assignment::Applied(finish(
        state, base_idx, category, instance, false, content, events,
    ))
}

fn finish(
    state: &mut GameState,
    base_idx: usize,
    category: ItemCategory,
    instance: ItemInstance,
    merged: bool,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) -> Applied {
    let base_id = state.bases[base_idx].id.clone();
    events.push(crate::emit(
        &mut state.counters,
        state.meta.tick,
        Event::SlotAssigned {
            base_id,
            category,
            item_type: instance.item_type.clone(),
            count: instance.count,
            merged,
        },
    ));
    crate::power::refresh_base(state, base_idx, content, events);
    Applied {
        category,
        instance,
        merged,
        power_satisfied: state.bases[base_idx].power_satisfied,
    }
}
