//! Power reconciliation: does the installed loadout have enough supply?
//!
//! Supply = intrinsic base-type supply + completed items' `power_supply`.
//! Demand = completed items' `power_draw` (CPU draw scales with `count`).
//! Items under construction neither draw nor supply. Dormant bases demand
//! nothing.

use crate::{
    AssignError, BaseId, BaseState, EventEnvelope, GameContent, GameState, ItemCategory, PowerState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerBudget {
    pub supply: u64,
    pub demand: u64,
}

impl PowerBudget {
    pub fn is_satisfied(&self) -> bool {
        self.supply >= self.demand
    }
}

pub fn power_budget(base: &BaseState, content: &GameContent) -> PowerBudget {
    let mut supply = content
        .base_type(&base.type_id)
        .map_or(0, |base_type| u64::from(base_type.power_supply));
    let mut demand = 0_u64;

    for category in ItemCategory::ALL {
        let Some(instance) = base.completed(category) else {
            continue;
        };
        let Some(def) = content.item_def(&instance.item_type) else {
            continue;
        };
        let units = u64::from(instance.count);
        supply = supply.saturating_add(u64::from(def.power_supply) * units);
        demand = demand.saturating_add(u64::from(def.power_draw) * units);
    }

    if base.power_state.is_dormant() {
        demand = 0;
    }
    PowerBudget { supply, demand }
}

/// Recompute and cache `power_satisfied`. Returns the new value.
pub fn reconcile_power(base: &mut BaseState, content: &GameContent) -> bool {
    base.power_satisfied = power_budget(base, content).is_satisfied();
    base.power_satisfied
}

/// Switch a base's power state, then reconcile power and CPU output.
/// Returns whether power is satisfied afterwards.
pub fn set_power_state(
    state: &mut GameState,
    base_id: &BaseId,
    power_state: PowerState,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) -> Result<bool, AssignError> {
    let base_idx = state
        .bases
        .iter()
        .position(|base| &base.id == base_id)
        .ok_or_else(|| AssignError::UnknownBase(base_id.clone()))?;
    state.bases[base_idx].power_state = power_state;
    refresh_base(state, base_idx, content, events);
    Ok(state.bases[base_idx].power_satisfied)
}

/// Post-mutation bookkeeping shared by assignment and construction:
/// reconcile power, refresh CPU output, and record the reconciliation.
pub(crate) fn refresh_base(
    state: &mut GameState,
    base_idx: usize,
    content: &GameContent,
    events: &mut Vec<EventEnvelope>,
) {
    let base = &mut state.bases[base_idx];
    let satisfied = reconcile_power(base, content);
    crate::processing::recalc_cpu(base, content);
    let base_id = base.id.clone();
    events.push(crate::emit(
        &mut state.counters,
        state.meta.tick,
        crate::Event::PowerReconciled { base_id, satisfied },
    ));
}
