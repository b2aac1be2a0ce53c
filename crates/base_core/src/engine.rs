use crate::{Event, EventEnvelope, GameContent, GameState, ItemCategory};

/// Advance the simulation by one tick.
///
/// Order of operations:
/// 1. Advance construction of every unfinished item by one tick.
/// 2. Reconcile power and CPU output on bases where something finished.
/// 3. Increment tick counter.
///
/// Returns all events produced this tick.
pub fn tick(state: &mut GameState, content: &GameContent) -> Vec<EventEnvelope> {
    let mut events = Vec::new();

    for base_idx in 0..state.bases.len() {
        let finished = advance_construction(state, base_idx, &mut events);
        if finished {
            crate::power::refresh_base(state, base_idx, content, &mut events);
        }
    }

    state.meta.tick += 1;
    events
}

/// Returns true if any item on the base finished this tick.
fn advance_construction(
    state: &mut GameState,
    base_idx: usize,
    events: &mut Vec<EventEnvelope>,
) -> bool {
    let current_tick = state.meta.tick;
    let mut finished = false;

    for category in ItemCategory::ALL {
        let base = &mut state.bases[base_idx];
        let Some(instance) = base.get_mut(category) else {
            continue;
        };
        if instance.done {
            continue;
        }
        instance.cost_left = instance.cost_left.saturating_sub(1);
        if instance.cost_left > 0 {
            continue;
        }
        instance.done = true;
        finished = true;

        let item_type = instance.item_type.clone();
        let base_id = base.id.clone();
        events.push(crate::emit(
            &mut state.counters,
            current_tick,
            Event::ConstructionCompleted {
                base_id,
                category,
                item_type,
            },
        ));
    }
    finished
}
