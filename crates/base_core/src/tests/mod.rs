use super::*;
use crate::test_fixtures::{base_content, base_state, BASE_ID, LOCKED_BASE_ID};

mod construction;

// --- Shared test helpers ------------------------------------------------

fn test_content() -> GameContent {
    base_content()
}

fn test_state(content: &GameContent) -> GameState {
    base_state(content)
}

fn alpha() -> BaseId {
    BaseId::new(BASE_ID)
}

fn cpu(item: &str, count: i64) -> AssignRequest {
    AssignRequest::new(ItemCategory::Cpu, item, count)
}

fn extra(category: ItemCategory, item: &str) -> AssignRequest {
    AssignRequest::new(category, item, 1)
}

fn cpu_slot(state: &GameState) -> Option<&ItemInstance> {
    state.base(&alpha()).unwrap().get(ItemCategory::Cpu)
}

fn power_checks(events: &[EventEnvelope]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e.event, Event::PowerReconciled { .. }))
        .count()
}

/// Unwrap an `Assignment::Applied`, panicking on anything else.
fn expect_applied(outcome: Result<Assignment, AssignError>) -> Applied {
    match outcome {
        Ok(Assignment::Applied(applied)) => applied,
        other => panic!("expected Applied, got {other:?}"),
    }
}

/// Put `count` finished units of `item` into alpha's CPU slot.
fn install_completed_cpus(state: &mut GameState, item: &str, count: u32) {
    state.base_mut(&alpha()).unwrap().cpu_slot = Some(ItemInstance {
        item_type: ItemTypeId::new(item),
        count,
        done: true,
        cost_left: 0,
    });
}

/// Tick until nothing on any base is under construction.
fn run_construction(state: &mut GameState, content: &GameContent) -> Vec<EventEnvelope> {
    let mut events = Vec::new();
    while state
        .bases
        .iter()
        .any(|base| base.occupants().any(|(_, instance)| !instance.done))
    {
        events.extend(tick(state, content));
    }
    events
}
