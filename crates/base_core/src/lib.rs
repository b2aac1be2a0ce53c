//! `base_core` — base loadout rules.
//!
//! Slot assignment, power reconciliation, and detection estimates for a
//! single facility. No IO, no rendering; catalogs are passed in explicitly.

mod assign;
mod capacity;
mod catalog;
mod detection;
mod engine;
mod id;
mod power;
mod processing;
mod roster;
mod slots;
#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;
mod types;

pub use assign::{
    assign, cancel, confirm_and_assign, Applied, AssignError, AssignRequest, Assignment,
    PendingAssignment,
};
pub use capacity::{cpu_space_left, room_usage, CountSelector, RoomUsage};
pub use catalog::{current_choice, list_buildable};
pub use detection::{
    detect_chance_bp, detection_accuracy, get_detect_chance, DetectChance, DetectionAccuracy,
};
pub use engine::tick;
pub use id::generate_uuid;
pub use power::{power_budget, reconcile_power, set_power_state, PowerBudget};
pub use processing::{processor_output, recalc_cpu};
pub use roster::next_base;
pub use types::*;

pub(crate) fn emit(counters: &mut Counters, tick: u64, event: Event) -> EventEnvelope {
    let id = EventId(format!("evt_{:06}", counters.next_event_id));
    counters.next_event_id += 1;
    EventEnvelope { id, tick, event }
}

#[cfg(test)]
mod tests;
