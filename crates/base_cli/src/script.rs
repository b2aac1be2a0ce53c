//! Scripted play: a JSON list of steps replayed against a game state.

use anyhow::{ensure, Context, Result};
use base_core::{
    AssignRequest, Assignment, BaseId, Event, EventEnvelope, GameContent, GameState, ItemCategory,
    PowerState, TechId,
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Request an item for a base's slot. `base` is a base name or id.
    Assign {
        base: String,
        category: ItemCategory,
        item: String,
        #[serde(default = "one")]
        count: i64,
    },
    Advance {
        ticks: u64,
    },
    SetPowerState {
        base: String,
        state: PowerState,
    },
    Research {
        tech: TechId,
    },
    Report,
}

fn one() -> i64 {
    1
}

/// What to do when stacking onto completed CPUs asks for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPolicy {
    Accept,
    Decline,
}

/// Tally of how the script's assignments went.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub applied: u32,
    pub unchanged: u32,
    pub confirmed: u32,
    pub cancelled: u32,
    pub rejected: u32,
}

pub fn load_script(path: &Path) -> Result<Vec<Step>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing script {}", path.display()))
}

/// Look a base up by id first, then by display name.
pub fn resolve_base(state: &GameState, key: &str) -> Result<BaseId> {
    state
        .bases
        .iter()
        .find(|base| base.id.0 == key)
        .or_else(|| state.bases.iter().find(|base| base.name == key))
        .map(|base| base.id.clone())
        .with_context(|| format!("no base named '{key}'"))
}

/// Replay `steps` in order. Rejected assignments are logged and skipped;
/// unresolvable bases and unknown techs abort the run.
pub fn run_script(
    state: &mut GameState,
    content: &GameContent,
    steps: &[Step],
    policy: ConfirmPolicy,
    mut on_report: impl FnMut(&GameState),
) -> Result<Outcome> {
    let mut outcome = Outcome::default();
    for (index, step) in steps.iter().enumerate() {
        debug!(index, ?step, "script step");
        match step {
            Step::Assign {
                base,
                category,
                item,
                count,
            } => {
                let base_id = resolve_base(state, base)?;
                let request = AssignRequest::new(*category, item.clone(), *count);
                apply_assign(state, content, &base_id, &request, policy, &mut outcome);
            }
            Step::Advance { ticks } => {
                for _ in 0..*ticks {
                    let events = base_core::tick(state, content);
                    log_events(state, &events);
                }
                info!(tick = state.meta.tick, "advanced {ticks} ticks");
            }
            Step::SetPowerState { base, state: power } => {
                let base_id = resolve_base(state, base)?;
                let mut events = Vec::new();
                let satisfied =
                    base_core::set_power_state(state, &base_id, *power, content, &mut events)?;
                info!(base = %base_id, state = ?power, satisfied, "power state changed");
                log_events(state, &events);
            }
            Step::Research { tech } => {
                ensure!(
                    content.techs.iter().any(|def| &def.id == tech),
                    "unknown tech '{tech}'"
                );
                state.research.completed.insert(tech.clone());
                info!(%tech, "research completed");
            }
            Step::Report => on_report(state),
        }
    }
    Ok(outcome)
}

fn apply_assign(
    state: &mut GameState,
    content: &GameContent,
    base_id: &BaseId,
    request: &AssignRequest,
    policy: ConfirmPolicy,
    outcome: &mut Outcome,
) {
    let mut events = Vec::new();
    match base_core::assign(state, base_id, request, content, &mut events) {
        Ok(Assignment::Applied(applied)) => {
            outcome.applied += 1;
            info!(
                base = %base_id,
                category = %applied.category,
                item = %applied.instance.item_type,
                count = applied.instance.count,
                merged = applied.merged,
                power_satisfied = applied.power_satisfied,
                "slot assigned"
            );
        }
        Ok(Assignment::Unchanged) => {
            outcome.unchanged += 1;
            info!(base = %base_id, item = %request.item_type, "already installed");
        }
        Ok(Assignment::NeedsConfirmation(pending)) => {
            let offline = pending.existing().count;
            match policy {
                ConfirmPolicy::Accept => {
                    match base_core::confirm_and_assign(state, pending, content, &mut events) {
                        Ok(applied) => {
                            outcome.confirmed += 1;
                            info!(
                                base = %base_id,
                                offline,
                                count = applied.instance.count,
                                "confirmed stacking onto completed units"
                            );
                        }
                        Err(err) => {
                            outcome.rejected += 1;
                            warn!(base = %base_id, %err, "confirmation failed");
                        }
                    }
                }
                ConfirmPolicy::Decline => {
                    outcome.cancelled += 1;
                    warn!(
                        base = %base_id,
                        offline,
                        "declined: stacking would take completed units offline"
                    );
                    base_core::cancel(state, pending, &mut events);
                }
            }
        }
        Err(err) => {
            outcome.rejected += 1;
            warn!(base = %base_id, item = %request.item_type, %err, "assignment rejected");
        }
    }
    log_events(state, &events);
}

fn log_events(state: &GameState, events: &[EventEnvelope]) {
    for envelope in events {
        match &envelope.event {
            Event::ConstructionCompleted {
                base_id,
                category,
                item_type,
            } => {
                let name = state.base(base_id).map_or("?", |base| base.name.as_str());
                info!(
                    tick = envelope.tick,
                    base = name,
                    %category,
                    item = %item_type,
                    "construction completed"
                );
            }
            Event::PowerReconciled { base_id, satisfied } => {
                if *satisfied {
                    debug!(base = %base_id, "power reconciled");
                } else {
                    warn!(base = %base_id, "base is underpowered");
                }
            }
            other => debug!(id = %envelope.id, event = ?other, "event"),
        }
    }
}
