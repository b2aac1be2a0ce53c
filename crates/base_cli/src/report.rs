//! Plain-text base reports: slots, room, power and detection.

use base_core::{
    detection_accuracy, get_detect_chance, power_budget, room_usage, BaseState, DetectionAccuracy,
    DetectionGroup, GameContent, GameState, ItemCategory, ItemInstance,
};
use std::fmt::Write;

pub fn render(state: &GameState, content: &GameContent) -> String {
    let accuracy = detection_accuracy(&state.research, &content.constants);
    let mut out = String::new();
    let _ = writeln!(out, "[tick={:05}]", state.meta.tick);
    for base in &state.bases {
        render_base(&mut out, base, content, accuracy);
    }
    out
}

fn render_base(
    out: &mut String,
    base: &BaseState,
    content: &GameContent,
    accuracy: DetectionAccuracy,
) {
    let type_name = content
        .base_type(&base.type_id)
        .map_or(base.type_id.0.as_str(), |def| def.name.as_str());
    let _ = writeln!(
        out,
        "  {} ({type_name}, {}) state={:?} cpu={}",
        base.name, base.location, base.power_state, base.processor_time
    );

    for category in ItemCategory::ALL {
        let slot = base
            .get(category)
            .map_or_else(|| "-".to_string(), |instance| describe(instance, content));
        let _ = writeln!(out, "    {category:<8} {slot}");
    }

    if let Some(room) = room_usage(base, content) {
        let _ = writeln!(
            out,
            "    room     {:.1}/{:.1} m2{}",
            room.used_m2,
            room.total_m2,
            if room.at_max { " (full)" } else { "" }
        );
    }

    let budget = power_budget(base, content);
    let _ = writeln!(
        out,
        "    power    {}/{}{}",
        budget.demand,
        budget.supply,
        if budget.is_satisfied() { "" } else { " UNDERPOWERED" }
    );

    if accuracy == DetectionAccuracy::Unknown {
        let _ = writeln!(out, "    detect   unknown");
        return;
    }
    let chance = get_detect_chance(base, content, accuracy == DetectionAccuracy::Exact);
    let groups: Vec<String> = DetectionGroup::ALL
        .iter()
        .map(|group| {
            let pct = chance.get(group).copied().unwrap_or(0.0) * 100.0;
            if accuracy == DetectionAccuracy::Exact {
                format!("{group:?}={pct:.2}%")
            } else {
                format!("{group:?}~{pct:.1}%")
            }
        })
        .collect();
    let _ = writeln!(out, "    detect   {}", groups.join(" "));
}

fn describe(instance: &ItemInstance, content: &GameContent) -> String {
    let name = content
        .item_def(&instance.item_type)
        .map_or(instance.item_type.0.as_str(), |def| def.name.as_str());
    let count = if instance.count > 1 {
        format!(" x{}", instance.count)
    } else {
        String::new()
    };
    if instance.done {
        format!("{name}{count}")
    } else {
        format!("{name}{count} (building, {} ticks left)", instance.cost_left)
    }
}
