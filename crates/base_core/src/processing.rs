use crate::{BaseState, GameContent, ItemCategory, BASIS_POINTS};

/// CPU output of the base's current loadout.
///
/// Completed CPUs give `count * cpu`; a completed network item adds its
/// quality (basis points) on top. Dormant or underpowered bases compute nothing.
pub fn processor_output(base: &BaseState, content: &GameContent) -> u64 {
    if base.power_state.is_dormant() || !base.power_satisfied {
        return 0;
    }
    let Some(cpus) = base.completed(ItemCategory::Cpu) else {
        return 0;
    };
    let per_unit = content.item_def(&cpus.item_type).map_or(0, |def| def.cpu);
    let raw = per_unit.saturating_mul(u64::from(cpus.count));

    let bonus_bp = base
        .completed(ItemCategory::Network)
        .and_then(|network| content.item_def(&network.item_type))
        .map_or(0, |def| u64::from(def.quality));
    let bonus = u128::from(raw) * u128::from(bonus_bp) / u128::from(BASIS_POINTS);
    raw.saturating_add(u64::try_from(bonus).unwrap_or(u64::MAX))
}

pub fn recalc_cpu(base: &mut BaseState, content: &GameContent) {
    base.processor_time = processor_output(base, content);
}
