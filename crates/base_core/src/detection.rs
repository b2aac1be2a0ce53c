//! Detection-risk estimates, graded by how much socioanalytics research the
//! player has finished.

use std::collections::BTreeMap;

use crate::{
    BaseState, Constants, DetectionGroup, GameContent, ItemCategory, PowerState, ResearchState,
    BASIS_POINTS,
};

/// Estimated discovery chance per group, as a ratio in `[0, 1]`.
pub type DetectChance = BTreeMap<DetectionGroup, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DetectionAccuracy {
    /// No estimate may be shown.
    Unknown,
    /// Estimates are rounded to the coarse step.
    Coarse,
    Exact,
}

pub fn detection_accuracy(research: &ResearchState, constants: &Constants) -> DetectionAccuracy {
    if !research.is_done(&constants.socioanalytics_tech) {
        DetectionAccuracy::Unknown
    } else if research.is_done(&constants.advanced_socioanalytics_tech) {
        DetectionAccuracy::Exact
    } else {
        DetectionAccuracy::Coarse
    }
}

/// Discovery chance per group in basis points, before any rounding.
pub fn detect_chance_bp(base: &BaseState, content: &GameContent) -> BTreeMap<DetectionGroup, u32> {
    let base_type = content.base_type(&base.type_id);
    let reduction_bp = base
        .completed(ItemCategory::Security)
        .and_then(|security| content.item_def(&security.item_type))
        .map_or(0, |def| u64::from(def.quality.min(BASIS_POINTS)));

    DetectionGroup::ALL
        .into_iter()
        .map(|group| {
            let raw = base_type
                .and_then(|def| def.detect_chance.get(&group))
                .copied()
                .map_or(0, u64::from);
            let (num, den) = power_state_factor(base.power_state);
            let scaled = raw * num / den;
            let full = u64::from(BASIS_POINTS);
            let shielded = scaled * (full - reduction_bp) / full;
            let clamped = u32::try_from(shielded.min(full)).unwrap_or(BASIS_POINTS);
            (group, clamped)
        })
        .collect()
}

/// Detection chance for every group. Callers gate this behind the
/// socioanalytics research; `accurate` reflects the advanced tier.
///
/// Inaccurate estimates are rounded to the nearest coarse step, so repeated
/// calls on an unchanged base agree exactly.
pub fn get_detect_chance(base: &BaseState, content: &GameContent, accurate: bool) -> DetectChance {
    let step = content.constants.detection_coarse_step_bp;
    detect_chance_bp(base, content)
        .into_iter()
        .map(|(group, bp)| {
            let shown = if accurate { bp } else { nearest_step(bp, step) };
            (group, f64::from(shown) / f64::from(BASIS_POINTS))
        })
        .collect()
}

/// `(numerator, denominator)` applied to raw chances.
fn power_state_factor(state: PowerState) -> (u64, u64) {
    match state {
        PowerState::Active => (1, 1),
        PowerState::Sleep
        | PowerState::Stasis
        | PowerState::EnteringStasis
        | PowerState::LeavingStasis => (1, 2),
        PowerState::Overclocked => (3, 2),
        PowerState::Suicide => (2, 1),
    }
}

/// Round to the nearest multiple of `step`, ties upward.
fn nearest_step(value: u32, step: u32) -> u32 {
    if step == 0 {
        return value;
    }
    let rounded = (value + step / 2) / step * step;
    rounded.min(BASIS_POINTS)
}
