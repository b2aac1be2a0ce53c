//! Validation of the shipped `content/*.json` files and the sample scenario.
//!
//! Checks that every file deserializes, references resolve, and the starting
//! position is playable.

use base_core::{
    list_buildable, power_budget, room_usage, GameContent, ItemCategory, LocationId, PowerState,
    ResearchState, TechId,
};
use base_world::{build_initial_state, load_content, load_scenario, seeded_rng};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Integration tests run from the crate directory, so go up two levels.
fn content_dir() -> PathBuf {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    PathBuf::from(manifest).join("../../content")
}

fn load_test_content() -> &'static GameContent {
    static CONTENT: OnceLock<GameContent> = OnceLock::new();
    CONTENT.get_or_init(|| {
        load_content(content_dir().to_str().expect("utf-8 path"))
            .expect("load_content should succeed for shipped content")
    })
}

#[test]
fn content_loads_successfully() {
    let _content = load_test_content();
}

#[test]
fn every_category_has_an_unlocked_choice() {
    let content = load_test_content();
    let research = ResearchState::default();
    let anywhere = LocationId::new("loc_north_america");
    for category in ItemCategory::ALL {
        assert!(
            !list_buildable(content, &research, category, &anywhere).is_empty(),
            "no {category} item is buildable without research",
        );
    }
}

#[test]
fn build_times_and_names_are_set() {
    let content = load_test_content();
    for item in &content.item_types {
        assert!(!item.name.is_empty(), "item '{}' has no name", item.id);
        assert!(item.build_ticks > 0, "item '{}' builds instantly", item.id);
    }
}

#[test]
fn cpu_items_produce_processor_time() {
    let content = load_test_content();
    for item in content
        .item_types
        .iter()
        .filter(|item| item.category == ItemCategory::Cpu)
    {
        assert!(item.cpu > 0, "cpu item '{}' computes nothing", item.id);
    }
}

#[test]
fn fixed_cpu_base_types_hold_one_unit() {
    let content = load_test_content();
    for base_type in content.base_types.iter().filter(|def| def.force_cpu) {
        assert_eq!(base_type.size, 1, "base type '{}'", base_type.id);
    }
}

#[test]
fn research_unlocks_more_cpus() {
    let content = load_test_content();
    let mut research = ResearchState::default();
    let moon = LocationId::new("loc_moon");
    let before = list_buildable(content, &research, ItemCategory::Cpu, &moon).len();
    research
        .completed
        .insert(TechId::new("tech_quantum_computing"));
    let after = list_buildable(content, &research, ItemCategory::Cpu, &moon).len();
    assert!(after > before);
}

#[test]
fn sample_scenario_builds() {
    let content = load_test_content();
    let scenario = load_scenario(&content_dir().join("scenario.json")).expect("scenario parses");
    let seed = scenario.seed.unwrap_or(0);
    let state = build_initial_state(content, &scenario, seed, &mut seeded_rng(seed))
        .expect("sample scenario is valid");

    assert_eq!(state.bases.len(), scenario.bases.len());
    for base in &state.bases {
        assert!(
            base.power_satisfied,
            "base '{}' starts underpowered: {:?}",
            base.name,
            power_budget(base, content)
        );
    }
    let sleeping = state
        .bases
        .iter()
        .find(|base| base.power_state == PowerState::Sleep)
        .expect("scenario has a sleeping base");
    assert_eq!(sleeping.processor_time, 0);
    assert!(room_usage(sleeping, content).is_some());
}
