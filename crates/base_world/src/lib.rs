//! Content loading and starting-scenario construction shared by the CLI and tests.

use anyhow::{bail, ensure, Context, Result};
use base_core::{
    BaseId, BaseState, BaseTypeDef, BaseTypeId, Constants, Counters, GameContent, GameState,
    ItemCategory, ItemDef, ItemInstance, ItemTypeId, LocationId, MetaState, PowerState,
    ResearchState, TechDef, TechId, BASIS_POINTS,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Deserialize)]
struct TechsFile {
    content_version: String,
    techs: Vec<TechDef>,
}

#[derive(Deserialize)]
struct ItemsFile {
    items: Vec<ItemDef>,
}

#[derive(Deserialize)]
struct BaseTypesFile {
    base_types: Vec<BaseTypeDef>,
}

/// Starting position: which bases exist and what research is already done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub research: Vec<TechId>,
    pub bases: Vec<ScenarioBase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioBase {
    pub name: String,
    pub type_id: BaseTypeId,
    pub location: LocationId,
    #[serde(default)]
    pub power_state: PowerState,
    /// Items installed already complete. At most one per category.
    #[serde(default)]
    pub installed: Vec<InstalledItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledItem {
    pub item_type: ItemTypeId,
    #[serde(default = "one")]
    pub count: u32,
}

fn one() -> u32 {
    1
}

/// Validates cross-references in loaded content, panicking on any authoring error.
///
/// Catches duplicate ids, item prereqs naming unknown techs, detection
/// constants pointing at missing techs, and out-of-range basis-point values.
pub fn validate_content(content: &GameContent) {
    let mut tech_ids: HashSet<&TechId> = HashSet::new();
    for tech in &content.techs {
        assert!(tech_ids.insert(&tech.id), "duplicate tech id '{}'", tech.id);
    }

    let mut item_ids: HashSet<&ItemTypeId> = HashSet::new();
    for item in &content.item_types {
        assert!(item_ids.insert(&item.id), "duplicate item id '{}'", item.id);
        if let Some(prereq) = &item.prereq {
            assert!(
                tech_ids.contains(prereq),
                "item '{}' prereq '{}' is not a known tech id",
                item.id,
                prereq,
            );
        }
        if matches!(item.category, ItemCategory::Network | ItemCategory::Security) {
            assert!(
                item.quality <= BASIS_POINTS,
                "item '{}' quality {} exceeds {BASIS_POINTS} basis points",
                item.id,
                item.quality,
            );
        }
    }

    let mut base_type_ids: HashSet<&BaseTypeId> = HashSet::new();
    for base_type in &content.base_types {
        assert!(
            base_type_ids.insert(&base_type.id),
            "duplicate base type id '{}'",
            base_type.id
        );
        assert!(
            base_type.size > 0,
            "base type '{}' must hold at least one CPU unit",
            base_type.id
        );
        for (group, chance) in &base_type.detect_chance {
            assert!(
                *chance <= BASIS_POINTS,
                "base type '{}' detect chance for {group:?} exceeds {BASIS_POINTS} basis points",
                base_type.id,
            );
        }
    }

    let constants = &content.constants;
    for tech in [
        &constants.socioanalytics_tech,
        &constants.advanced_socioanalytics_tech,
    ] {
        assert!(
            tech_ids.contains(tech),
            "detection research '{tech}' is not a known tech id"
        );
    }
    assert!(
        (1..=BASIS_POINTS).contains(&constants.detection_coarse_step_bp),
        "detection_coarse_step_bp must be in 1..={BASIS_POINTS}, got {}",
        constants.detection_coarse_step_bp,
    );
    assert!(
        constants.room_m2_per_unit > 0.0,
        "room_m2_per_unit must be positive, got {}",
        constants.room_m2_per_unit,
    );
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let text = std::fs::read_to_string(dir.join(file)).with_context(|| format!("reading {file}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {file}"))
}

pub fn load_content(content_dir: &str) -> Result<GameContent> {
    let dir = Path::new(content_dir);
    let constants: Constants = read_json(dir, "constants.json")?;
    let techs_file: TechsFile = read_json(dir, "techs.json")?;
    let items_file: ItemsFile = read_json(dir, "items.json")?;
    let base_types_file: BaseTypesFile = read_json(dir, "base_types.json")?;
    let content = GameContent {
        content_version: techs_file.content_version,
        item_types: items_file.items,
        base_types: base_types_file.base_types,
        techs: techs_file.techs,
        constants,
    };
    validate_content(&content);
    Ok(content)
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
}

/// Load a previously saved `GameState`.
pub fn load_state(path: &Path) -> Result<GameState> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading state {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing state {}", path.display()))
}

pub fn save_state(state: &GameState, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("serializing state")?;
    std::fs::write(path, json).with_context(|| format!("writing state {}", path.display()))
}

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Build the starting `GameState` for `scenario`. Base ids are drawn from `rng`.
pub fn build_initial_state(
    content: &GameContent,
    scenario: &Scenario,
    seed: u64,
    rng: &mut impl Rng,
) -> Result<GameState> {
    let mut completed = HashSet::new();
    for tech in &scenario.research {
        ensure!(
            content.techs.iter().any(|def| &def.id == tech),
            "scenario research '{tech}' is not a known tech id"
        );
        completed.insert(tech.clone());
    }

    let mut bases = Vec::with_capacity(scenario.bases.len());
    for spec in &scenario.bases {
        let mut base = build_base(content, spec, BaseId::generate(rng))?;
        base_core::reconcile_power(&mut base, content);
        base_core::recalc_cpu(&mut base, content);
        bases.push(base);
    }

    Ok(GameState {
        meta: MetaState {
            tick: 0,
            seed,
            schema_version: 1,
            content_version: content.content_version.clone(),
        },
        bases,
        research: ResearchState { completed },
        counters: Counters::default(),
    })
}

fn build_base(content: &GameContent, spec: &ScenarioBase, id: BaseId) -> Result<BaseState> {
    let base_type = content
        .base_type(&spec.type_id)
        .with_context(|| format!("base '{}': unknown base type '{}'", spec.name, spec.type_id))?;

    let mut base = BaseState {
        id,
        name: spec.name.clone(),
        type_id: spec.type_id.clone(),
        location: spec.location.clone(),
        power_state: spec.power_state,
        cpu_slot: None,
        extra_slots: [None, None, None],
        power_satisfied: true,
        processor_time: 0,
    };

    for installed in &spec.installed {
        let def = content.item_def(&installed.item_type).with_context(|| {
            format!(
                "base '{}': unknown item type '{}'",
                spec.name, installed.item_type
            )
        })?;
        let slot = match def.category.extra_index() {
            None => &mut base.cpu_slot,
            Some(index) => &mut base.extra_slots[index],
        };
        if slot.is_some() {
            bail!(
                "base '{}': more than one {} item installed",
                spec.name,
                def.category
            );
        }
        let count = if def.category == ItemCategory::Cpu {
            ensure!(
                installed.count > 0 && installed.count <= base_type.size,
                "base '{}': {} units of '{}' do not fit a size-{} base",
                spec.name,
                installed.count,
                def.id,
                base_type.size,
            );
            installed.count
        } else {
            1
        };
        *slot = Some(ItemInstance {
            item_type: def.id.clone(),
            count,
            done: true,
            cost_left: 0,
        });
    }

    ensure!(
        !base_type.force_cpu || base.cpu_slot.is_some(),
        "base '{}': base type '{}' fixes its CPU, so the scenario must install one",
        spec.name,
        spec.type_id,
    );
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base_core::test_fixtures::{base_content, make_rng};

    fn scenario_base(name: &str, type_id: &str, installed: &[(&str, u32)]) -> ScenarioBase {
        ScenarioBase {
            name: name.to_string(),
            type_id: BaseTypeId::new(type_id),
            location: LocationId::new("loc_north_america"),
            power_state: PowerState::Active,
            installed: installed
                .iter()
                .map(|(item, count)| InstalledItem {
                    item_type: ItemTypeId::new(*item),
                    count: *count,
                })
                .collect(),
        }
    }

    #[test]
    fn test_fixture_content_passes_validation() {
        validate_content(&base_content()); // should not panic
    }

    #[test]
    #[should_panic(expected = "is not a known tech id")]
    fn test_item_prereq_unknown_panics() {
        let mut content = base_content();
        content.item_types[0].prereq = Some(TechId::new("tech_nonexistent"));
        validate_content(&content);
    }

    #[test]
    #[should_panic(expected = "duplicate item id")]
    fn test_duplicate_item_id_panics() {
        let mut content = base_content();
        let copy = content.item_types[0].clone();
        content.item_types.push(copy);
        validate_content(&content);
    }

    #[test]
    #[should_panic(expected = "must hold at least one CPU unit")]
    fn test_zero_size_base_type_panics() {
        let mut content = base_content();
        content.base_types[0].size = 0;
        validate_content(&content);
    }

    #[test]
    #[should_panic(expected = "detection research")]
    fn test_unknown_detection_tech_panics() {
        let mut content = base_content();
        content.constants.advanced_socioanalytics_tech = TechId::new("tech_missing");
        validate_content(&content);
    }

    #[test]
    #[should_panic(expected = "detection_coarse_step_bp")]
    fn test_zero_coarse_step_panics() {
        let mut content = base_content();
        content.constants.detection_coarse_step_bp = 0;
        validate_content(&content);
    }

    #[test]
    fn test_initial_state_installs_completed_items() {
        let content = base_content();
        let scenario = Scenario {
            seed: None,
            research: vec![TechId::new("tech_socioanalytics")],
            bases: vec![
                scenario_base(
                    "Alpha",
                    "base_server_farm",
                    &[("item_basic_cpu", 4), ("item_diesel_generator", 1)],
                ),
                scenario_base("Borrowed", "base_stolen_time", &[("item_basic_cpu", 1)]),
            ],
        };
        let state = build_initial_state(&content, &scenario, 7, &mut make_rng()).unwrap();

        assert_eq!(state.bases.len(), 2);
        let alpha = &state.bases[0];
        assert!(alpha.id.0.starts_with("base_"));
        assert_eq!(alpha.cpu_slot.as_ref().map(|cpu| cpu.count), Some(4));
        assert!(alpha.get(ItemCategory::Reactor).is_some_and(|r| r.done));
        assert!(alpha.power_satisfied);
        assert_eq!(alpha.processor_time, 4);
        assert!(state.research.is_done(&TechId::new("tech_socioanalytics")));
        assert_eq!(state.meta.seed, 7);
    }

    #[test]
    fn test_same_seed_same_base_ids() {
        let content = base_content();
        let scenario = Scenario {
            seed: None,
            research: vec![],
            bases: vec![scenario_base("Alpha", "base_server_farm", &[])],
        };
        let first = build_initial_state(&content, &scenario, 1, &mut seeded_rng(1)).unwrap();
        let second = build_initial_state(&content, &scenario, 1, &mut seeded_rng(1)).unwrap();
        assert_eq!(first.bases[0].id, second.bases[0].id);
    }

    #[test]
    fn test_locked_base_without_cpu_is_rejected() {
        let content = base_content();
        let scenario = Scenario {
            seed: None,
            research: vec![],
            bases: vec![scenario_base("Borrowed", "base_stolen_time", &[])],
        };
        let err = build_initial_state(&content, &scenario, 1, &mut make_rng()).unwrap_err();
        assert!(err.to_string().contains("fixes its CPU"), "got: {err}");
    }

    #[test]
    fn test_oversized_cpu_install_is_rejected() {
        let content = base_content();
        let scenario = Scenario {
            seed: None,
            research: vec![],
            bases: vec![scenario_base(
                "Alpha",
                "base_server_farm",
                &[("item_basic_cpu", 31)],
            )],
        };
        assert!(build_initial_state(&content, &scenario, 1, &mut make_rng()).is_err());
    }

    #[test]
    fn test_state_save_and_load() {
        let content = base_content();
        let scenario = Scenario {
            seed: None,
            research: vec![],
            bases: vec![scenario_base("Alpha", "base_server_farm", &[("item_fast_cpu", 2)])],
        };
        let state = build_initial_state(&content, &scenario, 3, &mut make_rng()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        save_state(&state, &path).unwrap();
        let loaded = load_state(&path).unwrap();
        assert_eq!(loaded.bases[0].id, state.bases[0].id);
        assert_eq!(loaded.bases[0].cpu_slot, state.bases[0].cpu_slot);
    }
}
