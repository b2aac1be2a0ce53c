//! Shared test fixtures for base_core and downstream crates.
//!
//! `base_content()` provides a small but complete catalog (four CPU types,
//! two reactors, a network link, a firewall, two base types).
//! `base_state()` provides four bases across two locations.

use crate::{
    BaseId, BaseState, BaseTypeDef, BaseTypeId, Constants, Counters, DetectionGroup, GameContent,
    GameState, ItemCategory, ItemDef, ItemInstance, ItemTypeId, LocationId, MetaState, PowerState,
    ResearchState, TechDef, TechId,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashSet};

/// Empty 30-unit server farm in North America.
pub const BASE_ID: &str = "base_0001";
/// Single-unit base whose CPU slot is fixed by its type.
pub const LOCKED_BASE_ID: &str = "base_0002";
/// The only base on the moon.
pub const MOON_BASE_ID: &str = "base_0003";

fn item(id: &str, name: &str, category: ItemCategory, build_ticks: u64) -> ItemDef {
    ItemDef {
        id: ItemTypeId::new(id),
        name: name.to_string(),
        category,
        build_ticks,
        cpu: 0,
        quality: 0,
        power_draw: 0,
        power_supply: 0,
        prereq: None,
        buildable_at: vec![],
    }
}

pub fn base_content() -> GameContent {
    GameContent {
        content_version: "test".to_string(),
        item_types: vec![
            ItemDef {
                cpu: 1,
                power_draw: 1,
                ..item("item_basic_cpu", "Basic CPU", ItemCategory::Cpu, 60)
            },
            ItemDef {
                cpu: 3,
                power_draw: 2,
                ..item("item_fast_cpu", "Fast CPU", ItemCategory::Cpu, 120)
            },
            ItemDef {
                cpu: 10,
                power_draw: 5,
                prereq: Some(TechId::new("tech_quantum_computing")),
                ..item("item_quantum_cpu", "Quantum CPU", ItemCategory::Cpu, 600)
            },
            // Zero build time: installed already complete.
            ItemDef {
                cpu: 1,
                power_draw: 1,
                ..item("item_salvaged_cpu", "Salvaged CPU", ItemCategory::Cpu, 0)
            },
            ItemDef {
                power_supply: 20,
                ..item(
                    "item_diesel_generator",
                    "Diesel Generator",
                    ItemCategory::Reactor,
                    30,
                )
            },
            ItemDef {
                power_supply: 200,
                buildable_at: vec![LocationId::new("loc_moon")],
                ..item("item_fusion_reactor", "Fusion Reactor", ItemCategory::Reactor, 300)
            },
            ItemDef {
                quality: 1_000,
                power_draw: 2,
                ..item("item_fiber_link", "Fiber Link", ItemCategory::Network, 45)
            },
            ItemDef {
                quality: 5_000,
                power_draw: 1,
                ..item("item_firewall", "Firewall", ItemCategory::Security, 90)
            },
        ],
        base_types: vec![
            BaseTypeDef {
                id: BaseTypeId::new("base_server_farm"),
                name: "Server Farm".to_string(),
                size: 30,
                force_cpu: false,
                // No public entry: missing groups default to zero.
                detect_chance: BTreeMap::from([
                    (DetectionGroup::News, 200),
                    (DetectionGroup::Science, 400),
                    (DetectionGroup::Covert, 750),
                ]),
                power_supply: 10,
            },
            BaseTypeDef {
                id: BaseTypeId::new("base_stolen_time"),
                name: "Stolen Computer Time".to_string(),
                size: 1,
                force_cpu: true,
                detect_chance: BTreeMap::from([
                    (DetectionGroup::News, 50),
                    (DetectionGroup::Public, 1_233),
                ]),
                power_supply: 5,
            },
        ],
        techs: vec![
            TechDef {
                id: TechId::new("tech_socioanalytics"),
                name: "Socioanalytics".to_string(),
            },
            TechDef {
                id: TechId::new("tech_advanced_socioanalytics"),
                name: "Advanced Socioanalytics".to_string(),
            },
            TechDef {
                id: TechId::new("tech_quantum_computing"),
                name: "Quantum Computing".to_string(),
            },
        ],
        constants: Constants {
            socioanalytics_tech: TechId::new("tech_socioanalytics"),
            advanced_socioanalytics_tech: TechId::new("tech_advanced_socioanalytics"),
            detection_coarse_step_bp: 250,
            room_m2_per_unit: 0.2,
        },
    }
}

fn empty_base(id: &str, name: &str, type_id: &str, location: &str) -> BaseState {
    BaseState {
        id: BaseId::new(id),
        name: name.to_string(),
        type_id: BaseTypeId::new(type_id),
        location: LocationId::new(location),
        power_state: PowerState::Active,
        cpu_slot: None,
        extra_slots: [None, None, None],
        power_satisfied: true,
        processor_time: 0,
    }
}

/// Standard game state: three bases in North America (one locked), one on the moon.
pub fn base_state(content: &GameContent) -> GameState {
    let mut locked = empty_base(
        LOCKED_BASE_ID,
        "Borrowed Cycles",
        "base_stolen_time",
        "loc_north_america",
    );
    locked.cpu_slot = Some(ItemInstance {
        item_type: ItemTypeId::new("item_basic_cpu"),
        count: 1,
        done: true,
        cost_left: 0,
    });
    locked.processor_time = 1;

    GameState {
        meta: MetaState {
            tick: 0,
            seed: 42,
            schema_version: 1,
            content_version: content.content_version.clone(),
        },
        bases: vec![
            empty_base(BASE_ID, "Alpha", "base_server_farm", "loc_north_america"),
            locked,
            empty_base(MOON_BASE_ID, "Beta", "base_server_farm", "loc_moon"),
            empty_base("base_0004", "Gamma", "base_server_farm", "loc_north_america"),
        ],
        research: ResearchState {
            completed: HashSet::new(),
        },
        counters: Counters::default(),
    }
}

/// Deterministic RNG seeded with 42.
pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
