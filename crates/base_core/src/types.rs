//! Type definitions for `base_core`.
//!
//! All public types, structs, enums, and ID newtypes used by the loadout engine.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// 10000 basis points = certainty.
pub const BASIS_POINTS: u32 = 10_000;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(ItemTypeId);
string_id!(BaseTypeId);
string_id!(BaseId);
string_id!(LocationId);
string_id!(TechId);
string_id!(EventId);

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Cpu,
    Reactor,
    Network,
    Security,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 4] = [
        ItemCategory::Cpu,
        ItemCategory::Reactor,
        ItemCategory::Network,
        ItemCategory::Security,
    ];

    /// Fixed index into `BaseState::extra_slots`, or `None` for the CPU slot.
    pub fn extra_index(self) -> Option<usize> {
        match self {
            ItemCategory::Cpu => None,
            ItemCategory::Reactor => Some(0),
            ItemCategory::Network => Some(1),
            ItemCategory::Security => Some(2),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemCategory::Cpu => "cpu",
            ItemCategory::Reactor => "reactor",
            ItemCategory::Network => "network",
            ItemCategory::Security => "security",
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown item category '{s}'"))
    }
}

/// Investigating groups that may discover a base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionGroup {
    News,
    Science,
    Covert,
    Public,
}

impl DetectionGroup {
    pub const ALL: [DetectionGroup; 4] = [
        DetectionGroup::News,
        DetectionGroup::Science,
        DetectionGroup::Covert,
        DetectionGroup::Public,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    #[default]
    Active,
    Sleep,
    Overclocked,
    Suicide,
    Stasis,
    EnteringStasis,
    LeavingStasis,
}

impl PowerState {
    /// Dormant bases draw no power and produce no CPU.
    pub fn is_dormant(self) -> bool {
        matches!(
            self,
            PowerState::Sleep
                | PowerState::Stasis
                | PowerState::EnteringStasis
                | PowerState::LeavingStasis
        )
    }
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub meta: MetaState,
    /// Creation order is preserved; roster cycling walks this list.
    pub bases: Vec<BaseState>,
    pub research: ResearchState,
    pub counters: Counters,
}

impl GameState {
    pub fn base(&self, id: &BaseId) -> Option<&BaseState> {
        self.bases.iter().find(|base| &base.id == id)
    }

    pub fn base_mut(&mut self, id: &BaseId) -> Option<&mut BaseState> {
        self.bases.iter_mut().find(|base| &base.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaState {
    pub tick: u64,
    pub seed: u64,
    pub schema_version: u32,
    pub content_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    pub next_event_id: u64,
    pub next_pending_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchState {
    pub completed: HashSet<TechId>,
}

impl ResearchState {
    pub fn is_done(&self, tech: &TechId) -> bool {
        self.completed.contains(tech)
    }
}

/// An item actually assigned to a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub item_type: ItemTypeId,
    /// Units occupied. Always 1 outside the CPU slot.
    pub count: u32,
    pub done: bool,
    /// Remaining build time in ticks. Zero once `done`.
    pub cost_left: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseState {
    pub id: BaseId,
    pub name: String,
    pub type_id: BaseTypeId,
    pub location: LocationId,
    #[serde(default)]
    pub power_state: PowerState,
    pub cpu_slot: Option<ItemInstance>,
    /// Reactor, network, security, in that order.
    pub extra_slots: [Option<ItemInstance>; 3],
    pub power_satisfied: bool,
    /// Cached CPU output, refreshed after every slot mutation.
    pub processor_time: u64,
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub tick: u64,
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    SlotAssigned {
        base_id: BaseId,
        category: ItemCategory,
        item_type: ItemTypeId,
        count: u32,
        merged: bool,
    },
    AssignmentPending {
        base_id: BaseId,
        pending_id: u64,
    },
    AssignmentCancelled {
        base_id: BaseId,
        pending_id: u64,
    },
    PowerReconciled {
        base_id: BaseId,
        satisfied: bool,
    },
    ConstructionCompleted {
        base_id: BaseId,
        category: ItemCategory,
        item_type: ItemTypeId,
    },
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContent {
    pub content_version: String,
    pub item_types: Vec<ItemDef>,
    pub base_types: Vec<BaseTypeDef>,
    pub techs: Vec<TechDef>,
    pub constants: Constants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemTypeId,
    pub name: String,
    pub category: ItemCategory,
    /// Build time per unit, in ticks.
    pub build_ticks: u64,
    /// CPU output per completed unit. Only meaningful for `cpu` items.
    #[serde(default)]
    pub cpu: u64,
    /// Category-specific strength in basis points: CPU bonus for network
    /// items, detection reduction for security items.
    #[serde(default)]
    pub quality: u32,
    /// Power drawn per completed unit.
    #[serde(default)]
    pub power_draw: u32,
    #[serde(default)]
    pub power_supply: u32,
    #[serde(default)]
    pub prereq: Option<TechId>,
    /// Locations this item may be built at. Empty means anywhere.
    #[serde(default)]
    pub buildable_at: Vec<LocationId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseTypeDef {
    pub id: BaseTypeId,
    pub name: String,
    /// Total CPU capacity, in capacity units.
    pub size: u32,
    /// The CPU slot is fixed by the base type and not player-editable.
    #[serde(default)]
    pub force_cpu: bool,
    /// Base discovery chance per group, in basis points.
    #[serde(default)]
    pub detect_chance: BTreeMap<DetectionGroup, u32>,
    #[serde(default)]
    pub power_supply: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechDef {
    pub id: TechId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    /// Gates any detection estimate at all.
    pub socioanalytics_tech: TechId,
    /// Upgrades detection estimates from coarse to exact.
    pub advanced_socioanalytics_tech: TechId,
    /// Granularity of coarse detection estimates (250 bp = 2.5%).
    pub detection_coarse_step_bp: u32,
    /// Floor area of one CPU capacity unit.
    pub room_m2_per_unit: f64,
}
