//! Read-only queries over the item and base-type catalogs.

use crate::{
    BaseState, BaseTypeDef, BaseTypeId, GameContent, ItemCategory, ItemDef, ItemTypeId, LocationId,
    ResearchState,
};

impl GameContent {
    pub fn item_def(&self, id: &ItemTypeId) -> Option<&ItemDef> {
        self.item_types.iter().find(|def| &def.id == id)
    }

    pub fn base_type(&self, id: &BaseTypeId) -> Option<&BaseTypeDef> {
        self.base_types.iter().find(|def| &def.id == id)
    }
}

impl ItemDef {
    /// Prerequisite research (if any) has been completed.
    pub fn is_available(&self, research: &ResearchState) -> bool {
        self.prereq
            .as_ref()
            .map_or(true, |tech| research.is_done(tech))
    }

    pub fn is_buildable(&self, location: &LocationId) -> bool {
        self.buildable_at.is_empty() || self.buildable_at.contains(location)
    }
}

/// Items of `category` that can be built at `location` with the current
/// research, sorted by name descending.
pub fn list_buildable<'a>(
    content: &'a GameContent,
    research: &ResearchState,
    category: ItemCategory,
    location: &LocationId,
) -> Vec<&'a ItemDef> {
    let mut items: Vec<&ItemDef> = content
        .item_types
        .iter()
        .filter(|def| {
            def.category == category && def.is_available(research) && def.is_buildable(location)
        })
        .collect();
    items.sort_by(|a, b| b.name.cmp(&a.name));
    items
}

/// The type currently installed in `category`, for preselecting a chooser.
pub fn current_choice(base: &BaseState, category: ItemCategory) -> Option<&ItemTypeId> {
    base.get(category).map(|instance| &instance.item_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{base_content, base_state, BASE_ID};
    use crate::{BaseId, TechId};

    #[test]
    fn lists_only_matching_category_sorted_by_name_descending() {
        let content = base_content();
        let mut research = ResearchState::default();
        research
            .completed
            .insert(TechId::new("tech_quantum_computing"));
        let names: Vec<&str> = list_buildable(
            &content,
            &research,
            ItemCategory::Cpu,
            &LocationId::new("loc_north_america"),
        )
        .into_iter()
        .map(|def| def.name.as_str())
        .collect();
        assert_eq!(
            names,
            vec!["Salvaged CPU", "Quantum CPU", "Fast CPU", "Basic CPU"]
        );
    }

    #[test]
    fn unresearched_items_are_hidden() {
        let content = base_content();
        let research = ResearchState::default();
        let listed = list_buildable(
            &content,
            &research,
            ItemCategory::Cpu,
            &LocationId::new("loc_north_america"),
        );
        assert!(
            listed.iter().all(|def| def.id.0 != "item_quantum_cpu"),
            "quantum CPU requires research"
        );
    }

    #[test]
    fn location_restricted_items_are_hidden_elsewhere() {
        let content = base_content();
        let research = ResearchState::default();
        let on_moon = list_buildable(
            &content,
            &research,
            ItemCategory::Reactor,
            &LocationId::new("loc_moon"),
        );
        assert!(on_moon.iter().any(|def| def.id.0 == "item_fusion_reactor"));
        let on_earth = list_buildable(
            &content,
            &research,
            ItemCategory::Reactor,
            &LocationId::new("loc_north_america"),
        );
        assert!(on_earth.iter().all(|def| def.id.0 != "item_fusion_reactor"));
    }

    #[test]
    fn current_choice_tracks_occupant() {
        let content = base_content();
        let mut state = base_state(&content);
        let base = state.base_mut(&BaseId::new(BASE_ID)).unwrap();
        assert!(current_choice(base, ItemCategory::Network).is_none());
        base.extra_slots[1] = Some(crate::ItemInstance {
            item_type: ItemTypeId::new("item_fiber_link"),
            count: 1,
            done: true,
            cost_left: 0,
        });
        assert_eq!(
            current_choice(base, ItemCategory::Network),
            Some(&ItemTypeId::new("item_fiber_link"))
        );
    }
}
