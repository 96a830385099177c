use std::collections::BTreeMap;

use dataroom_domain::{MenuItem, MenuSection};
use serde::Serialize;

use crate::ResolvedPermissions;

/// Expanded/collapsed flag per visible menu section.
///
/// Owned by whoever renders the menu; toggles are independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionToggleState(BTreeMap<String, bool>);

impl SectionToggleState {
    /// Starts every section closed unless it is declared open by default.
    #[must_use]
    pub fn for_sections(sections: &[MenuSection]) -> Self {
        Self(
            sections
                .iter()
                .map(|section| (section.id().as_str().to_owned(), section.default_open()))
                .collect(),
        )
    }

    /// Returns whether the section is expanded. Unknown ids are closed.
    #[must_use]
    pub fn is_open(&self, section_id: &str) -> bool {
        self.0.get(section_id).copied().unwrap_or(false)
    }

    /// Flips a section and returns its new state.
    pub fn toggle(&mut self, section_id: &str) -> bool {
        match self.0.get_mut(section_id) {
            Some(open) => {
                *open = !*open;
                *open
            }
            None => false,
        }
    }

    /// Expands a known section.
    pub fn open(&mut self, section_id: &str) {
        if let Some(open) = self.0.get_mut(section_id) {
            *open = true;
        }
    }

    /// Collapses a known section.
    pub fn close(&mut self, section_id: &str) {
        if let Some(open) = self.0.get_mut(section_id) {
            *open = false;
        }
    }

    /// Returns the ids of expanded sections.
    #[must_use]
    pub fn open_sections(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter_map(|(section_id, open)| open.then_some(section_id.as_str()))
            .collect()
    }
}

/// Menu projection for one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationView {
    /// Visible sections in declaration order.
    pub sections: Vec<MenuSection>,
    /// Initial toggle state of the visible sections.
    pub toggle_state: SectionToggleState,
}

/// Returns whether the actor may see the menu item.
#[must_use]
pub fn item_is_visible(item: &MenuItem, permissions: &ResolvedPermissions) -> bool {
    if item.requires_admin() && !permissions.role.is_admin() {
        return false;
    }
    if item.requires_subadmin() && !permissions.role.is_at_least_subadmin() {
        return false;
    }

    item.required_capability()
        .is_none_or(|capability| permissions.allows(capability))
}

/// Projects the static menu onto what the actor may see.
///
/// Sections left without items are dropped. Order is preserved and the
/// input is never modified.
#[must_use]
pub fn filter_navigation(
    sections: &[MenuSection],
    permissions: &ResolvedPermissions,
) -> NavigationView {
    let mut filtered_sections = Vec::new();
    for section in sections {
        let filtered_items: Vec<MenuItem> = section
            .items()
            .iter()
            .filter(|item| item_is_visible(item, permissions))
            .cloned()
            .collect();

        if !filtered_items.is_empty() {
            filtered_sections.push(section.with_items(filtered_items));
        }
    }

    let toggle_state = SectionToggleState::for_sections(&filtered_sections);
    NavigationView {
        sections: filtered_sections,
        toggle_state,
    }
}
