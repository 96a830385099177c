//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod group;
mod navigation;
mod security;

pub use group::{ADMIN_GROUP_ID, Group, GroupId};
pub use navigation::{
    MenuItem, MenuItemDefinition, MenuSection, MenuSectionDefinition, ResolvedMenu,
    UnknownCapabilityPolicy, console_menu, resolve_menu_definitions,
};
pub use security::{Capability, CapabilityScope, CapabilitySet, Role};
