//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod access_service;
mod group_access;
mod navigation_filter;
mod permission_resolver;

pub use access_ports::ActorDirectory;
pub use access_service::AccessService;
pub use group_access::{
    GroupAccessContext, GroupAssignmentValidation, GroupFilterOptions, filter_accessible_groups,
    validate_group_assignment,
};
pub use navigation_filter::{
    NavigationView, SectionToggleState, filter_navigation, item_is_visible,
};
pub use permission_resolver::{ActorSnapshot, ResolvedPermissions, resolve_permissions};
