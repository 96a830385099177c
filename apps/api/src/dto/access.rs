use std::collections::BTreeMap;

use dataroom_application::{GroupAssignmentValidation, NavigationView, ResolvedPermissions};
use dataroom_domain::{Group, MenuItem};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Resolved role and capability flags of an actor.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permissions-response.ts"
)]
pub struct PermissionsResponse {
    /// One of `user`, `subadmin` or `admin`.
    pub role: String,
    pub is_admin: bool,
    pub is_subadmin: bool,
    pub managed_groups: Vec<String>,
    /// Flag of every known capability keyed by its transport name.
    pub capabilities: BTreeMap<String, bool>,
}

impl From<ResolvedPermissions> for PermissionsResponse {
    fn from(value: ResolvedPermissions) -> Self {
        Self {
            role: value.role.as_str().to_owned(),
            is_admin: value.is_admin,
            is_subadmin: value.is_subadmin,
            managed_groups: value.managed_groups.into_iter().map(String::from).collect(),
            capabilities: value
                .capabilities
                .iter()
                .map(|(capability, allowed)| (capability.as_str().to_owned(), allowed))
                .collect(),
        }
    }
}

/// Menu entry visible to the actor.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/menu-item-response.ts"
)]
pub struct MenuItemResponse {
    pub label: String,
    pub path: String,
    pub icon: Option<String>,
}

impl From<&MenuItem> for MenuItemResponse {
    fn from(value: &MenuItem) -> Self {
        Self {
            label: value.label().as_str().to_owned(),
            path: value.path().as_str().to_owned(),
            icon: value.icon().map(ToOwned::to_owned),
        }
    }
}

/// Menu section visible to the actor.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/menu-section-response.ts"
)]
pub struct MenuSectionResponse {
    pub id: String,
    pub label: String,
    /// Initial expanded state.
    pub open: bool,
    pub items: Vec<MenuItemResponse>,
}

/// Navigation projected for the actor.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/navigation-response.ts"
)]
pub struct NavigationResponse {
    pub sections: Vec<MenuSectionResponse>,
}

impl From<NavigationView> for NavigationResponse {
    fn from(value: NavigationView) -> Self {
        let sections = value
            .sections
            .iter()
            .map(|section| MenuSectionResponse {
                id: section.id().as_str().to_owned(),
                label: section.label().as_str().to_owned(),
                open: value.toggle_state.is_open(section.id().as_str()),
                items: section.items().iter().map(MenuItemResponse::from).collect(),
            })
            .collect();

        Self { sections }
    }
}

/// Query parameters of the group listing.
#[derive(Debug, Default, Deserialize)]
pub struct GroupListQuery {
    /// Keeps the reserved admin group in the listing.
    pub include_admin: Option<bool>,
}

/// API representation of a platform group.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/group-response.ts"
)]
pub struct GroupResponse {
    pub id: String,
    pub display_name: String,
    pub member_count: u32,
}

impl From<Group> for GroupResponse {
    fn from(value: Group) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            display_name: value.display_name().to_owned(),
            member_count: value.member_count(),
        }
    }
}

/// Incoming payload for a group assignment check.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/validate-group-assignment-request.ts"
)]
pub struct ValidateGroupAssignmentRequest {
    pub group_ids: Vec<String>,
}

/// Outcome of a group assignment check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/group-assignment-validation-response.ts"
)]
pub struct GroupAssignmentValidationResponse {
    pub allowed: Vec<String>,
    pub denied: Vec<String>,
    pub is_valid: bool,
}

impl From<GroupAssignmentValidation> for GroupAssignmentValidationResponse {
    fn from(value: GroupAssignmentValidation) -> Self {
        Self {
            allowed: value.allowed.into_iter().map(String::from).collect(),
            denied: value.denied.into_iter().map(String::from).collect(),
            is_valid: value.is_valid,
        }
    }
}
