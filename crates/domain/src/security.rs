use std::collections::BTreeMap;
use std::str::FromStr;

use dataroom_core::AppError;
use serde::{Deserialize, Serialize};

use crate::GroupId;

/// Who a capability is granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityScope {
    /// Granted to every authenticated actor.
    Everyone,
    /// Granted to sub-admins for their managed groups, and to admins.
    GroupScoped,
    /// Granted to admins only.
    AdminOnly,
}

/// Console capabilities gating views and actions.
///
/// Both the resolver and the menu definitions use this enum, so adding a
/// capability means deciding its scope here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Allows viewing the landing dashboard.
    ViewDashboard,
    /// Allows viewing one's own profile.
    ViewOwnProfile,
    /// Allows listing and editing users.
    AccessUsersManagement,
    /// Allows listing groups and their members.
    AccessGroupsManagement,
    /// Allows creating and configuring data rooms.
    ManageDataRooms,
    /// Allows viewing analytics screens.
    ViewAnalytics,
    /// Allows reading the global audit log.
    AccessAuditLogs,
    /// Allows managing roles and sub-admin assignments.
    ManageRoles,
    /// Allows changing console settings.
    AccessSettings,
    /// Allows viewing platform health and monitoring.
    AccessSystemMonitoring,
}

impl Capability {
    /// Returns a stable transport value for this capability.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "dashboard.view",
            Self::ViewOwnProfile => "profile.view",
            Self::AccessUsersManagement => "users.manage",
            Self::AccessGroupsManagement => "groups.manage",
            Self::ManageDataRooms => "data_rooms.manage",
            Self::ViewAnalytics => "analytics.view",
            Self::AccessAuditLogs => "audit_logs.view",
            Self::ManageRoles => "roles.manage",
            Self::AccessSettings => "settings.manage",
            Self::AccessSystemMonitoring => "monitoring.view",
        }
    }

    /// Returns who this capability is granted to.
    #[must_use]
    pub fn scope(&self) -> CapabilityScope {
        match self {
            Self::ViewDashboard | Self::ViewOwnProfile => CapabilityScope::Everyone,
            Self::AccessUsersManagement
            | Self::AccessGroupsManagement
            | Self::ManageDataRooms
            | Self::ViewAnalytics => CapabilityScope::GroupScoped,
            Self::AccessAuditLogs
            | Self::ManageRoles
            | Self::AccessSettings
            | Self::AccessSystemMonitoring => CapabilityScope::AdminOnly,
        }
    }

    /// Returns all known capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Capability] = &[
            Capability::ViewDashboard,
            Capability::ViewOwnProfile,
            Capability::AccessUsersManagement,
            Capability::AccessGroupsManagement,
            Capability::ManageDataRooms,
            Capability::ViewAnalytics,
            Capability::AccessAuditLogs,
            Capability::ManageRoles,
            Capability::AccessSettings,
            Capability::AccessSystemMonitoring,
        ];

        ALL
    }

    /// Parses a transport value into a capability.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Capability {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|capability| capability.as_str() == value)
            .copied()
            .ok_or_else(|| AppError::Validation(format!("unknown capability value '{value}'")))
    }
}

/// Coarse authorization tier of an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    /// Regular user without administrative rights.
    User,
    /// Group administrator scoped to the listed groups.
    Subadmin {
        /// Groups the actor administers.
        managed_groups: Vec<GroupId>,
    },
    /// Platform administrator.
    Admin,
}

impl Role {
    /// Returns a stable transport value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Subadmin { .. } => "subadmin",
            Self::Admin => "admin",
        }
    }

    /// Returns whether the role is `Admin`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns whether the role is `Subadmin` or `Admin`.
    #[must_use]
    pub fn is_at_least_subadmin(&self) -> bool {
        matches!(self, Self::Subadmin { .. } | Self::Admin)
    }

    /// Returns the groups managed by a sub-admin, empty for other roles.
    #[must_use]
    pub fn managed_groups(&self) -> &[GroupId] {
        match self {
            Self::Subadmin { managed_groups } => managed_groups.as_slice(),
            Self::User | Self::Admin => &[],
        }
    }

    /// Returns whether this role is granted the capability.
    #[must_use]
    pub fn grants(&self, capability: Capability) -> bool {
        match (self, capability.scope()) {
            (Self::Admin, _) => true,
            (Self::Subadmin { .. }, scope) => scope != CapabilityScope::AdminOnly,
            (Self::User, scope) => scope == CapabilityScope::Everyone,
        }
    }
}

/// Complete capability map derived from a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet(BTreeMap<Capability, bool>);

impl CapabilitySet {
    /// Derives the flag of every known capability for a role.
    #[must_use]
    pub fn for_role(role: &Role) -> Self {
        Self(
            Capability::all()
                .iter()
                .map(|capability| (*capability, role.grants(*capability)))
                .collect(),
        )
    }

    /// Returns whether the capability is granted.
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        self.0.get(&capability).copied().unwrap_or(false)
    }

    /// Iterates over every capability and its flag.
    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        self.0.iter().map(|(capability, allowed)| (*capability, *allowed))
    }
}
