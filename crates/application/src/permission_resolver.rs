use std::collections::{BTreeMap, BTreeSet};

use dataroom_domain::{Capability, CapabilitySet, GroupId, Role};
use serde::{Deserialize, Serialize};

use crate::GroupAccessContext;

/// Raw actor data as returned by the platform's user directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Platform user id.
    pub user_id: String,
    /// Administrator flag reported by the platform.
    #[serde(default)]
    pub is_admin: bool,
    /// Groups the actor is a member of.
    #[serde(default)]
    pub group_memberships: BTreeSet<GroupId>,
    /// Sub-admin flag per group.
    #[serde(default)]
    pub subadmin_group_assignments: BTreeMap<GroupId, bool>,
}

/// Role and capability flags resolved for one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPermissions {
    /// Resolved role.
    pub role: Role,
    /// Whether the role is `Admin`.
    pub is_admin: bool,
    /// Whether the role is `Subadmin`.
    pub is_subadmin: bool,
    /// Groups administered by a sub-admin, ascending by id.
    pub managed_groups: Vec<GroupId>,
    /// Flag of every known capability.
    pub capabilities: CapabilitySet,
}

impl ResolvedPermissions {
    /// Builds the resolution result for a role.
    #[must_use]
    pub fn from_role(role: Role) -> Self {
        Self {
            is_admin: role.is_admin(),
            is_subadmin: matches!(role, Role::Subadmin { .. }),
            managed_groups: role.managed_groups().to_vec(),
            capabilities: CapabilitySet::for_role(&role),
            role,
        }
    }

    /// Returns whether the capability is granted.
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        self.capabilities.allows(capability)
    }

    /// Returns the group scope used by group filters.
    #[must_use]
    pub fn group_access_context(&self) -> GroupAccessContext {
        GroupAccessContext {
            is_admin: self.is_admin,
            managed_groups: self.managed_groups.clone(),
            can_manage_all_groups: false,
        }
    }
}

/// Resolves the role and capabilities of an actor.
///
/// Admin wins over sub-admin, which wins over user. A missing snapshot
/// resolves to `User`.
#[must_use]
pub fn resolve_permissions(snapshot: Option<&ActorSnapshot>) -> ResolvedPermissions {
    let Some(snapshot) = snapshot else {
        return ResolvedPermissions::from_role(Role::User);
    };

    let is_admin = snapshot.is_admin
        || snapshot
            .group_memberships
            .iter()
            .any(GroupId::is_admin_group);
    if is_admin {
        return ResolvedPermissions::from_role(Role::Admin);
    }

    let managed_groups: Vec<GroupId> = snapshot
        .subadmin_group_assignments
        .iter()
        .filter_map(|(group_id, assigned)| assigned.then(|| group_id.clone()))
        .collect();
    if managed_groups.is_empty() {
        return ResolvedPermissions::from_role(Role::User);
    }

    ResolvedPermissions::from_role(Role::Subadmin { managed_groups })
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use dataroom_domain::{Capability, CapabilityScope, GroupId, Role};
    use proptest::prelude::*;

    use super::{ActorSnapshot, resolve_permissions};

    fn group_ids(values: &[&str]) -> BTreeSet<GroupId> {
        values
            .iter()
            .filter_map(|value| GroupId::new(*value).ok())
            .collect()
    }

    fn assignments(values: &[(&str, bool)]) -> BTreeMap<GroupId, bool> {
        values
            .iter()
            .filter_map(|(value, assigned)| GroupId::new(*value).ok().map(|id| (id, *assigned)))
            .collect()
    }

    fn snapshot_strategy() -> impl Strategy<Value = ActorSnapshot> {
        (
            any::<bool>(),
            proptest::collection::btree_set("(admin|g[0-9])", 0..5),
            proptest::collection::btree_map("g[0-9]", any::<bool>(), 0..5),
        )
            .prop_map(|(is_admin, memberships, assignments)| ActorSnapshot {
                user_id: "actor".to_owned(),
                is_admin,
                group_memberships: memberships
                    .into_iter()
                    .filter_map(|value| GroupId::new(value).ok())
                    .collect(),
                subadmin_group_assignments: assignments
                    .into_iter()
                    .filter_map(|(value, assigned)| {
                        GroupId::new(value).ok().map(|id| (id, assigned))
                    })
                    .collect(),
            })
    }

    #[test]
    fn missing_snapshot_resolves_to_user() {
        let resolved = resolve_permissions(None);
        assert_eq!(resolved.role, Role::User);
        assert!(!resolved.is_admin);
        assert!(!resolved.is_subadmin);
        assert!(resolved.allows(Capability::ViewDashboard));
        assert!(!resolved.allows(Capability::ManageDataRooms));
    }

    #[test]
    fn admin_group_membership_implies_admin() {
        let snapshot = ActorSnapshot {
            user_id: "root".to_owned(),
            is_admin: false,
            group_memberships: group_ids(&["admin", "finance"]),
            subadmin_group_assignments: BTreeMap::new(),
        };

        let resolved = resolve_permissions(Some(&snapshot));
        assert_eq!(resolved.role, Role::Admin);
        assert!(resolved.managed_groups.is_empty());
    }

    #[test]
    fn subadmin_manages_only_assigned_groups() {
        let snapshot = ActorSnapshot {
            user_id: "carol".to_owned(),
            is_admin: false,
            group_memberships: group_ids(&["g1", "g3"]),
            subadmin_group_assignments: assignments(&[("g3", true), ("g1", true), ("g2", false)]),
        };

        let resolved = resolve_permissions(Some(&snapshot));
        assert!(resolved.is_subadmin);
        let managed: Vec<&str> = resolved.managed_groups.iter().map(GroupId::as_str).collect();
        assert_eq!(managed, vec!["g1", "g3"]);
        assert!(resolved.allows(Capability::ManageDataRooms));
        assert!(!resolved.allows(Capability::AccessAuditLogs));
        assert!(!resolved.allows(Capability::ManageRoles));
    }

    #[test]
    fn only_false_assignments_resolve_to_user() {
        let snapshot = ActorSnapshot {
            user_id: "dave".to_owned(),
            is_admin: false,
            group_memberships: group_ids(&["g1"]),
            subadmin_group_assignments: assignments(&[("g1", false)]),
        };

        assert_eq!(resolve_permissions(Some(&snapshot)).role, Role::User);
    }

    #[test]
    fn snapshot_deserializes_with_missing_fields() {
        let snapshot: Result<ActorSnapshot, _> =
            serde_json::from_str(r#"{"user_id":"erin"}"#);
        assert!(snapshot.is_ok_and(|snapshot| resolve_permissions(Some(&snapshot)).role == Role::User));
    }

    proptest! {
        #[test]
        fn admin_flag_grants_every_capability(snapshot in snapshot_strategy()) {
            let snapshot = ActorSnapshot { is_admin: true, ..snapshot };
            let resolved = resolve_permissions(Some(&snapshot));
            prop_assert_eq!(&resolved.role, &Role::Admin);
            prop_assert!(Capability::all().iter().all(|capability| resolved.allows(*capability)));
        }

        #[test]
        fn non_admin_never_gets_admin_only_capabilities(snapshot in snapshot_strategy()) {
            let memberships = snapshot
                .group_memberships
                .iter()
                .filter(|group_id| !group_id.is_admin_group())
                .cloned()
                .collect();
            let snapshot = ActorSnapshot {
                is_admin: false,
                group_memberships: memberships,
                ..snapshot
            };
            let resolved = resolve_permissions(Some(&snapshot));
            let has_assignment = snapshot.subadmin_group_assignments.values().any(|assigned| *assigned);

            prop_assert_eq!(resolved.is_subadmin, has_assignment);
            prop_assert_eq!(resolved.managed_groups.is_empty(), !has_assignment);
            for capability in Capability::all() {
                let expected = match capability.scope() {
                    CapabilityScope::Everyone => true,
                    CapabilityScope::GroupScoped => has_assignment,
                    CapabilityScope::AdminOnly => false,
                };
                prop_assert_eq!(resolved.allows(*capability), expected);
            }
        }

        #[test]
        fn resolution_is_idempotent(snapshot in snapshot_strategy()) {
            prop_assert_eq!(
                resolve_permissions(Some(&snapshot)),
                resolve_permissions(Some(&snapshot))
            );
        }
    }
}
