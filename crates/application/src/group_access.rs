use std::collections::BTreeSet;

use dataroom_domain::{Group, GroupId};
use serde::Serialize;

/// Group scope of an actor performing administrative actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAccessContext {
    /// Whether the actor is an admin.
    pub is_admin: bool,
    /// Groups administered by the actor.
    pub managed_groups: Vec<GroupId>,
    /// Grants access to every group regardless of role.
    pub can_manage_all_groups: bool,
}

impl GroupAccessContext {
    /// Returns whether the actor may operate on the group.
    #[must_use]
    pub fn can_operate_on(&self, group_id: &GroupId) -> bool {
        self.is_unrestricted() || self.managed_groups.contains(group_id)
    }

    fn is_unrestricted(&self) -> bool {
        self.is_admin || self.can_manage_all_groups
    }
}

/// Options for group listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupFilterOptions {
    /// Drops the reserved admin group from the result.
    pub exclude_admin_group: bool,
}

impl Default for GroupFilterOptions {
    fn default() -> Self {
        Self {
            exclude_admin_group: true,
        }
    }
}

/// Outcome of an advisory group assignment check.
///
/// The platform authorizes the actual write independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupAssignmentValidation {
    /// Requested groups the actor may assign.
    pub allowed: Vec<GroupId>,
    /// Requested groups outside the actor's scope.
    pub denied: Vec<GroupId>,
    /// True when nothing was denied.
    pub is_valid: bool,
}

/// Restricts a group listing to what the actor may operate on.
///
/// Input order is preserved.
#[must_use]
pub fn filter_accessible_groups(
    groups: &[Group],
    context: &GroupAccessContext,
    options: GroupFilterOptions,
) -> Vec<Group> {
    groups
        .iter()
        .filter(|group| !(options.exclude_admin_group && group.id().is_admin_group()))
        .filter(|group| context.can_operate_on(group.id()))
        .cloned()
        .collect()
}

/// Splits requested group ids into allowed and denied ones.
///
/// Duplicates collapse to their first occurrence.
#[must_use]
pub fn validate_group_assignment(
    requested: &[GroupId],
    context: &GroupAccessContext,
) -> GroupAssignmentValidation {
    let mut seen = BTreeSet::new();
    let (allowed, denied): (Vec<GroupId>, Vec<GroupId>) = requested
        .iter()
        .filter(|group_id| seen.insert(*group_id))
        .cloned()
        .partition(|group_id| context.can_operate_on(group_id));

    GroupAssignmentValidation {
        is_valid: denied.is_empty(),
        allowed,
        denied,
    }
}

#[cfg(test)]
mod tests {
    use dataroom_domain::{Group, GroupId};
    use proptest::prelude::*;

    use super::{
        GroupAccessContext, GroupFilterOptions, filter_accessible_groups,
        validate_group_assignment,
    };

    fn groups() -> Vec<Group> {
        [("g1", 3), ("admin", 1), ("g2", 8), ("g3", 0)]
            .into_iter()
            .filter_map(|(id, members)| Group::new(id, id.to_uppercase(), members).ok())
            .collect()
    }

    fn ids(values: &[&str]) -> Vec<GroupId> {
        values
            .iter()
            .filter_map(|value| GroupId::new(*value).ok())
            .collect()
    }

    fn group_ids(groups: &[Group]) -> Vec<&str> {
        groups.iter().map(|group| group.id().as_str()).collect()
    }

    fn admin() -> GroupAccessContext {
        GroupAccessContext {
            is_admin: true,
            ..GroupAccessContext::default()
        }
    }

    fn subadmin(managed: &[&str]) -> GroupAccessContext {
        GroupAccessContext {
            managed_groups: ids(managed),
            ..GroupAccessContext::default()
        }
    }

    #[test]
    fn admin_sees_everything_but_the_admin_group() {
        let filtered = filter_accessible_groups(&groups(), &admin(), GroupFilterOptions::default());
        assert_eq!(group_ids(&filtered), vec!["g1", "g2", "g3"]);
    }

    #[test]
    fn admin_group_is_listed_when_requested() {
        let filtered = filter_accessible_groups(
            &groups(),
            &admin(),
            GroupFilterOptions {
                exclude_admin_group: false,
            },
        );
        assert_eq!(filtered, groups());
    }

    #[test]
    fn subadmin_sees_managed_groups_only() {
        let filtered = filter_accessible_groups(
            &groups(),
            &subadmin(&["g3", "g1", "g9"]),
            GroupFilterOptions::default(),
        );
        assert_eq!(group_ids(&filtered), vec!["g1", "g3"]);
    }

    #[test]
    fn manage_all_override_lifts_the_scope() {
        let context = GroupAccessContext {
            can_manage_all_groups: true,
            ..subadmin(&["g1"])
        };
        let filtered = filter_accessible_groups(&groups(), &context, GroupFilterOptions::default());
        assert_eq!(group_ids(&filtered), vec!["g1", "g2", "g3"]);
    }

    #[test]
    fn user_without_managed_groups_sees_nothing() {
        let filtered = filter_accessible_groups(
            &groups(),
            &GroupAccessContext::default(),
            GroupFilterOptions::default(),
        );
        assert!(filtered.is_empty());
        assert!(filter_accessible_groups(&[], &admin(), GroupFilterOptions::default()).is_empty());
    }

    #[test]
    fn assignment_outside_scope_is_denied() {
        let validation = validate_group_assignment(&ids(&["g1", "g9"]), &subadmin(&["g1"]));
        assert_eq!(validation.allowed, ids(&["g1"]));
        assert_eq!(validation.denied, ids(&["g9"]));
        assert!(!validation.is_valid);
    }

    #[test]
    fn admin_may_assign_any_group() {
        let validation = validate_group_assignment(&ids(&["admin", "g9"]), &admin());
        assert_eq!(validation.allowed, ids(&["admin", "g9"]));
        assert!(validation.is_valid);
    }

    #[test]
    fn duplicate_requests_collapse() {
        let validation = validate_group_assignment(&ids(&["g1", "g2", "g1"]), &subadmin(&["g1"]));
        assert_eq!(validation.allowed, ids(&["g1"]));
        assert_eq!(validation.denied, ids(&["g2"]));
    }

    #[test]
    fn empty_request_is_valid() {
        let validation = validate_group_assignment(&[], &GroupAccessContext::default());
        assert!(validation.allowed.is_empty());
        assert!(validation.is_valid);
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent_and_never_leaks_admin(
            managed in proptest::collection::vec("(admin|g[0-9])", 0..6),
            is_admin in any::<bool>(),
        ) {
            let context = GroupAccessContext {
                is_admin,
                managed_groups: managed
                    .iter()
                    .filter_map(|value| GroupId::new(value.as_str()).ok())
                    .collect(),
                can_manage_all_groups: false,
            };
            let first = filter_accessible_groups(&groups(), &context, GroupFilterOptions::default());
            let second = filter_accessible_groups(&groups(), &context, GroupFilterOptions::default());

            prop_assert_eq!(&first, &second);
            prop_assert!(first.iter().all(|group| !group.id().is_admin_group()));
        }
    }
}
