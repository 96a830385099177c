use std::sync::Arc;

use dataroom_core::{AppError, AppResult, UserIdentity};
use dataroom_domain::{Capability, Group, GroupId, MenuSection};

use crate::{
    ActorDirectory, GroupAssignmentValidation, GroupFilterOptions, NavigationView,
    ResolvedPermissions, filter_accessible_groups, filter_navigation, resolve_permissions,
    validate_group_assignment,
};

mod groups;
mod navigation;


/// Application service answering "who can see and do what" for the console.
#[derive(Clone)]
pub struct AccessService {
    directory: Arc<dyn ActorDirectory>,
    menu: Arc<[MenuSection]>,
}

impl AccessService {
    /// Creates a new access service over a directory and a static menu.
    #[must_use]
    pub fn new(directory: Arc<dyn ActorDirectory>, menu: Vec<MenuSection>) -> Self {
        Self {
            directory,
            menu: menu.into(),
        }
    }

    /// Resolves the role and capabilities of the actor from fresh platform
    /// data.
    pub async fn resolve_for_actor(&self, actor: &UserIdentity) -> AppResult<ResolvedPermissions> {
        let snapshot = self
            .directory
            .fetch_actor_snapshot(actor.subject())
            .await?;

        Ok(resolve_permissions(snapshot.as_ref()))
    }

    /// Ensures the actor holds the capability.
    pub async fn require_capability(
        &self,
        actor: &UserIdentity,
        capability: Capability,
    ) -> AppResult<ResolvedPermissions> {
        let permissions = self.resolve_for_actor(actor).await?;
        if permissions.allows(capability) {
            return Ok(permissions);
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' with role '{}' is missing capability '{}'",
            actor.subject(),
            permissions.role.as_str(),
            capability.as_str()
        )))
    }
}
