use super::*;

impl AccessService {
    /// Lists the groups the actor may view and assign.
    pub async fn accessible_groups_for_actor(
        &self,
        actor: &UserIdentity,
        options: GroupFilterOptions,
    ) -> AppResult<Vec<Group>> {
        let permissions = self.resolve_for_actor(actor).await?;
        if !permissions.role.is_at_least_subadmin() {
            return Ok(Vec::new());
        }

        let groups = self.directory.list_groups().await?;
        Ok(filter_accessible_groups(
            &groups,
            &permissions.group_access_context(),
            options,
        ))
    }

    /// Checks requested group ids against the actor's scope before they are
    /// sent to the platform.
    pub async fn validate_group_assignment_for_actor(
        &self,
        actor: &UserIdentity,
        requested_group_ids: &[String],
    ) -> AppResult<GroupAssignmentValidation> {
        let requested = requested_group_ids
            .iter()
            .map(|value| GroupId::new(value.as_str()))
            .collect::<AppResult<Vec<_>>>()?;

        let permissions = self.resolve_for_actor(actor).await?;
        Ok(validate_group_assignment(
            &requested,
            &permissions.group_access_context(),
        ))
    }
}
