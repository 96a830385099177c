use super::*;

impl AccessService {
    /// Returns the static menu every projection starts from.
    #[must_use]
    pub fn menu(&self) -> &[MenuSection] {
        &self.menu
    }

    /// Returns the menu sections and items visible to the actor.
    pub async fn navigation_for_actor(&self, actor: &UserIdentity) -> AppResult<NavigationView> {
        let permissions = self.resolve_for_actor(actor).await?;
        Ok(filter_navigation(&self.menu, &permissions))
    }
}
