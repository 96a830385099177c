use async_trait::async_trait;
use dataroom_core::AppResult;
use dataroom_domain::Group;

use crate::ActorSnapshot;

/// Read port onto the groupware platform's user and group directory.
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    /// Fetches group data for a user, `None` when the platform does not know
    /// the user.
    async fn fetch_actor_snapshot(&self, user_id: &str) -> AppResult<Option<ActorSnapshot>>;

    /// Lists every group known to the platform.
    async fn list_groups(&self) -> AppResult<Vec<Group>>;
}
