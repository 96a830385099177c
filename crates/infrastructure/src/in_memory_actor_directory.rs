use std::collections::HashMap;

use async_trait::async_trait;
use dataroom_application::{ActorDirectory, ActorSnapshot};
use dataroom_core::{AppError, AppResult};
use dataroom_domain::Group;
use serde::Deserialize;

/// Seed file layout for the in-memory directory.
#[derive(Debug, Default, Deserialize)]
pub struct DirectorySeed {
    /// Known actors.
    #[serde(default)]
    pub actors: Vec<ActorSnapshot>,
    /// Group directory.
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// In-memory directory used for local development and tests.
#[derive(Default)]
pub struct InMemoryActorDirectory {
    actors: HashMap<String, ActorSnapshot>,
    groups: Vec<Group>,
}

impl InMemoryActorDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory from seed data.
    #[must_use]
    pub fn from_seed(seed: DirectorySeed) -> Self {
        Self {
            actors: seed
                .actors
                .into_iter()
                .map(|snapshot| (snapshot.user_id.clone(), snapshot))
                .collect(),
            groups: seed.groups,
        }
    }

    /// Parses seed data from JSON.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let seed: DirectorySeed = serde_json::from_str(json)
            .map_err(|error| AppError::Validation(format!("invalid directory seed: {error}")))?;
        Ok(Self::from_seed(seed))
    }
}

#[async_trait]
impl ActorDirectory for InMemoryActorDirectory {
    async fn fetch_actor_snapshot(&self, user_id: &str) -> AppResult<Option<ActorSnapshot>> {
        Ok(self.actors.get(user_id).cloned())
    }

    async fn list_groups(&self) -> AppResult<Vec<Group>> {
        Ok(self.groups.clone())
    }
}
