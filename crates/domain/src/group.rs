use dataroom_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Reserved id of the platform's administrators group.
pub const ADMIN_GROUP_ID: &str = "admin";

/// Identifier of a platform group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(String);

impl GroupId {
    /// Creates a validated group identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "group id must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this is the reserved administrators group.
    #[must_use]
    pub fn is_admin_group(&self) -> bool {
        self.as_str() == ADMIN_GROUP_ID
    }
}

impl TryFrom<String> for GroupId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupId> for String {
    fn from(value: GroupId) -> Self {
        value.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Group entry as listed by the platform's group directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    display_name: String,
    member_count: u32,
}

impl Group {
    /// Creates a group entry. A blank display name falls back to the id.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        member_count: u32,
    ) -> AppResult<Self> {
        let id = GroupId::new(id)?;
        let display_name = display_name.into().trim().to_owned();
        let display_name = if display_name.is_empty() {
            id.as_str().to_owned()
        } else {
            display_name
        };

        Ok(Self {
            id,
            display_name,
            member_count,
        })
    }

    /// Returns the group id.
    #[must_use]
    pub fn id(&self) -> &GroupId {
        &self.id
    }

    /// Returns the human-readable group name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the number of members reported by the platform.
    #[must_use]
    pub fn member_count(&self) -> u32 {
        self.member_count
    }
}
