use dataroom_core::UserIdentity;
use serde::Serialize;
use ts_rs::TS;

use super::PermissionsResponse;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of the calling actor and their resolved permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/me-response.ts"
)]
pub struct MeResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub permissions: PermissionsResponse,
}

impl MeResponse {
    #[must_use]
    pub fn new(identity: &UserIdentity, permissions: PermissionsResponse) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            permissions,
        }
    }
}
