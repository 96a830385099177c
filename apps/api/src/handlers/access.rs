use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use dataroom_core::{AppError, UserIdentity};
use dataroom_domain::Capability;
use tracing::warn;

use crate::dto::{MeResponse, PermissionsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<MeResponse>> {
    let permissions = state.access_service.resolve_for_actor(&user).await?;

    Ok(Json(MeResponse::new(
        &user,
        PermissionsResponse::from(permissions),
    )))
}

pub async fn capability_check_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(capability): Path<String>,
) -> ApiResult<StatusCode> {
    let capability = Capability::from_transport(capability.as_str())?;
    state
        .access_service
        .require_capability(&user, capability)
        .await
        .inspect_err(|error| {
            if matches!(error, AppError::Forbidden(_)) {
                warn!(
                    subject = user.subject(),
                    capability = capability.as_str(),
                    "capability check denied"
                );
            }
        })?;

    Ok(StatusCode::NO_CONTENT)
}
