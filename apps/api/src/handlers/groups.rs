use axum::Json;
use axum::extract::{Extension, Query, State};
use dataroom_application::GroupFilterOptions;
use dataroom_core::UserIdentity;

use crate::dto::{
    GroupAssignmentValidationResponse, GroupListQuery, GroupResponse,
    ValidateGroupAssignmentRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_groups_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<GroupListQuery>,
) -> ApiResult<Json<Vec<GroupResponse>>> {
    let options = GroupFilterOptions {
        exclude_admin_group: !query.include_admin.unwrap_or(false),
    };

    let groups = state
        .access_service
        .accessible_groups_for_actor(&user, options)
        .await?
        .into_iter()
        .map(GroupResponse::from)
        .collect();

    Ok(Json(groups))
}

pub async fn validate_group_assignment_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<ValidateGroupAssignmentRequest>,
) -> ApiResult<Json<GroupAssignmentValidationResponse>> {
    let validation = state
        .access_service
        .validate_group_assignment_for_actor(&user, &payload.group_ids)
        .await?;

    Ok(Json(GroupAssignmentValidationResponse::from(validation)))
}
