use axum::Json;
use axum::extract::{Extension, State};
use dataroom_core::UserIdentity;

use crate::dto::NavigationResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn navigation_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<NavigationResponse>> {
    let navigation = state.access_service.navigation_for_actor(&user).await?;

    Ok(Json(NavigationResponse::from(navigation)))
}
