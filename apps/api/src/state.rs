use axum::http::HeaderName;
use dataroom_application::AccessService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub actor_header: HeaderName,
}
