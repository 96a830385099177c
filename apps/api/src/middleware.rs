use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName};
use axum::middleware::Next;
use axum::response::Response;
use dataroom_core::{AppError, AppResult, UserIdentity};

use crate::error::ApiResult;
use crate::state::AppState;

/// Companion headers some proxies forward alongside the user id.
const DISPLAY_NAME_HEADER: &str = "x-remote-name";
const EMAIL_HEADER: &str = "x-remote-email";

pub async fn require_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers(), &state.actor_header)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub fn identity_from_headers(
    headers: &HeaderMap,
    actor_header: &HeaderName,
) -> AppResult<UserIdentity> {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let subject = header_value(actor_header.as_str())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let display_name = header_value(DISPLAY_NAME_HEADER).unwrap_or(subject);
    let email = header_value(EMAIL_HEADER).map(ToOwned::to_owned);

    Ok(UserIdentity::new(subject, display_name, email))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderName, HeaderValue};
    use dataroom_core::AppError;

    use super::identity_from_headers;

    fn actor_header() -> HeaderName {
        HeaderName::from_static("x-remote-user")
    }

    #[test]
    fn missing_actor_header_is_unauthorized() {
        let identity = identity_from_headers(&HeaderMap::new(), &actor_header());
        assert!(matches!(identity, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn blank_actor_header_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(actor_header(), HeaderValue::from_static("  "));
        assert!(identity_from_headers(&headers, &actor_header()).is_err());
    }

    #[test]
    fn identity_uses_companion_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(actor_header(), HeaderValue::from_static("carol"));
        headers.insert("x-remote-name", HeaderValue::from_static("Carol Smith"));
        headers.insert("x-remote-email", HeaderValue::from_static("carol@example.com"));

        let identity = identity_from_headers(&headers, &actor_header());
        let Ok(identity) = identity else {
            panic!("identity should resolve");
        };
        assert_eq!(identity.subject(), "carol");
        assert_eq!(identity.display_name(), "Carol Smith");
        assert_eq!(identity.email(), Some("carol@example.com"));
    }
}
