//! Request gate and fallback

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    authorization,
    session::{FlashRedirect, RequestContext},
    AppState,
};

/// Runs the authorization gate before any handler.
///
/// Must sit inside the session layer, which provides the [`RequestContext`].
pub async fn authorize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let identity = request
        .extensions()
        .get::<RequestContext>()
        .and_then(|context| context.identity.clone());

    let path = request.uri().path().to_string();
    let access = authorization::evaluate(&path, identity.as_ref(), &state.config.catalogue.admin_username);

    match access.refusal() {
        Some((to, message)) => {
            tracing::debug!("Refused {} ({:?}), redirecting to {}", path, access, to);
            FlashRedirect::error(to, message).into_response()
        }
        None => next.run(request).await,
    }
}

pub async fn not_found() -> FlashRedirect {
    FlashRedirect::error("/", "Sorry, that page doesn't exist.")
}
