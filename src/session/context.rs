//! Request-scoped view of the session

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use super::{Flash, FlashRedirect, SessionId};
use crate::{
    authorization::{self, LOGIN_REQUIRED},
    error::AppError,
    models::Identity,
};

/// Who is asking, and what is waiting to be shown to them.
///
/// Built once per request by the session layer and handed to handlers as an
/// extractor.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub session_id: SessionId,
    pub identity: Option<Identity>,
    /// Messages left by the previous request
    pub flash: Flash,
}

impl RequestContext {
    pub fn is_admin(&self, admin_username: &str) -> bool {
        authorization::is_admin(self.identity.as_ref(), admin_username)
    }

    pub fn is_self_or_admin(&self, username: &str, admin_username: &str) -> bool {
        authorization::is_self_or_admin(self.identity.as_ref(), username, admin_username)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| AppError::Internal("Session layer is not installed".to_string()))
    }
}

/// Extractor for handlers that need a logged-in user
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let context = RequestContext::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        context
            .identity
            .map(CurrentUser)
            .ok_or_else(|| FlashRedirect::error("/login", LOGIN_REQUIRED).into_response())
    }
}
