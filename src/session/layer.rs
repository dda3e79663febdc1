//! Session middleware and the flash-carrying redirect

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::{
    cookie::{time::Duration, SameSite},
    Cookie, Cookies,
};

use super::{Flash, IdentityChange, RequestContext, SessionData, SessionId, SessionUpdate};
use crate::AppState;

/// Redirect that leaves a message (and possibly an identity change) in the session
#[derive(Debug, Clone)]
pub struct FlashRedirect {
    to: String,
    update: SessionUpdate,
}

impl FlashRedirect {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            to: path.into(),
            update: SessionUpdate::default(),
        }
    }

    pub fn success(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::to(path).with_flash(Flash::success(message))
    }

    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::to(path).with_flash(Flash::error(message))
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.update.flash.merge(flash);
        self
    }

    pub fn with_identity(mut self, change: IdentityChange) -> Self {
        self.update.identity = Some(change);
        self
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let mut response = Redirect::to(&self.to).into_response();
        response.extensions_mut().insert(self.update);
        response
    }
}

/// Loads the visitor's session, exposes it as a [`RequestContext`] and
/// persists whatever the handler changed.
///
/// A page rendered successfully consumes the pending flash messages.
pub async fn session_layer(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    let settings = &state.config.session;

    let presented = cookies
        .get(&settings.cookie_name)
        .and_then(|cookie| SessionId::parse(cookie.value()));

    let loaded = match presented.as_ref() {
        Some(id) => match state.sessions.load(id).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Failed to load session: {}", e);
                None
            }
        },
        None => None,
    };

    let known = loaded.is_some();
    let current = loaded.unwrap_or_default();
    let id = match presented {
        Some(id) if known => id,
        _ => SessionId::generate(),
    };

    request.extensions_mut().insert(RequestContext {
        session_id: id.clone(),
        identity: current.identity.clone(),
        flash: current.flash.clone(),
    });

    let response = next.run(request).await;

    let mut updated = current.clone();
    if response.status().is_success() {
        updated.flash = Flash::default();
    }
    let rotate = match response.extensions().get::<SessionUpdate>() {
        Some(update) => update.clone().apply(&mut updated),
        None => false,
    };

    if updated == current && !rotate {
        return response;
    }

    if let Err(e) = persist(&state, &cookies, id, known, rotate, &updated).await {
        tracing::error!("Failed to persist session: {}", e);
    }

    response
}

async fn persist(
    state: &AppState,
    cookies: &Cookies,
    id: SessionId,
    known: bool,
    rotate: bool,
    data: &SessionData,
) -> crate::AppResult<()> {
    let settings = &state.config.session;

    if known && (rotate || data.is_empty()) {
        state.sessions.remove(&id).await?;
    }

    if data.is_empty() {
        cookies.remove(Cookie::build((settings.cookie_name.clone(), "")).path("/").build());
        return Ok(());
    }

    let target = if rotate { SessionId::generate() } else { id };
    state.sessions.save(&target, data, settings.ttl_seconds).await?;

    let cookie = Cookie::build((settings.cookie_name.clone(), target.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(settings.ttl_seconds as i64))
        .build();
    cookies.add(cookie);

    Ok(())
}
