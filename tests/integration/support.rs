//! Shared helpers

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;

use library_catalogue::{
    api,
    config::{AppConfig, RunMode},
    models::Identity,
    repository::Repository,
    services::Services,
    session::{MemorySessionStore, SessionData, SessionId, SessionStore},
    AppState,
};

pub const COOKIE: &str = "catalogue_session";

pub struct TestApp {
    pub router: Router,
    pub sessions: Arc<MemorySessionStore>,
}

/// Router over a pool that never connects; only paths that stop before the
/// database can be exercised
pub fn app() -> TestApp {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost:1/unreachable")
        .expect("lazy pool");
    app_with_pool(pool)
}

/// Router over `pool` with in-memory sessions
pub fn app_with_pool(pool: PgPool) -> TestApp {
    let config = AppConfig {
        environment: RunMode::Test,
        ..AppConfig::default()
    };

    let services = Services::new(Repository::new(pool), config.catalogue.clone());
    let sessions = Arc::new(MemorySessionStore::new());

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        sessions: sessions.clone(),
    };

    TestApp {
        router: api::create_router(state),
        sessions,
    }
}

pub fn identity(username: &str) -> Identity {
    Identity {
        id: 42,
        username: username.to_string(),
        full_name: "Foo Bar Baz Qux".to_string(),
        account_created_on: Utc::now(),
    }
}

impl TestApp {
    /// Store a session for `username` and return its id
    pub async fn login_as(&self, username: &str) -> SessionId {
        self.login_with(identity(username)).await
    }

    pub async fn login_with(&self, identity: Identity) -> SessionId {
        let id = SessionId::generate();
        let data = SessionData {
            identity: Some(identity),
            ..Default::default()
        };
        self.sessions.save(&id, &data, 60).await.expect("save session");
        id
    }

    pub async fn session(&self, id: &SessionId) -> SessionData {
        self.sessions
            .load(id)
            .await
            .expect("load session")
            .expect("session exists")
    }

    pub async fn get(&self, uri: &str, session: Option<&SessionId>) -> Response<Body> {
        let mut request = Request::builder().uri(uri);
        if let Some(id) = session {
            request = request.header(header::COOKIE, format!("{}={}", COOKIE, id));
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, form: &str, session: Option<&SessionId>) -> Response<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(id) = session {
            request = request.header(header::COOKIE, format!("{}={}", COOKIE, id));
        }
        self.send(request.body(Body::from(form.to_string())).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.expect("router is infallible")
    }
}

/// `Location` of a 303 response
pub fn redirect_target(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}

/// Session id the response asks the browser to keep
pub fn session_cookie(response: &Response<Body>) -> Option<SessionId> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix(&format!("{}=", COOKIE)))
        .and_then(|rest| rest.split(';').next())
        .and_then(SessionId::parse)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
