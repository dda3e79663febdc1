//! HTTP handlers and the router

pub mod account;
pub mod admin;
pub mod books;
pub mod health;
pub mod middleware;
pub mod profile;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    session::{session_layer, FlashRedirect},
    AppState,
};

/// Message of a failure the visitor can fix by resubmitting the form;
/// anything else is passed on
pub(crate) fn recoverable(error: AppError) -> AppResult<String> {
    match error {
        AppError::Validation(msg) | AppError::Conflict(msg) | AppError::Authentication(msg) => Ok(msg),
        other => Err(other),
    }
}

/// Turn a domain failure into a redirect to `to` carrying its message
pub(crate) fn redirect_with(error: AppError, to: &str) -> AppResult<FlashRedirect> {
    match error {
        AppError::NotFound(msg)
        | AppError::Unavailable(msg)
        | AppError::Authorization(msg)
        | AppError::Validation(msg)
        | AppError::Conflict(msg) => Ok(FlashRedirect::error(to, msg)),
        other => Err(other),
    }
}

/// Create the application router with all routes.
///
/// Layers run outermost first: tracing and compression, cookies, the
/// session, then the authorization gate.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalogue
        .route("/", get(books::home))
        .route("/books", get(books::list_books))
        .route("/view/:id", get(books::view_book))
        .route("/reserve", post(books::reserve))
        .route("/cancel_reservation/book", post(books::cancel_reservation))
        // Account
        .route("/login", get(account::login_page).post(account::login))
        .route("/signup", get(account::signup_page).post(account::signup))
        .route("/logout", get(account::logout))
        // Profiles
        .route("/profile", get(profile::own_profile))
        .route("/profile/:username", get(profile::view_profile))
        .route(
            "/profile/:username/edit",
            get(profile::edit_profile_page).post(profile::edit_profile),
        )
        // Administration
        .route("/admin", get(admin::dashboard))
        .route("/admin/", get(admin::dashboard))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/reserved_books", get(admin::reserved_books))
        .route("/admin/checked_out_books", get(admin::checked_out_books))
        .route("/admin/add/book", get(admin::add_book_page).post(admin::add_book))
        .route("/admin/edit/book", post(admin::edit_book))
        .route("/admin/edit/book/:id", get(admin::edit_book_page))
        .route("/admin/delete/book", post(admin::delete_book))
        .route("/admin/delete/user/:username", post(admin::delete_user))
        .route("/admin/checkout/book", post(admin::check_out))
        .route("/admin/return/book", post(admin::return_book))
        .route("/admin/cancel_reservation/book", post(admin::cancel_reservation))
        .fallback(middleware::not_found)
        .layer(from_fn_with_state(state.clone(), middleware::authorize))
        .layer(from_fn_with_state(state.clone(), session_layer))
        .layer(CookieManagerLayer::new())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
