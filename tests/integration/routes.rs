//! Router behaviour that is decided before any database access

use axum::http::StatusCode;

use library_catalogue::{
    authorization::{ADMIN_REQUIRED, LOGIN_REQUIRED},
    models::USERNAME_CHARS_MESSAGE,
};

use crate::support::{app, body_text, redirect_target, session_cookie};

#[tokio::test]
async fn test_anonymous_visitor_is_sent_to_login() {
    let app = app();

    let response = app.get("/books?page=1", None).await;
    assert_eq!(redirect_target(&response), "/login");

    let id = session_cookie(&response).expect("session cookie");
    assert_eq!(app.session(&id).await.flash.error.as_deref(), Some(LOGIN_REQUIRED));

    // The message is shown once on the login page
    let response = app.get("/login", Some(&id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(LOGIN_REQUIRED));

    let response = app.get("/login", Some(&id)).await;
    assert!(!body_text(response).await.contains(LOGIN_REQUIRED));
}

#[tokio::test]
async fn test_unknown_path_requires_login_first() {
    let app = app();
    let response = app.get("/no/such/page", None).await;
    assert_eq!(redirect_target(&response), "/login");
}

#[tokio::test]
async fn test_public_pages() {
    let app = app();

    for path in ["/login", "/signup", "/health"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", path);
    }

    let body = body_text(app.get("/health", None).await).await;
    assert!(body.contains("\"status\":\"healthy\""));
}

#[tokio::test]
async fn test_member_cannot_open_admin_pages() {
    let app = app();
    let id = app.login_as("johnsmith1234").await;

    for path in ["/admin", "/admin/", "/admin/users", "/admin/add/book"] {
        let response = app.get(path, Some(&id)).await;
        assert_eq!(redirect_target(&response), "/", "{}", path);
        assert_eq!(app.session(&id).await.flash.error.as_deref(), Some(ADMIN_REQUIRED));
    }

    // Only the admin prefix is gated
    let response = app.get("/administrators", Some(&id)).await;
    assert_eq!(redirect_target(&response), "/");
    assert_eq!(
        app.session(&id).await.flash.error.as_deref(),
        Some("Sorry, that page doesn't exist.")
    );
}

#[tokio::test]
async fn test_admin_dashboard() {
    let app = app();
    let id = app.login_as("admin").await;

    let response = app.get("/admin", Some(&id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("/admin/reserved_books"));
}

#[tokio::test]
async fn test_home_and_own_profile_redirects() {
    let app = app();
    let id = app.login_as("foo_bar_baz").await;

    let response = app.get("/", Some(&id)).await;
    assert_eq!(redirect_target(&response), "/books?page=1&genre=all");

    let response = app.get("/profile", Some(&id)).await;
    assert_eq!(redirect_target(&response), "/profile/foo_bar_baz");
}

#[tokio::test]
async fn test_non_numeric_page_is_rejected() {
    let app = app();
    let id = app.login_as("johnsmith1234").await;

    for page in ["abc", "007", "+2"] {
        let response = app.get(&format!("/books?page={}", page), Some(&id)).await;
        assert_eq!(redirect_target(&response), "/books");
        assert_eq!(
            app.session(&id).await.flash.error.as_deref(),
            Some("Whoops! Something went wrong. You cannot view that page. You must use a number for the page.")
        );
    }
}

#[tokio::test]
async fn test_malformed_book_ids() {
    let app = app();
    let id = app.login_as("johnsmith1234").await;

    let response = app.get("/view/abc", Some(&id)).await;
    assert_eq!(redirect_target(&response), "/books");
    assert_eq!(
        app.session(&id).await.flash.error.as_deref(),
        Some("Whoops! Something went wrong. The book id 'abc' does not exist in our system.")
    );

    let response = app.post_form("/reserve", "id=", Some(&id)).await;
    assert_eq!(redirect_target(&response), "/books");
}

#[tokio::test]
async fn test_signup_rejects_spaces() {
    let app = app();

    let response = app
        .post_form("/signup", "full_name=&username=john+smith&password=", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Your username cannot contain spaces."));
    assert!(body.contains("value=\"john smith\""));
}

#[tokio::test]
async fn test_signup_rejects_characters_unsafe_in_paths() {
    let app = app();

    for (encoded, username) in [("bob%3Fx", "bob?x"), ("a%2Fb", "a/b"), ("x%23y", "x#y")] {
        let form = format!("full_name=Bob&username={}&password=pw", encoded);
        let response = app.post_form("/signup", &form, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", username);

        let body = body_text(response).await;
        assert!(body.contains(USERNAME_CHARS_MESSAGE), "{}", username);
        assert!(body.contains(&format!("value=\"{}\"", username)), "{}", username);
    }
}

#[tokio::test]
async fn test_signup_missing_fields() {
    let app = app();

    let body = body_text(app.post_form("/signup", "full_name=&username=john&password=pw", None).await).await;
    assert!(body.contains("You must enter your name."));

    let body = body_text(app.post_form("/signup", "full_name=John&username=&password=pw", None).await).await;
    assert!(body.contains("You must enter a username."));

    let body = body_text(app.post_form("/signup", "full_name=John&username=john&password=", None).await).await;
    assert!(body.contains("You must enter a password."));
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = app();

    let body = body_text(app.post_form("/login", "username=fakeusername&password=", None).await).await;
    assert!(body.contains("You must enter a password."));
    assert!(body.contains("value=\"fakeusername\""));

    let body = body_text(app.post_form("/login", "username=&password=secret", None).await).await;
    assert!(body.contains("You must enter a username."));
}

#[tokio::test]
async fn test_logout() {
    let app = app();
    let id = app.login_as("johnsmith1234").await;

    let response = app.get("/logout", Some(&id)).await;
    assert_eq!(redirect_target(&response), "/login");

    let session = app.session(&id).await;
    assert!(session.identity.is_none());
    assert_eq!(session.flash.success.as_deref(), Some("You logged out."));

    let response = app.get("/login", Some(&id)).await;
    assert!(body_text(response).await.contains("You logged out."));

    // Logged out again, so the catalogue is closed
    let response = app.get("/books", Some(&id)).await;
    assert_eq!(redirect_target(&response), "/login");
}
