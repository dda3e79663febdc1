//! Repository and service behaviour against a real database

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use chrono::Utc;
use library_catalogue::{
    authorization::PRIVATE_PAGE,
    config::CatalogueConfig,
    error::AppError,
    models::{
        book::{BookDraft, BookForm, BookStatus},
        user::{LoginForm, SignupForm},
        Identity,
    },
    repository::Repository,
    services::Services,
};

use crate::support::{app_with_pool, redirect_target};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
    pool
}

fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

fn draft(title: &str, genre: &str) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        author: "George Orwell".to_string(),
        published: None,
        cover_page_link: None,
        genre: genre.to_string(),
        description: None,
    }
}

async fn signup(services: &Services, username: &str) -> Identity {
    let user = services
        .users
        .signup(&SignupForm {
            full_name: "Foo Bar Baz Qux".to_string(),
            username: username.to_string(),
            password: "password".to_string(),
        })
        .await
        .expect("signup");
    Identity::from(&user)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_reservation_lifecycle() {
    let repository = Repository::new(pool().await);
    let services = Services::new(repository.clone(), CatalogueConfig::default());

    let reader = signup(&services, &unique("reader")).await;
    let rival = signup(&services, &unique("rival")).await;
    let book = repository.books.create(&draft(&unique("Animal Farm "), "Satire")).await.unwrap();
    let id = book.id.to_string();
    assert_eq!(book.status, BookStatus::Available);
    assert_eq!(book.user_id, None);

    // First reservation wins, the second is refused
    services.circulation.reserve(&id, &reader).await.unwrap();
    let err = services.circulation.reserve(&id, &rival).await.unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));

    let stored = repository.books.get_by_id(book.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookStatus::Reserved);
    assert_eq!(stored.user_id, Some(reader.id));

    // Only the reserving user can have it checked out
    let err = services.circulation.check_out(&id, &rival.username).await.unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));
    services.circulation.check_out(&id, &reader.username).await.unwrap();

    let stored = repository.books.get_by_id(book.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookStatus::Unavailable);
    assert_eq!(stored.user_id, Some(reader.id));
    assert!(services
        .circulation
        .checked_out()
        .await
        .unwrap()
        .iter()
        .any(|entry| entry.id == book.id && entry.username == reader.username));

    // Only the holder can return it
    let err = services.circulation.return_book(&id, &rival.username).await.unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));
    let stored = repository.books.get_by_id(book.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookStatus::Unavailable);
    assert_eq!(stored.user_id, Some(reader.id));

    services.circulation.return_book(&id, &reader.username).await.unwrap();
    let stored = repository.books.get_by_id(book.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookStatus::Available);
    assert_eq!(stored.user_id, None);

    // Returning twice is refused
    let err = services.circulation.return_book(&id, &reader.username).await.unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));

    repository.books.delete(book.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_cancel_only_own_reservation() {
    let repository = Repository::new(pool().await);
    let services = Services::new(repository.clone(), CatalogueConfig::default());

    let reader = signup(&services, &unique("reader")).await;
    let other = signup(&services, &unique("other")).await;
    let book = repository.books.create(&draft(&unique("Dune "), "Science Fiction")).await.unwrap();
    let id = book.id.to_string();

    services.circulation.reserve(&id, &reader).await.unwrap();
    assert!(services.circulation.cancel_own(&id, &other).await.is_err());
    services.circulation.cancel_own(&id, &reader).await.unwrap();

    services.circulation.reserve(&id, &other).await.unwrap();
    services.circulation.cancel_any(&id).await.unwrap();
    let stored = repository.books.get_by_id(book.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookStatus::Available);

    repository.books.delete(book.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_deleting_user_releases_books() {
    let repository = Repository::new(pool().await);
    let services = Services::new(repository.clone(), CatalogueConfig::default());

    let reader = signup(&services, &unique("leaving")).await;
    let book = repository.books.create(&draft(&unique("Emma "), "Novel")).await.unwrap();
    services.circulation.reserve(&book.id.to_string(), &reader).await.unwrap();

    services.users.delete_user(&reader.username).await.unwrap();

    let stored = repository.books.get_by_id(book.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookStatus::Available);
    assert_eq!(stored.user_id, None);
    assert!(!repository.users.exists(&reader.username).await.unwrap());

    repository.books.delete(book.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_signup_and_login() {
    let repository = Repository::new(pool().await);
    let services = Services::new(repository, CatalogueConfig::default());

    let username = unique("JohnSmith");
    let identity = signup(&services, &username).await;
    assert_eq!(identity.username, username.to_lowercase());

    // Taken, whatever the case
    let err = services
        .users
        .signup(&SignupForm {
            full_name: "Someone Else".to_string(),
            username: username.to_uppercase(),
            password: "pw".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message(),
        "That username is already taken. Please choose another one."
    );

    let user = services
        .users
        .authenticate(&LoginForm {
            username: username.clone(),
            password: "password".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.id, identity.id);
    assert_ne!(user.password, "password");

    let err = services
        .users
        .authenticate(&LoginForm {
            username: username.clone(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Incorrect password entered.");

    let err = services
        .users
        .authenticate(&LoginForm {
            username: "fakeusername".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message(),
        "We cannot find anyone with the username 'fakeusername'."
    );

    services.users.delete_user(&identity.username).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_listing_pages_and_genres() {
    let repository = Repository::new(pool().await);
    let services = Services::new(repository.clone(), CatalogueConfig::default());

    let genre = unique("genre");
    let mut ids = Vec::new();
    for n in 0..7 {
        let book = services
            .catalog
            .add_book(&BookForm {
                title: format!("Title {}", n),
                author: "Harper Lee".to_string(),
                genre: format!("Fiction, {}", genre),
                ..Default::default()
            })
            .await
            .unwrap();
        ids.push(book.id);
    }

    let terms = vec![genre.clone(), "fiction".to_string()];
    let first = services.catalog.list_page(1, &terms).await.unwrap();
    assert_eq!(first.pagination.total_items(), 7);
    assert_eq!(first.pagination.max_pages(), 2);
    assert_eq!(first.books.len(), 5);
    assert_eq!(first.books[0].title, "Title 0");

    let second = services.catalog.list_page(2, &terms).await.unwrap();
    assert_eq!(second.books.len(), 2);
    assert_eq!(second.pagination.range_label(), "6-7");

    let err = services.catalog.list_page(3, &terms).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let err = services.catalog.list_page(0, &terms).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    for id in ids {
        services.catalog.delete_book(&id.to_string()).await.unwrap();
    }
}

/// Session identity for the admin. Ids start at 1, so it never matches a row.
fn admin_identity() -> Identity {
    Identity {
        id: 0,
        username: "admin".to_string(),
        full_name: "Administrator".to_string(),
        account_created_on: Utc::now(),
    }
}

#[tokio::test]
#[ignore]
async fn test_member_cannot_open_another_profile() {
    let pool = pool().await;
    let services = Services::new(Repository::new(pool.clone()), CatalogueConfig::default());
    let owner = signup(&services, &unique("owner")).await;
    let intruder = signup(&services, &unique("intruder")).await;

    let app = app_with_pool(pool);
    let sid = app.login_with(intruder.clone()).await;

    let profile = format!("/profile/{}", owner.username);
    let edit = format!("/profile/{}/edit", owner.username);
    for path in [&profile, &edit] {
        let response = app.get(path, Some(&sid)).await;
        assert_eq!(redirect_target(&response), "/", "{}", path);
        assert_eq!(app.session(&sid).await.flash.error.as_deref(), Some(PRIVATE_PAGE), "{}", path);
    }

    let form = format!("full_name=Taken+Over&new_username={}", unique("taken"));
    let response = app.post_form(&edit, &form, Some(&sid)).await;
    assert_eq!(redirect_target(&response), "/");
    assert_eq!(app.session(&sid).await.flash.error.as_deref(), Some(PRIVATE_PAGE));

    let stored = services.users.get_user(&owner.username).await.unwrap();
    assert_eq!(stored.full_name, owner.full_name);
    assert_eq!(app.session(&sid).await.identity, Some(intruder.clone()));

    services.users.delete_user(&owner.username).await.unwrap();
    services.users.delete_user(&intruder.username).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_admin_edit_keeps_admin_session() {
    let pool = pool().await;
    let services = Services::new(Repository::new(pool.clone()), CatalogueConfig::default());
    let member = signup(&services, &unique("member")).await;

    let app = app_with_pool(pool);
    let admin = admin_identity();
    let sid = app.login_with(admin.clone()).await;

    let renamed = unique("renamed");
    let form = format!("full_name=Renamed+Member&new_username={}", renamed);
    let response = app
        .post_form(&format!("/profile/{}/edit", member.username), &form, Some(&sid))
        .await;
    assert_eq!(redirect_target(&response), "/");

    let session = app.session(&sid).await;
    assert_eq!(session.flash.success.as_deref(), Some("Profile has been updated."));
    assert_eq!(session.identity, Some(admin));

    let stored = services.users.get_user(&renamed).await.unwrap();
    assert_eq!(stored.id, member.id);
    assert_eq!(stored.full_name, "Renamed Member");

    services.users.delete_user(&renamed).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_self_edit_refreshes_session_identity() {
    let pool = pool().await;
    let services = Services::new(Repository::new(pool.clone()), CatalogueConfig::default());
    let member = signup(&services, &unique("member")).await;

    let app = app_with_pool(pool);
    let sid = app.login_with(member.clone()).await;

    let renamed = unique("renamed");
    let form = format!("full_name=New+Name&new_username={}", renamed);
    let response = app
        .post_form(&format!("/profile/{}/edit", member.username), &form, Some(&sid))
        .await;
    assert_eq!(redirect_target(&response), "/");

    let identity = app.session(&sid).await.identity.expect("still logged in");
    assert_eq!(identity.id, member.id);
    assert_eq!(identity.username, renamed);
    assert_eq!(identity.full_name, "New Name");

    // The refreshed identity opens the renamed profile
    let response = app.get(&format!("/profile/{}", renamed), Some(&sid)).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    services.users.delete_user(&renamed).await.unwrap();
}
