//! Catalogue browsing and reservations

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};

use crate::{
    error::{AppError, AppResult},
    models::book::{genre_terms, BookIdForm, BookListQuery},
    pagination::{parse_page, NOT_A_PAGE_NUMBER},
    session::{CurrentUser, Flash, FlashRedirect, RequestContext},
    views::{self, Chrome},
    AppState,
};

pub async fn home() -> Redirect {
    Redirect::to("/books?page=1&genre=all")
}

/// Paginated listing, optionally filtered by genre terms
pub async fn list_books(
    State(state): State<AppState>,
    context: RequestContext,
    Query(query): Query<BookListQuery>,
) -> AppResult<Response> {
    let Some(page) = parse_page(query.page.as_deref()) else {
        return Ok(FlashRedirect::error("/books", NOT_A_PAGE_NUMBER).into_response());
    };

    let genre = query
        .genre
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or("all")
        .to_string();

    match state.services.catalog.list_page(page, &genre_terms(Some(&genre))).await {
        Ok(listing) => {
            let mut chrome = Chrome::new(&context, &state.config.catalogue.admin_username);
            if listing.books.is_empty() && !genre.eq_ignore_ascii_case("all") {
                chrome = chrome.with_flash(Flash::hint(
                    "No books match those genres. Use 'all' to see every book.",
                ));
            }
            Ok(views::books::list(&chrome, &listing, &genre).into_response())
        }
        Err(AppError::Validation(message)) => Ok(FlashRedirect::error("/books", message).into_response()),
        Err(e) => Err(e),
    }
}

pub async fn view_book(
    State(state): State<AppState>,
    context: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Response> {
    match state.services.catalog.get_book(&id).await {
        Ok(book) => {
            let chrome = Chrome::new(&context, &state.config.catalogue.admin_username);
            let viewer = context.identity.as_ref().map(|i| i.id);
            Ok(views::books::detail(&chrome, &book, viewer).into_response())
        }
        Err(AppError::NotFound(message)) => Ok(FlashRedirect::error("/books", message).into_response()),
        Err(e) => Err(e),
    }
}

pub async fn reserve(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<BookIdForm>,
) -> AppResult<FlashRedirect> {
    match state.services.circulation.reserve(&form.id, &user).await {
        Ok(book) => Ok(FlashRedirect::success(
            "/",
            format!(
                "You have successfully reserved the book '{}'. Awaiting confirmation from librarian.",
                book.title
            ),
        )),
        Err(AppError::NotFound(message)) => Ok(FlashRedirect::error("/books", message)),
        Err(AppError::Unavailable(message)) => Ok(FlashRedirect::error(format!("/view/{}", form.id.trim()), message)),
        Err(e) => Err(e),
    }
}

/// Cancel the caller's own reservation
pub async fn cancel_reservation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<BookIdForm>,
) -> AppResult<FlashRedirect> {
    match state.services.circulation.cancel_own(&form.id, &user).await {
        Ok(book) => Ok(FlashRedirect::success(
            "/",
            format!("You've cancelled a reservation for the book '{}'", book.title),
        )),
        Err(AppError::NotFound(message)) => Ok(FlashRedirect::error("/books", message)),
        Err(AppError::Unavailable(message)) => Ok(FlashRedirect::error("/", message)),
        Err(e) => Err(e),
    }
}
