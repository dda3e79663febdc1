//! Administration endpoints. The authorization gate has already checked
//! that the caller is the admin.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};

use super::{recoverable, redirect_with};
use crate::{
    error::{AppError, AppResult},
    models::book::{BookForm, BookIdForm, CirculationForm},
    session::{FlashRedirect, RequestContext},
    views::{self, Chrome},
    AppState,
};

fn chrome(state: &AppState, context: &RequestContext) -> Chrome {
    Chrome::new(context, &state.config.catalogue.admin_username)
}

pub async fn dashboard(State(state): State<AppState>, context: RequestContext) -> Response {
    views::admin::dashboard(&chrome(&state, &context)).into_response()
}

pub async fn list_users(State(state): State<AppState>, context: RequestContext) -> AppResult<Response> {
    let users = state.services.users.list_members().await?;
    Ok(views::admin::users(&chrome(&state, &context), &users).into_response())
}

pub async fn reserved_books(State(state): State<AppState>, context: RequestContext) -> AppResult<Response> {
    let entries = state.services.circulation.reserved().await?;
    Ok(views::admin::reserved_books(&chrome(&state, &context), &entries).into_response())
}

pub async fn checked_out_books(State(state): State<AppState>, context: RequestContext) -> AppResult<Response> {
    let entries = state.services.circulation.checked_out().await?;
    Ok(views::admin::checked_out_books(&chrome(&state, &context), &entries).into_response())
}

pub async fn add_book_page(State(state): State<AppState>, context: RequestContext) -> Response {
    views::admin::book_form(&chrome(&state, &context), &BookForm::default()).into_response()
}

pub async fn add_book(
    State(state): State<AppState>,
    context: RequestContext,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    // Adding never targets an existing row
    let form = BookForm { id: None, ..form };

    match state.services.catalog.add_book(&form).await {
        Ok(book) => Ok(FlashRedirect::success(
            "/admin/add/book",
            format!(
                "You have successfully added the book '{}' by {} to the library.",
                book.title, book.author
            ),
        )
        .into_response()),
        Err(e) => {
            let page = chrome(&state, &context).with_error(recoverable(e)?);
            Ok(views::admin::book_form(&page, &form).into_response())
        }
    }
}

pub async fn edit_book_page(
    State(state): State<AppState>,
    context: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Response> {
    match state.services.catalog.get_book(&id).await {
        Ok(book) => Ok(views::admin::book_form(&chrome(&state, &context), &BookForm::from(&book)).into_response()),
        Err(e) => Ok(redirect_with(e, "/books")?.into_response()),
    }
}

pub async fn edit_book(
    State(state): State<AppState>,
    context: RequestContext,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.catalog.edit_book(&form).await {
        Ok(book) => Ok(FlashRedirect::success(
            "/",
            format!("You have successfully edited the book '{}' by {}.", book.title, book.author),
        )
        .into_response()),
        Err(e @ AppError::NotFound(_)) => Ok(redirect_with(e, "/books")?.into_response()),
        Err(e) => {
            let page = chrome(&state, &context).with_error(recoverable(e)?);
            Ok(views::admin::book_form(&page, &form).into_response())
        }
    }
}

pub async fn delete_book(State(state): State<AppState>, Form(form): Form<BookIdForm>) -> AppResult<FlashRedirect> {
    match state.services.catalog.delete_book(&form.id).await {
        Ok(book) => Ok(FlashRedirect::success(
            "/",
            format!("You have successfully removed '{}' from the system.", book.title),
        )),
        Err(e) => redirect_with(e, "/books"),
    }
}

pub async fn delete_user(State(state): State<AppState>, Path(username): Path<String>) -> AppResult<FlashRedirect> {
    match state.services.users.delete_user(&username).await {
        Ok(()) => Ok(FlashRedirect::success(
            "/admin/users",
            format!("You have successfully removed the user '{}' from the system.", username),
        )),
        Err(e) => redirect_with(e, "/admin/users"),
    }
}

pub async fn check_out(State(state): State<AppState>, Form(form): Form<CirculationForm>) -> AppResult<FlashRedirect> {
    match state.services.circulation.check_out(&form.id, &form.username).await {
        Ok(book) => Ok(FlashRedirect::success(
            "/admin/reserved_books",
            format!("You have successfully checked out '{}'.", book.title),
        )),
        Err(e) => redirect_with(e, "/admin/reserved_books"),
    }
}

pub async fn return_book(State(state): State<AppState>, Form(form): Form<CirculationForm>) -> AppResult<FlashRedirect> {
    match state.services.circulation.return_book(&form.id, &form.username).await {
        Ok(book) => Ok(FlashRedirect::success(
            "/admin/checked_out_books",
            format!("You have successfully returned '{}'.", book.title),
        )),
        Err(e) => redirect_with(e, "/admin/checked_out_books"),
    }
}

pub async fn cancel_reservation(
    State(state): State<AppState>,
    Form(form): Form<BookIdForm>,
) -> AppResult<FlashRedirect> {
    match state.services.circulation.cancel_any(&form.id).await {
        Ok(book) => Ok(FlashRedirect::success(
            "/admin/reserved_books",
            format!("You've cancelled a reservation for the book '{}'", book.title),
        )),
        Err(e) => redirect_with(e, "/admin/reserved_books"),
    }
}
