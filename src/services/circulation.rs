//! Reservations, checkouts and returns
//!
//! Every transition is a single guarded update in the repository. When the
//! guard does not match (someone else got there first, or the book is in the
//! wrong state) the caller gets [`AppError::Unavailable`].

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookStatus, CirculationEntry},
        Identity,
    },
    repository::Repository,
    services::{
        catalog::{book_not_found, parse_book_id},
        users::user_not_found,
    },
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn book(&self, raw_id: &str) -> AppResult<Book> {
        let id = parse_book_id(raw_id)?;
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(book_not_found(raw_id)))
    }

    async fn holder_id(&self, username: &str) -> AppResult<i32> {
        self.repository
            .users
            .get_by_username(username)
            .await?
            .map(|user| user.id)
            .ok_or_else(|| AppError::NotFound(user_not_found(username)))
    }

    /// Place a reservation on an available book
    pub async fn reserve(&self, raw_id: &str, user: &Identity) -> AppResult<Book> {
        let book = self.book(raw_id).await?;

        if !self.repository.books.reserve(book.id, user.id).await? {
            tracing::warn!(
                "Reservation of book {} by '{}' rejected: status was {}",
                book.id,
                user.username,
                book.status
            );
            return Err(AppError::Unavailable(format!(
                "Sorry, the book '{}' is no longer available to reserve.",
                book.title
            )));
        }

        tracing::info!("Book {} reserved by '{}'", book.id, user.username);
        Ok(book)
    }

    /// Cancel the caller's own reservation
    pub async fn cancel_own(&self, raw_id: &str, user: &Identity) -> AppResult<Book> {
        let book = self.book(raw_id).await?;

        if !self.repository.books.cancel_reservation(book.id, Some(user.id)).await? {
            tracing::warn!(
                "Cancellation of book {} by '{}' rejected: not their reservation",
                book.id,
                user.username
            );
            return Err(AppError::Unavailable(format!(
                "You do not have a reservation for the book '{}'.",
                book.title
            )));
        }

        tracing::info!("Reservation of book {} cancelled by '{}'", book.id, user.username);
        Ok(book)
    }

    /// Cancel whoever's reservation is on the book
    pub async fn cancel_any(&self, raw_id: &str) -> AppResult<Book> {
        let book = self.book(raw_id).await?;

        if !self.repository.books.cancel_reservation(book.id, None).await? {
            tracing::warn!("Cancellation of book {} rejected: not reserved", book.id);
            return Err(AppError::Unavailable(format!(
                "The book '{}' is not currently reserved.",
                book.title
            )));
        }

        tracing::info!("Reservation of book {} cancelled by admin", book.id);
        Ok(book)
    }

    /// Hand a reserved book to the user who reserved it
    pub async fn check_out(&self, raw_id: &str, username: &str) -> AppResult<Book> {
        let book = self.book(raw_id).await?;
        let user_id = self.holder_id(username).await?;

        if !self.repository.books.check_out(book.id, user_id).await? {
            tracing::warn!(
                "Checkout of book {} to '{}' rejected: not reserved by them",
                book.id,
                username
            );
            return Err(AppError::Unavailable(format!(
                "The book '{}' is not reserved by '{}'.",
                book.title, username
            )));
        }

        tracing::info!("Book {} checked out to '{}'", book.id, username);
        Ok(book)
    }

    /// Put a book checked out to `username` back on the shelf
    pub async fn return_book(&self, raw_id: &str, username: &str) -> AppResult<Book> {
        let book = self.book(raw_id).await?;
        let user_id = self.holder_id(username).await?;

        if !self.repository.books.return_book(book.id, user_id).await? {
            tracing::warn!(
                "Return of book {} from '{}' rejected: not checked out to them",
                book.id,
                username
            );
            return Err(AppError::Unavailable(format!(
                "The book '{}' is not checked out to '{}'.",
                book.title, username
            )));
        }

        tracing::info!("Book {} returned by '{}'", book.id, username);
        Ok(book)
    }

    pub async fn reserved(&self) -> AppResult<Vec<CirculationEntry>> {
        self.repository.books.circulation(BookStatus::Reserved).await
    }

    pub async fn checked_out(&self) -> AppResult<Vec<CirculationEntry>> {
        self.repository.books.circulation(BookStatus::Unavailable).await
    }
}
