//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookForm},
    pagination::Pagination,
    repository::Repository,
    services::validation,
};

pub fn book_not_found(raw_id: &str) -> String {
    format!(
        "Whoops! Something went wrong. The book id '{}' does not exist in our system.",
        raw_id
    )
}

/// Book ids arrive as text from paths and forms
pub fn parse_book_id(raw: &str) -> AppResult<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::NotFound(book_not_found(raw)))
}

/// One page of the listing
#[derive(Debug, Clone)]
pub struct BookPage {
    pub pagination: Pagination,
    pub books: Vec<Book>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    books_per_page: i64,
}

impl CatalogService {
    pub fn new(repository: Repository, books_per_page: i64) -> Self {
        Self {
            repository,
            books_per_page: books_per_page.max(1),
        }
    }

    /// Page `page` of the books matching every genre term.
    ///
    /// Out-of-range pages are rejected before the listing query runs.
    pub async fn list_page(&self, page: i64, genres: &[String]) -> AppResult<BookPage> {
        let total = self.repository.books.count(genres).await?;
        let pagination = Pagination::new(self.books_per_page, total, page);

        pagination
            .check()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let books = self
            .repository
            .books
            .list_page(genres, pagination.items_per_page(), pagination.offset())
            .await?;

        Ok(BookPage { pagination, books })
    }

    /// Get book by its raw id
    pub async fn get_book(&self, raw_id: &str) -> AppResult<Book> {
        let id = parse_book_id(raw_id)?;
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(book_not_found(raw_id)))
    }

    pub async fn add_book(&self, form: &BookForm) -> AppResult<Book> {
        let draft = validation::validate_book(form)?;
        let book = self.repository.books.create(&draft).await?;

        tracing::info!("Book '{}' added (id={})", book.title, book.id);
        Ok(book)
    }

    /// Replace the descriptive fields of the book named by `form.id`
    pub async fn edit_book(&self, form: &BookForm) -> AppResult<Book> {
        let raw_id = form.id.as_deref().unwrap_or_default();
        let id = parse_book_id(raw_id)?;
        if !self.repository.books.exists(id).await? {
            return Err(AppError::NotFound(book_not_found(raw_id)));
        }

        let draft = validation::validate_book(form)?;
        let book = self
            .repository
            .books
            .update(id, &draft)
            .await?
            .ok_or_else(|| AppError::NotFound(book_not_found(raw_id)))?;

        tracing::info!("Book '{}' edited (id={})", book.title, book.id);
        Ok(book)
    }

    /// Remove a book, returning what was removed
    pub async fn delete_book(&self, raw_id: &str) -> AppResult<Book> {
        let book = self.get_book(raw_id).await?;

        if !self.repository.books.delete(book.id).await? {
            return Err(AppError::NotFound(book_not_found(raw_id)));
        }

        tracing::info!("Book '{}' removed (id={})", book.title, book.id);
        Ok(book)
    }
}
