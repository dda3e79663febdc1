//! Books repository for database operations
//!
//! Status changes are single guarded `UPDATE`s: the expected current status is
//! part of the `WHERE` clause, so two visitors racing for the same book cannot
//! both win. Each transition reports whether it matched a row.

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, BookDraft, BookStatus, CirculationEntry},
};

const BOOK_COLUMNS: &str =
    "id, title, author, published, cover_page_link, genre, description, status, user_id";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

/// `ILIKE` pattern matching `term` anywhere, wildcards in `term` taken literally
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn genre_patterns(genres: &[String]) -> Vec<String> {
    genres.iter().map(|g| contains_pattern(g)).collect()
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Count books whose genre mentions every term (all books when `genres` is empty)
    pub async fn count(&self, genres: &[String]) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(id) FROM books
            WHERE cardinality($1::text[]) = 0 OR genre ILIKE ALL($1::text[])
            "#,
        )
        .bind(genre_patterns(genres))
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// One page of books ordered by title
    pub async fn list_page(&self, genres: &[String], limit: i64, offset: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {} FROM books
            WHERE cardinality($1::text[]) = 0 OR genre ILIKE ALL($1::text[])
            ORDER BY title, id
            LIMIT $2 OFFSET $3
            "#,
            BOOK_COLUMNS
        ))
        .bind(genre_patterns(genres))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Create a new book, initially available
    pub async fn create(&self, draft: &BookDraft) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, published, cover_page_link, genre, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(draft.published)
        .bind(&draft.cover_page_link)
        .bind(&draft.genre)
        .bind(&draft.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    /// Replace the descriptive fields of a book; status and holder are untouched
    pub async fn update(&self, id: i32, draft: &BookDraft) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, published = $3, cover_page_link = $4,
                genre = $5, description = $6
            WHERE id = $7
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(draft.published)
        .bind(&draft.cover_page_link)
        .bind(&draft.genre)
        .bind(&draft.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Books a user currently holds with the given status
    pub async fn held_by(&self, user_id: i32, status: BookStatus) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE user_id = $1 AND status = $2 ORDER BY title",
            BOOK_COLUMNS
        ))
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Every held book with the given status, with the holder's username
    pub async fn circulation(&self, status: BookStatus) -> AppResult<Vec<CirculationEntry>> {
        let entries = sqlx::query_as::<_, CirculationEntry>(
            r#"
            SELECT b.id, b.title, b.author, b.status, b.user_id, u.username
            FROM books b
            JOIN users u ON b.user_id = u.id
            WHERE b.status = $1
            ORDER BY u.username, b.title
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// available -> reserved by `user_id`
    pub async fn reserve(&self, book_id: i32, user_id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books SET status = 'reserved', user_id = $2
            WHERE id = $1 AND status = 'available'
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// reserved by `user_id` -> checked out to `user_id`
    pub async fn check_out(&self, book_id: i32, user_id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books SET status = 'unavailable', user_id = $2
            WHERE id = $1 AND status = 'reserved' AND user_id = $2
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// checked out to `user_id` -> available
    pub async fn return_book(&self, book_id: i32, user_id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books SET status = 'available', user_id = NULL
            WHERE id = $1 AND status = 'unavailable' AND user_id = $2
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// reserved -> available. With `holder`, only that user's reservation is cancelled.
    pub async fn cancel_reservation(&self, book_id: i32, holder: Option<i32>) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE books SET status = 'available', user_id = NULL
            WHERE id = $1 AND status = 'reserved' AND ($2::integer IS NULL OR user_id = $2)
            "#,
        )
        .bind(book_id)
        .bind(holder)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("fiction"), "%fiction%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("sci_fi"), "%sci\\_fi%");
    }
}
