//! Book model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Circulation status of a book.
///
/// A book has an owning user exactly when it is not `Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "book_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Reserved,
    Unavailable,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Reserved => "reserved",
            BookStatus::Unavailable => "unavailable",
        }
    }

    /// Sentence shown on the book page
    pub fn describe(&self) -> &'static str {
        match self {
            BookStatus::Available => "Book is available to reserve",
            BookStatus::Reserved => "Book is currently reserved",
            BookStatus::Unavailable => "Book is currently unavailable",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Book row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub published: Option<NaiveDate>,
    pub cover_page_link: Option<String>,
    /// Free text, usually comma separated ("Thriller, Fiction, Novel")
    pub genre: String,
    pub description: Option<String>,
    pub status: BookStatus,
    pub user_id: Option<i32>,
}

/// Reserved or checked-out book joined with the holder's username
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CirculationEntry {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    pub user_id: i32,
    pub username: String,
}

/// Add/edit book form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookForm {
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 200, message = "You must input a title that is between 1-200 characters."))]
    #[serde(default)]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "You must input an author that is between 1-100 characters."))]
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub cover_page_link: String,
    #[validate(length(min = 1, max = 100, message = "You must input one or multiple genres that is between 1-100 characters."))]
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id.to_string()),
            title: book.title.clone(),
            author: book.author.clone(),
            published: book.published.map(|d| d.to_string()).unwrap_or_default(),
            cover_page_link: book.cover_page_link.clone().unwrap_or_default(),
            genre: book.genre.clone(),
            description: book.description.clone().unwrap_or_default(),
        }
    }
}

/// Validated book fields ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub published: Option<NaiveDate>,
    pub cover_page_link: Option<String>,
    pub genre: String,
    pub description: Option<String>,
}

/// Query string of the book listing
#[derive(Debug, Default, Deserialize)]
pub struct BookListQuery {
    pub page: Option<String>,
    pub genre: Option<String>,
}

/// Split a genre filter into search terms. `all` or blank means no filter.
pub fn genre_terms(raw: Option<&str>) -> Vec<String> {
    match raw.map(str::trim) {
        None | Some("") => Vec::new(),
        Some(raw) if raw.eq_ignore_ascii_case("all") => Vec::new(),
        Some(raw) => raw
            .split(',')
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect(),
    }
}

/// Form carrying a book id (reserve, delete, cancel...)
#[derive(Debug, Deserialize)]
pub struct BookIdForm {
    #[serde(default)]
    pub id: String,
}

/// Admin checkout / return form
#[derive(Debug, Deserialize)]
pub struct CirculationForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
}
