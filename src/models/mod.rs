//! Data models for the library catalogue

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookStatus, CirculationEntry};
pub use user::{Identity, User, USERNAME_CHARS_MESSAGE};
