//! User model and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Usernames are single words
pub(crate) static NO_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^ ]*$").expect("valid regex"));

/// Usernames end up in URL paths (`/profile/:username`), so they are kept
/// to characters that never need escaping there
pub(crate) static USERNAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_.-]*$").expect("valid regex"));

pub const USERNAME_CHARS_MESSAGE: &str =
    "Your username can only contain letters, numbers, dots, dashes and underscores.";

/// Full user row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub full_name: String,
    pub account_created_on: DateTime<Utc>,
}

/// Authenticated identity carried by the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i32,
    pub username: String,
    pub full_name: String,
    pub account_created_on: DateTime<Utc>,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            account_created_on: user.account_created_on,
        }
    }
}

/// Login form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "You must enter a username."))]
    #[serde(default)]
    pub username: String,
    #[validate(length(min = 1, message = "You must enter a password."))]
    #[serde(default)]
    pub password: String,
}

/// Signup form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, message = "You must enter your name."))]
    #[serde(default)]
    pub full_name: String,
    #[validate(
        length(min = 1, message = "You must enter a username."),
        regex(path = *NO_SPACES, message = "Your username cannot contain spaces.")
    )]
    #[serde(default)]
    pub username: String,
    #[validate(length(min = 1, message = "You must enter a password."))]
    #[serde(default)]
    pub password: String,
}

/// Profile edit form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, message = "You must enter your name."))]
    #[serde(default)]
    pub full_name: String,
    #[validate(
        length(min = 1, message = "You must enter a username."),
        regex(path = *NO_SPACES, message = "Your username cannot contain spaces.")
    )]
    #[serde(default)]
    pub new_username: String,
}

/// Usernames are stored and compared lower-cased
pub fn normalize_username(username: &str) -> String {
    username.to_lowercase()
}
