//! Form validation with a fixed reporting order.
//!
//! `validator` collects every failing rule into a map, so the order in which
//! problems are reported is decided here: the first rule of the list that
//! failed wins.

use chrono::NaiveDate;
use validator::{Validate, ValidationErrors};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookDraft, BookForm},
        user::{LoginForm, ProfileForm, SignupForm, USERNAME_CHARS, USERNAME_CHARS_MESSAGE},
    },
};

/// `(field, rule code)` pairs in reporting order
type RuleOrder = &'static [(&'static str, &'static str)];

const LOGIN_RULES: RuleOrder = &[("username", "length"), ("password", "length")];

// The space rule comes first so it is reported whatever else is wrong
const SIGNUP_RULES: RuleOrder = &[
    ("username", "regex"),
    ("full_name", "length"),
    ("username", "length"),
    ("password", "length"),
];

const PROFILE_RULES: RuleOrder = &[
    ("new_username", "regex"),
    ("full_name", "length"),
    ("new_username", "length"),
];

const BOOK_RULES: RuleOrder = &[("title", "length"), ("author", "length"), ("genre", "length")];

/// Message of the first failing rule in `order`
fn first_failure(errors: &ValidationErrors, order: RuleOrder) -> Option<String> {
    let fields = errors.field_errors();
    order.iter().find_map(|(field, code)| {
        fields
            .iter()
            .find(|(name, _)| {
                let name: &str = name.as_ref();
                name == *field
            })
            .and_then(|(_, failures)| failures.iter().find(|failure| failure.code == *code))
            .and_then(|failure| failure.message.as_ref().map(|m| m.to_string()))
    })
}

fn check(form: &impl Validate, order: RuleOrder) -> AppResult<()> {
    match form.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let message = first_failure(&errors, order)
                .unwrap_or_else(|| "Please check the form and try again.".to_string());
            Err(AppError::Validation(message))
        }
    }
}

pub fn validate_login(form: &LoginForm) -> AppResult<()> {
    check(form, LOGIN_RULES)
}

/// Expects the lower-cased username
fn check_username_chars(username: &str) -> AppResult<()> {
    if USERNAME_CHARS.is_match(username) {
        Ok(())
    } else {
        Err(AppError::Validation(USERNAME_CHARS_MESSAGE.to_string()))
    }
}

pub fn validate_signup(form: &SignupForm) -> AppResult<()> {
    check(form, SIGNUP_RULES)?;
    check_username_chars(&form.username)
}

pub fn validate_profile(form: &ProfileForm) -> AppResult<()> {
    check(form, PROFILE_RULES)?;
    check_username_chars(&form.new_username)
}

/// Validate a book form and turn it into the fields to store.
/// Blank optional fields become `None`.
pub fn validate_book(form: &BookForm) -> AppResult<BookDraft> {
    check(form, BOOK_RULES)?;

    let published = match form.published.trim() {
        "" => None,
        raw => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::Validation("The published date must be written as YYYY-MM-DD.".to_string())
        })?),
    };

    Ok(BookDraft {
        title: form.title.clone(),
        author: form.author.clone(),
        published,
        cover_page_link: non_blank(&form.cover_page_link),
        genre: form.genre.clone(),
        description: non_blank(&form.description),
    })
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
