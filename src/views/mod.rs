//! Server-rendered pages

pub mod account;
pub mod admin;
pub mod books;

use axum::http::StatusCode;
use maud::{html, Markup, DOCTYPE};

use crate::session::{Flash, RequestContext};

/// What every page shows around its content: who is logged in and the
/// pending messages
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub username: Option<String>,
    pub admin: bool,
    pub flash: Flash,
}

impl Chrome {
    pub fn new(context: &RequestContext, admin_username: &str) -> Self {
        Self {
            username: context.identity.as_ref().map(|i| i.username.clone()),
            admin: context.is_admin(admin_username),
            flash: context.flash.clone(),
        }
    }

    /// Same chrome with an extra message rendered right away
    pub fn with_flash(mut self, inline: Flash) -> Self {
        self.flash.merge(inline);
        self
    }

    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.with_flash(Flash::error(message))
    }
}

fn flash_banner(flash: &Flash) -> Markup {
    html! {
        @if let Some(success) = &flash.success {
            div class="flash success" { (success) }
        }
        @if let Some(error) = &flash.error {
            div class="flash error" { (error) }
        }
        @if let Some(hint) = &flash.hint {
            div class="flash hint" { (hint) }
        }
    }
}

fn navigation(chrome: &Chrome) -> Markup {
    html! {
        nav {
            a href="/books" { "Books" }
            @if let Some(username) = &chrome.username {
                " | "
                a href={ "/profile/" (username) } { "My profile" }
                @if chrome.admin {
                    " | "
                    a href="/admin" { "Admin" }
                }
                " | "
                a href="/logout" { "Log out (" (username) ")" }
            } @else {
                " | "
                a href="/login" { "Log in" }
                " | "
                a href="/signup" { "Sign up" }
            }
        }
    }
}

/// Full page with navigation and flash messages
pub fn layout(title: &str, chrome: &Chrome, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Library Catalogue" }
            }
            body {
                header {
                    h1 { a href="/" { "Library Catalogue" } }
                    (navigation(chrome))
                }
                (flash_banner(&chrome.flash))
                main { (content) }
            }
        }
    }
}

/// Bare page for failures that could not be turned into a redirect
pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let title = status.canonical_reason().unwrap_or("Error");
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) " | Library Catalogue" }
            }
            body {
                h1 { (status.as_u16()) " " (title) }
                p class="flash error" { (message) }
                p { a href="/" { "Back to the catalogue" } }
            }
        }
    }
}
