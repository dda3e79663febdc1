//! Administration pages

use maud::{html, Markup};

use super::{layout, Chrome};
use crate::models::{
    book::{BookForm, CirculationEntry},
    User,
};

pub fn dashboard(chrome: &Chrome) -> Markup {
    layout(
        "Administration",
        chrome,
        html! {
            h2 { "Administration" }
            ul class="admin-menu" {
                li { a href="/admin/users" { "Users" } }
                li { a href="/admin/reserved_books" { "Reserved books" } }
                li { a href="/admin/checked_out_books" { "Checked out books" } }
                li { a href="/admin/add/book" { "Add a book" } }
            }
        },
    )
}

pub fn users(chrome: &Chrome, users: &[User]) -> Markup {
    layout(
        "Users",
        chrome,
        html! {
            h2 { "Users" }
            @if users.is_empty() {
                p { "Nobody has signed up yet." }
            } @else {
                table {
                    thead { tr {
                        th { "Name" }
                        th { "Username" }
                        th { "Member since" }
                        th {}
                    } }
                    tbody {
                        @for user in users {
                            tr {
                                td { (user.full_name) }
                                td { a href={ "/profile/" (user.username) } { (user.username) } }
                                td { (user.account_created_on.format("%Y-%m-%d")) }
                                td {
                                    form method="post" action={ "/admin/delete/user/" (user.username) } {
                                        button type="submit" { "Remove" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn circulation_form(action: &str, entry: &CirculationEntry, label: &str) -> Markup {
    html! {
        form method="post" action=(action) {
            input type="hidden" name="id" value=(entry.id);
            input type="hidden" name="username" value=(entry.username);
            button type="submit" { (label) }
        }
    }
}

fn circulation_table(entries: &[CirculationEntry], actions: impl Fn(&CirculationEntry) -> Markup) -> Markup {
    html! {
        table {
            thead { tr {
                th { "Title" }
                th { "Author" }
                th { "Username" }
                th {}
            } }
            tbody {
                @for entry in entries {
                    tr {
                        td { a href={ "/view/" (entry.id) } { (entry.title) } }
                        td { (entry.author) }
                        td { (entry.username) }
                        td { (actions(entry)) }
                    }
                }
            }
        }
    }
}

pub fn reserved_books(chrome: &Chrome, entries: &[CirculationEntry]) -> Markup {
    layout(
        "Reserved books",
        chrome,
        html! {
            h2 { "Reserved books" }
            @if entries.is_empty() {
                p { "No books are reserved." }
            } @else {
                (circulation_table(entries, |entry| html! {
                    (circulation_form("/admin/checkout/book", entry, "Check out"))
                    (circulation_form("/admin/cancel_reservation/book", entry, "Cancel reservation"))
                }))
            }
        },
    )
}

pub fn checked_out_books(chrome: &Chrome, entries: &[CirculationEntry]) -> Markup {
    layout(
        "Checked out books",
        chrome,
        html! {
            h2 { "Checked out books" }
            @if entries.is_empty() {
                p { "No books are checked out." }
            } @else {
                (circulation_table(entries, |entry| {
                    circulation_form("/admin/return/book", entry, "Return")
                }))
            }
        },
    )
}

/// Add form when `form.id` is empty, edit form otherwise
pub fn book_form(chrome: &Chrome, form: &BookForm) -> Markup {
    let editing = form.id.as_deref().is_some_and(|id| !id.is_empty());
    let (title, action) = if editing {
        ("Edit book", "/admin/edit/book")
    } else {
        ("Add a book", "/admin/add/book")
    };

    layout(
        title,
        chrome,
        html! {
            h2 { (title) }
            form method="post" action=(action) {
                @if let Some(id) = form.id.as_deref().filter(|_| editing) {
                    input type="hidden" name="id" value=(id);
                }
                label for="title" { "Title" }
                input id="title" type="text" name="title" value=(form.title);
                label for="author" { "Author" }
                input id="author" type="text" name="author" value=(form.author);
                label for="published" { "Published (YYYY-MM-DD)" }
                input id="published" type="date" name="published" value=(form.published);
                label for="cover_page_link" { "Cover image link" }
                input id="cover_page_link" type="url" name="cover_page_link" value=(form.cover_page_link);
                label for="genre" { "Genres (comma separated)" }
                input id="genre" type="text" name="genre" value=(form.genre);
                label for="description" { "Description" }
                textarea id="description" name="description" { (form.description) }
                button type="submit" { "Save" }
            }
        },
    )
}
