//! Login, signup and profile pages

use maud::{html, Markup};

use super::{layout, Chrome};
use crate::{
    models::{
        book::Book,
        user::{ProfileForm, SignupForm},
    },
    services::users::Profile,
};

pub fn login(chrome: &Chrome, username: &str) -> Markup {
    layout(
        "Log in",
        chrome,
        html! {
            h2 { "Log in" }
            form method="post" action="/login" {
                label for="username" { "Username" }
                input id="username" type="text" name="username" value=(username);
                label for="password" { "Password" }
                input id="password" type="password" name="password";
                button type="submit" { "Log in" }
            }
            p { "No account yet? " a href="/signup" { "Sign up" } }
        },
    )
}

pub fn signup(chrome: &Chrome, form: &SignupForm) -> Markup {
    layout(
        "Sign up",
        chrome,
        html! {
            h2 { "Sign up" }
            form method="post" action="/signup" {
                label for="full_name" { "Full name" }
                input id="full_name" type="text" name="full_name" value=(form.full_name);
                label for="username" { "Username" }
                input id="username" type="text" name="username" value=(form.username);
                label for="password" { "Password" }
                input id="password" type="password" name="password";
                button type="submit" { "Sign up" }
            }
        },
    )
}

fn held_books(books: &[Book], empty: &str) -> Markup {
    html! {
        @if books.is_empty() {
            p { (empty) }
        } @else {
            ul {
                @for book in books {
                    li { a href={ "/view/" (book.id) } { (book.title) " --- " (book.author) } }
                }
            }
        }
    }
}

pub fn profile(chrome: &Chrome, profile: &Profile) -> Markup {
    let user = &profile.user;
    layout(
        &user.full_name,
        chrome,
        html! {
            h2 { (user.full_name) }
            p class="username" { (user.username) }
            p class="member-since" {
                "Member since " (user.account_created_on.format("%B %-d, %Y"))
            }
            a href={ "/profile/" (user.username) "/edit" } { "Edit profile" }

            h3 { "Books currently reserved:" }
            (held_books(&profile.reserved, "You have no books placed on reservation."))

            h3 { "Books currently checked out:" }
            (held_books(&profile.checked_out, "You have no books checked out."))
        },
    )
}

pub fn edit_profile(chrome: &Chrome, username: &str, form: &ProfileForm) -> Markup {
    layout(
        "Edit profile",
        chrome,
        html! {
            h2 { "Edit profile" }
            form method="post" action={ "/profile/" (username) "/edit" } {
                label for="full_name" { "Full name" }
                input id="full_name" type="text" name="full_name" value=(form.full_name);
                label for="new_username" { "Username" }
                input id="new_username" type="text" name="new_username" value=(form.new_username);
                button type="submit" { "Save" }
            }
        },
    )
}
