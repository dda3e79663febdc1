use maud::{html, Markup};

use super::{layout, Chrome};
use crate::{
    models::book::{Book, BookStatus},
    services::catalog::BookPage,
};

/// Button that loads another page of the listing with the same filter.
/// A GET form lets the browser encode the genre filter.
fn page_button(page: i64, genre: &str, label: &str, current: bool) -> Markup {
    html! {
        form class="page-link" method="get" action="/books" {
            input type="hidden" name="page" value=(page);
            input type="hidden" name="genre" value=(genre);
            @if current {
                button type="submit" class="current" disabled { (label) }
            } @else {
                button type="submit" { (label) }
            }
        }
    }
}

fn pager(page: &BookPage, genre: &str) -> Markup {
    let pagination = &page.pagination;
    html! {
        div class="pagination" {
            @match pagination.previous_page() {
                Some(previous) => { (page_button(previous, genre, "< Prev", false)) }
                None => { p class="disabled_link" { "< Prev" } }
            }
            @for number in pagination.nav_pages() {
                (page_button(number, genre, &number.to_string(), number == pagination.current_page()))
            }
            @match pagination.next_page() {
                Some(next) => { (page_button(next, genre, "Next >", false)) }
                None => { p class="disabled_link" { "Next >" } }
            }
        }
    }
}

/// Paginated book listing
pub fn list(chrome: &Chrome, page: &BookPage, genre: &str) -> Markup {
    let pagination = &page.pagination;
    layout(
        "Books",
        chrome,
        html! {
            form class="genre-filter" method="get" action="/books" {
                input type="hidden" name="page" value="1";
                label for="genre" { "Genres" }
                input id="genre" type="text" name="genre" value=(genre) placeholder="all";
                button type="submit" { "Filter" }
            }
            p class="range" {
                "Showing " (pagination.range_label()) " of " (pagination.total_items())
            }
            @if page.books.is_empty() {
                p { "There are no books to show." }
            } @else {
                ul class="books" {
                    @for book in &page.books {
                        li {
                            a href={ "/view/" (book.id) } { (book.title) }
                            " by " (book.author)
                            span class={ "status " (book.status) } { " (" (book.status) ")" }
                        }
                    }
                }
            }
            (pager(page, genre))
        },
    )
}

/// Single book page
pub fn detail(chrome: &Chrome, book: &Book, viewer_id: Option<i32>) -> Markup {
    let reserved_by_viewer =
        book.status == BookStatus::Reserved && viewer_id.is_some() && book.user_id == viewer_id;

    layout(
        &book.title,
        chrome,
        html! {
            article class="book" {
                @if let Some(cover) = &book.cover_page_link {
                    img class="cover" src=(cover) alt={ "Cover of " (book.title) };
                }
                h2 { (book.title) }
                p class="author" { (book.author) }
                @if let Some(published) = book.published {
                    p class="published" { "Published " (published.format("%B %-d, %Y")) }
                }
                p class="genre" { (book.genre) }
                @if let Some(description) = &book.description {
                    p class="description" { (description) }
                }
                p class="status" { (book.status.describe()) }

                @if book.status == BookStatus::Available {
                    form method="post" action="/reserve" {
                        input type="hidden" name="id" value=(book.id);
                        button type="submit" { "Reserve" }
                    }
                }
                @if reserved_by_viewer {
                    form method="post" action="/cancel_reservation/book" {
                        input type="hidden" name="id" value=(book.id);
                        button type="submit" { "Cancel my reservation" }
                    }
                }
                @if chrome.admin {
                    div class="admin-actions" {
                        a href={ "/admin/edit/book/" (book.id) } { "Edit" }
                        form method="post" action="/admin/delete/book" {
                            input type="hidden" name="id" value=(book.id);
                            button type="submit" { "Delete" }
                        }
                    }
                }
            }
        },
    )
}
