//! Page-range arithmetic for the book listing.
//!
//! A [`Pagination`] is built from the page size, the total number of matching
//! books and the page the visitor asked for. The requested page may be out of
//! range: callers must run [`Pagination::check`] before using [`Pagination::offset`]
//! to query a slice.

use std::fmt;

/// Number of page links shown around the current page
const NAV_WINDOW: i64 = 3;

/// Shown when the `page` parameter is not a number
pub const NOT_A_PAGE_NUMBER: &str =
    "Whoops! Something went wrong. You cannot view that page. You must use a number for the page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    items_per_page: i64,
    total_items: i64,
    current_page: i64,
}

/// Why a requested page cannot be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    BelowFirst,
    BeyondLast { max_pages: i64 },
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::BelowFirst => write!(
                f,
                "Whoops! Something went wrong. You must view a page number greater than 0."
            ),
            PageError::BeyondLast { max_pages } => write!(
                f,
                "Whoops! Something went wrong. We don't have enough books to be able to display \
                 that many pages! You must view a page number no greater than {}.",
                max_pages
            ),
        }
    }
}

impl Pagination {
    /// `items_per_page` must be positive; it is clamped to 1 otherwise.
    pub fn new(items_per_page: i64, total_items: i64, current_page: i64) -> Self {
        Self {
            items_per_page: items_per_page.max(1),
            total_items: total_items.max(0),
            current_page,
        }
    }

    pub fn items_per_page(&self) -> i64 {
        self.items_per_page
    }

    pub fn total_items(&self) -> i64 {
        self.total_items
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    /// Number of pages; an empty catalogue still has one (empty) page.
    pub fn max_pages(&self) -> i64 {
        let pages = (self.total_items + self.items_per_page - 1) / self.items_per_page;
        pages.max(1)
    }

    /// Rows to skip to reach the current page
    pub fn offset(&self) -> i64 {
        (self.current_page - 1).saturating_mul(self.items_per_page)
    }

    /// Inclusive bounds of the items shown on the current page.
    /// `(0, 0)` when there is nothing to show.
    pub fn range(&self) -> (i64, i64) {
        let start = self.offset().saturating_add(1);
        let end = self
            .current_page
            .saturating_mul(self.items_per_page)
            .min(self.total_items);
        if end < start {
            (0, 0)
        } else {
            (start, end)
        }
    }

    pub fn range_label(&self) -> String {
        let (start, end) = self.range();
        format!("{}-{}", start, end)
    }

    pub fn reached_lower_limit(&self, page: i64) -> bool {
        page <= 0
    }

    pub fn reached_upper_limit(&self, page: i64) -> bool {
        page > self.max_pages()
    }

    /// Bounds check for the requested page
    pub fn check(&self) -> Result<(), PageError> {
        if self.reached_lower_limit(self.current_page) {
            Err(PageError::BelowFirst)
        } else if self.reached_upper_limit(self.current_page) {
            Err(PageError::BeyondLast {
                max_pages: self.max_pages(),
            })
        } else {
            Ok(())
        }
    }

    pub fn previous_page(&self) -> Option<i64> {
        let page = self.current_page - 1;
        (!self.reached_lower_limit(page)).then_some(page)
    }

    pub fn next_page(&self) -> Option<i64> {
        let page = self.current_page + 1;
        (!self.reached_upper_limit(page)).then_some(page)
    }

    /// Page numbers to link to, in order.
    ///
    /// With one or two pages every page is listed. Otherwise a three-wide
    /// window follows the current page and stops at either end.
    pub fn nav_pages(&self) -> Vec<i64> {
        let max_pages = self.max_pages();
        if max_pages < NAV_WINDOW {
            return (1..=max_pages).collect();
        }
        let first = (self.current_page - 1).clamp(1, max_pages - NAV_WINDOW + 1);
        (first..first + NAV_WINDOW).collect()
    }
}

/// Parse the `page` query parameter.
///
/// A missing value means the first page. Anything that is not the canonical
/// decimal form of an integer (`"007"`, `"+2"`, `"two"`) is rejected.
pub fn parse_page(raw: Option<&str>) -> Option<i64> {
    let Some(raw) = raw else {
        return Some(1);
    };
    let page = raw.parse::<i64>().ok()?;
    (page.to_string() == raw).then_some(page)
}
