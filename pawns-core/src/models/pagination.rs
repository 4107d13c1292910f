//! Pagination state derived from a rendered page list.

use serde::{Deserialize, Serialize};

/// Page bounds and neighbors derived from a dashboard page-number list.
///
/// All fields absent means the page carried no paginated content at all
/// (single-page state). That is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page before the active one, if any.
    pub previous: Option<u32>,
    /// First page number.
    pub first: Option<u32>,
    /// Currently active page number.
    pub active: Option<u32>,
    /// Page after the active one, if any.
    pub next: Option<u32>,
    /// Last page number.
    pub last: Option<u32>,
}

impl Pagination {
    /// The single-page state: no page list was present.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Derives neighbors from the numbers read off the page list.
    ///
    /// `previous` is `active - 1` unless the active page is the first;
    /// `next` is `active + 1` unless the active page is the last.
    pub fn derive(active: u32, first: u32, last: u32) -> Self {
        let previous = (active > first).then(|| active - 1);
        let next = (active < last).then(|| active + 1);
        Self {
            previous,
            first: Some(first),
            active: Some(active),
            next,
            last: Some(last),
        }
    }

    /// Returns true if no paginated content exists.
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.last.is_none()
    }
}
