//! A dispatcher-returned page of items.
//!
//! A dispatcher yields the items for one cursor position plus the adjacent
//! cursors, and the request adapter renders those into an
//! `OrderedCollectionPage`'s `next`/`prev` links.

/// One page of dispatcher-returned items, with optional adjacent cursors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub prev_cursor: Option<String>,
    pub next_cursor: Option<String>,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, prev_cursor: Option<String>, next_cursor: Option<String>) -> Self {
        Page { prev_cursor, next_cursor, items }
    }
}
