//! Cursor protocol + indexed access.
//!
//! A `Seq` hands out cursors; consumers call `pull` until it returns
//! `Ok(None)`. Cursors are owned by exactly one consumer and are never shared.
//! Anything a cursor holds open must be released on exhaustion or on `Drop`.

use lazyq_core::error::QueryResult;

/// Single-pass pull iteration.
///
/// Invariants:
/// - `Ok(Some(x))` hands the next element to the caller.
/// - `Ok(None)` signals the end; later pulls keep returning `Ok(None)`.
/// - `Err(e)` is a failure raised while producing the next element.
pub trait Cursor {
    type Item;

    fn pull(&mut self) -> QueryResult<Option<Self::Item>>;

    /// Lower bound of the remaining elements, if cheaply known.
    fn remaining_hint(&self) -> usize {
        0
    }
}

pub type BoxCursor<T> = Box<dyn Cursor<Item = T>>;

impl<T> Cursor for BoxCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        (**self).pull()
    }

    fn remaining_hint(&self) -> usize {
        (**self).remaining_hint()
    }
}

/// O(1) positional access exposed by buffer-backed sequences.
pub trait IndexedSource<T> {
    fn len(&self) -> usize;
    fn get(&self, index: usize) -> Option<T>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
