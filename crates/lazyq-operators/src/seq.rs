//! `Seq<T>`: the sequence capability every operator consumes and produces.
//!
//! A `Seq` is only a cursor factory. Cloning it is cheap and shares the
//! factory; calling `cursor()` starts a fresh, independent traversal. Operators
//! return new `Seq`s immediately and touch no element until a cursor is pulled.

use std::fmt;
use std::rc::Rc;

use lazyq_core::error::{QueryError, QueryResult};

use crate::traits::{BoxCursor, Cursor, IndexedSource};

pub struct Seq<T> {
    open: Rc<dyn Fn() -> BoxCursor<T>>,
    indexed: Option<Rc<dyn IndexedSource<T>>>,
}

impl<T> Clone for Seq<T> {
    fn clone(&self) -> Self {
        Self {
            open: Rc::clone(&self.open),
            indexed: self.indexed.clone(),
        }
    }
}

impl<T> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seq")
            .field("indexed_len", &self.indexed.as_ref().map(|i| i.len()))
            .finish()
    }
}

impl<T: 'static> Seq<T> {
    /// Build a sequence from a cursor factory. The factory runs once per
    /// traversal.
    pub fn from_cursor_fn(open: impl Fn() -> BoxCursor<T> + 'static) -> Self {
        Self {
            open: Rc::new(open),
            indexed: None,
        }
    }

    pub(crate) fn with_index(mut self, index: Rc<dyn IndexedSource<T>>) -> Self {
        self.indexed = Some(index);
        self
    }

    /// Start a new traversal.
    pub fn cursor(&self) -> BoxCursor<T> {
        (self.open)()
    }

    /// Direct positional access, when the backing store offers it.
    pub fn indexed(&self) -> Option<&dyn IndexedSource<T>> {
        self.indexed.as_deref()
    }

    /// Adapt a fresh traversal to `std::iter::Iterator`.
    pub fn iter(&self) -> SeqIter<T> {
        SeqIter {
            cursor: Some(self.cursor()),
        }
    }
}

/// `Iterator` view over one traversal. Yields the first error and then stops.
pub struct SeqIter<T> {
    cursor: Option<BoxCursor<T>>,
}

impl<T> Iterator for SeqIter<T> {
    type Item = QueryResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        match cursor.pull() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.cursor = None;
                None
            }
            Err(e) => {
                self.cursor = None;
                Some(Err(e))
            }
        }
    }
}

impl<T: 'static> IntoIterator for &Seq<T> {
    type Item = QueryResult<T>;
    type IntoIter = SeqIter<T>;

    fn into_iter(self) -> SeqIter<T> {
        self.iter()
    }
}

/// Pull until exhaustion, handing each element to `f`.
pub(crate) fn drain_into<T>(
    cursor: &mut dyn Cursor<Item = T>,
    mut f: impl FnMut(T) -> QueryResult<()>,
) -> QueryResult<()> {
    while let Some(item) = cursor.pull()? {
        f(item)?;
    }
    Ok(())
}

/// Convert a signed index into a position, or `None` when negative.
pub(crate) fn position(index: isize) -> Option<usize> {
    usize::try_from(index).ok()
}

pub(crate) fn out_of_range(index: isize, len: Option<usize>) -> QueryError {
    QueryError::OutOfRange { index, len }
}

type BuildFn<T> = Box<dyn FnOnce() -> QueryResult<Vec<T>>>;

/// Cursor for operators that must see the whole source before yielding:
/// `build` runs on the first pull, never at construction.
pub struct BufferedCursor<T> {
    build: Option<BuildFn<T>>,
    items: std::vec::IntoIter<T>,
}

impl<T> BufferedCursor<T> {
    pub fn new(build: impl FnOnce() -> QueryResult<Vec<T>> + 'static) -> Self {
        Self {
            build: Some(Box::new(build)),
            items: Vec::new().into_iter(),
        }
    }
}

impl<T> Cursor for BufferedCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        if let Some(build) = self.build.take() {
            self.items = build()?.into_iter();
        }
        Ok(self.items.next())
    }

    fn remaining_hint(&self) -> usize {
        self.items.len()
    }
}
