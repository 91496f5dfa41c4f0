//! Sequence composition: concat, default_if_empty.

use lazyq_core::error::QueryResult;

use crate::seq::Seq;
use crate::traits::{BoxCursor, Cursor};

pub struct ConcatCursor<T> {
    first: Option<BoxCursor<T>>,
    second: Seq<T>,
    current: Option<BoxCursor<T>>,
}

impl<T: 'static> Cursor for ConcatCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        if let Some(first) = self.first.as_mut() {
            if let Some(item) = first.pull()? {
                return Ok(Some(item));
            }
            // Second source opens only after the first is exhausted.
            self.first = None;
            self.current = Some(self.second.cursor());
        }
        match self.current.as_mut() {
            Some(second) => second.pull(),
            None => Ok(None),
        }
    }
}

pub struct DefaultIfEmptyCursor<T> {
    inner: BoxCursor<T>,
    fallback: Option<T>,
    yielded: bool,
}

impl<T> Cursor for DefaultIfEmptyCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        match self.inner.pull()? {
            Some(item) => {
                self.yielded = true;
                Ok(Some(item))
            }
            None if !self.yielded => {
                self.yielded = true;
                Ok(self.fallback.take())
            }
            None => Ok(None),
        }
    }
}

impl<T: 'static> Seq<T> {
    pub fn concat(&self, second: &Seq<T>) -> Seq<T> {
        let first = self.clone();
        let second = second.clone();
        Seq::from_cursor_fn(move || {
            Box::new(ConcatCursor {
                first: Some(first.cursor()),
                second: second.clone(),
                current: None,
            })
        })
    }
}

impl<T: Clone + 'static> Seq<T> {
    /// Yield `fallback` once when the source is empty.
    pub fn default_if_empty(&self, fallback: T) -> Seq<T> {
        let source = self.clone();
        Seq::from_cursor_fn(move || {
            Box::new(DefaultIfEmptyCursor {
                inner: source.cursor(),
                fallback: Some(fallback.clone()),
                yielded: false,
            })
        })
    }
}
