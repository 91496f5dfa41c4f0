//! Filtering and slicing operators: filter, skip, take and their `_while`
//! forms. All stream; none buffer.

use std::rc::Rc;

use lazyq_core::error::QueryResult;

use crate::seq::Seq;
use crate::traits::{BoxCursor, Cursor};

type Predicate<T> = Rc<dyn Fn(&T, usize) -> bool>;

pub struct FilterCursor<T> {
    inner: BoxCursor<T>,
    predicate: Predicate<T>,
    index: usize,
}

impl<T> Cursor for FilterCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        while let Some(item) = self.inner.pull()? {
            let index = self.index;
            self.index += 1;
            if (self.predicate)(&item, index) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

pub struct SkipCursor<T> {
    inner: BoxCursor<T>,
    to_skip: usize,
}

impl<T> Cursor for SkipCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        while self.to_skip > 0 {
            self.to_skip -= 1;
            if self.inner.pull()?.is_none() {
                self.to_skip = 0;
                return Ok(None);
            }
        }
        self.inner.pull()
    }

    fn remaining_hint(&self) -> usize {
        self.inner.remaining_hint().saturating_sub(self.to_skip)
    }
}

pub struct TakeCursor<T> {
    inner: BoxCursor<T>,
    left: usize,
}

impl<T> Cursor for TakeCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        // Never pull past the last wanted element.
        if self.left == 0 {
            return Ok(None);
        }
        match self.inner.pull()? {
            Some(item) => {
                self.left -= 1;
                Ok(Some(item))
            }
            None => {
                self.left = 0;
                Ok(None)
            }
        }
    }

    fn remaining_hint(&self) -> usize {
        self.inner.remaining_hint().min(self.left)
    }
}

pub struct SkipWhileCursor<T> {
    inner: BoxCursor<T>,
    predicate: Predicate<T>,
    index: usize,
    skipping: bool,
}

impl<T> Cursor for SkipWhileCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        if !self.skipping {
            return self.inner.pull();
        }
        while let Some(item) = self.inner.pull()? {
            let index = self.index;
            self.index += 1;
            if !(self.predicate)(&item, index) {
                self.skipping = false;
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

pub struct TakeWhileCursor<T> {
    inner: BoxCursor<T>,
    predicate: Predicate<T>,
    index: usize,
    done: bool,
}

impl<T> Cursor for TakeWhileCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        if self.done {
            return Ok(None);
        }
        match self.inner.pull()? {
            Some(item) if (self.predicate)(&item, self.index) => {
                self.index += 1;
                Ok(Some(item))
            }
            _ => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

impl<T: 'static> Seq<T> {
    /// Keep elements satisfying `predicate`.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Seq<T> {
        self.filter_indexed(move |item, _| predicate(item))
    }

    /// Like `filter`, with the zero-based source position passed along.
    pub fn filter_indexed(&self, predicate: impl Fn(&T, usize) -> bool + 'static) -> Seq<T> {
        let source = self.clone();
        let predicate: Predicate<T> = Rc::new(predicate);
        Seq::from_cursor_fn(move || {
            Box::new(FilterCursor {
                inner: source.cursor(),
                predicate: Rc::clone(&predicate),
                index: 0,
            })
        })
    }

    pub fn skip(&self, count: usize) -> Seq<T> {
        let source = self.clone();
        Seq::from_cursor_fn(move || {
            Box::new(SkipCursor {
                inner: source.cursor(),
                to_skip: count,
            })
        })
    }

    pub fn take(&self, count: usize) -> Seq<T> {
        let source = self.clone();
        Seq::from_cursor_fn(move || {
            Box::new(TakeCursor {
                inner: source.cursor(),
                left: count,
            })
        })
    }

    pub fn skip_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Seq<T> {
        let source = self.clone();
        let predicate: Predicate<T> = Rc::new(move |item: &T, _: usize| predicate(item));
        Seq::from_cursor_fn(move || {
            Box::new(SkipWhileCursor {
                inner: source.cursor(),
                predicate: Rc::clone(&predicate),
                index: 0,
                skipping: true,
            })
        })
    }

    pub fn take_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Seq<T> {
        let source = self.clone();
        let predicate: Predicate<T> = Rc::new(move |item: &T, _: usize| predicate(item));
        Seq::from_cursor_fn(move || {
            Box::new(TakeWhileCursor {
                inner: source.cursor(),
                predicate: Rc::clone(&predicate),
                index: 0,
                done: false,
            })
        })
    }
}
