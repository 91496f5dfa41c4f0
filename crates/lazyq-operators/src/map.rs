//! Projection operators: select, select_many, zip.

use std::rc::Rc;

use lazyq_core::error::QueryResult;

use crate::seq::Seq;
use crate::traits::{BoxCursor, Cursor};

type Projector<T, U> = Rc<dyn Fn(T, usize) -> QueryResult<U>>;

pub struct SelectCursor<T, U> {
    inner: BoxCursor<T>,
    project: Projector<T, U>,
    index: usize,
}

impl<T, U> Cursor for SelectCursor<T, U> {
    type Item = U;

    fn pull(&mut self) -> QueryResult<Option<U>> {
        let Some(item) = self.inner.pull()? else {
            return Ok(None);
        };
        let index = self.index;
        self.index += 1;
        (self.project)(item, index).map(Some)
    }

    fn remaining_hint(&self) -> usize {
        self.inner.remaining_hint()
    }
}

pub struct SelectManyCursor<T, U> {
    outer: BoxCursor<T>,
    expand: Rc<dyn Fn(T) -> Seq<U>>,
    current: Option<BoxCursor<U>>,
}

impl<T, U: 'static> Cursor for SelectManyCursor<T, U> {
    type Item = U;

    fn pull(&mut self) -> QueryResult<Option<U>> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                if let Some(item) = inner.pull()? {
                    return Ok(Some(item));
                }
                self.current = None;
            }
            match self.outer.pull()? {
                Some(outer) => self.current = Some((self.expand)(outer).cursor()),
                None => return Ok(None),
            }
        }
    }
}

pub struct ZipCursor<A, B, R> {
    first: BoxCursor<A>,
    second: BoxCursor<B>,
    combine: Rc<dyn Fn(A, B) -> R>,
}

impl<A, B, R> Cursor for ZipCursor<A, B, R> {
    type Item = R;

    fn pull(&mut self) -> QueryResult<Option<R>> {
        let Some(a) = self.first.pull()? else {
            return Ok(None);
        };
        let Some(b) = self.second.pull()? else {
            return Ok(None);
        };
        Ok(Some((self.combine)(a, b)))
    }
}

impl<T: 'static> Seq<T> {
    /// Project each element.
    pub fn select<U: 'static>(&self, project: impl Fn(T) -> U + 'static) -> Seq<U> {
        self.try_select_indexed(move |item, _| Ok(project(item)))
    }

    pub fn select_indexed<U: 'static>(&self, project: impl Fn(T, usize) -> U + 'static) -> Seq<U> {
        self.try_select_indexed(move |item, index| Ok(project(item, index)))
    }

    /// Fallible projection. An `Err` surfaces when the offending element is
    /// pulled, not when the query is built.
    pub fn try_select<U: 'static>(
        &self,
        project: impl Fn(T) -> QueryResult<U> + 'static,
    ) -> Seq<U> {
        self.try_select_indexed(move |item, _| project(item))
    }

    fn try_select_indexed<U: 'static>(
        &self,
        project: impl Fn(T, usize) -> QueryResult<U> + 'static,
    ) -> Seq<U> {
        let source = self.clone();
        let project: Projector<T, U> = Rc::new(project);
        Seq::from_cursor_fn(move || {
            Box::new(SelectCursor {
                inner: source.cursor(),
                project: Rc::clone(&project),
                index: 0,
            })
        })
    }

    /// Project each element to a sequence and flatten the results in order.
    pub fn select_many<U, S>(&self, expand: impl Fn(T) -> S + 'static) -> Seq<U>
    where
        U: 'static,
        S: Into<Seq<U>>,
    {
        let source = self.clone();
        let expand: Rc<dyn Fn(T) -> Seq<U>> = Rc::new(move |item: T| expand(item).into());
        Seq::from_cursor_fn(move || {
            Box::new(SelectManyCursor {
                outer: source.cursor(),
                expand: Rc::clone(&expand),
                current: None,
            })
        })
    }

    /// Pair elements positionally; stops at the shorter sequence.
    pub fn zip<B, R>(&self, other: &Seq<B>, combine: impl Fn(T, B) -> R + 'static) -> Seq<R>
    where
        B: 'static,
        R: 'static,
    {
        let first = self.clone();
        let second = other.clone();
        let combine: Rc<dyn Fn(T, B) -> R> = Rc::new(combine);
        Seq::from_cursor_fn(move || {
            Box::new(ZipCursor {
                first: first.cursor(),
                second: second.cursor(),
                combine: Rc::clone(&combine),
            })
        })
    }
}
