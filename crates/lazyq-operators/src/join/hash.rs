//! Hash join cursors.
//!
//! The inner lookup is built only once the outer side produced its first
//! element; an empty outer never enumerates the inner sequence.

use std::rc::Rc;

use lazyq_core::error::QueryResult;

use crate::group::{Grouping, Lookup};
use crate::join::LookupBuild;
use crate::seq::Seq;
use crate::source::empty_cursor;
use crate::traits::{BoxCursor, Cursor};

struct Inner<K, I> {
    build: Option<LookupBuild<K, I>>,
    lookup: Option<Lookup<K, I>>,
}

impl<K, I> Inner<K, I> {
    fn pending(build: LookupBuild<K, I>) -> Self {
        Self {
            build: Some(build),
            lookup: None,
        }
    }

    /// Build on first use. A failed build leaves no lookup; callers end
    /// their outer side so the error is reported once.
    fn ready(&mut self) -> QueryResult<Option<&Lookup<K, I>>> {
        if let Some(build) = self.build.take() {
            self.lookup = Some(build()?);
        }
        Ok(self.lookup.as_ref())
    }
}

pub struct HashJoinCursor<T, I, K, R> {
    outer: BoxCursor<T>,
    inner: Inner<K, I>,
    outer_key: Rc<dyn Fn(&T) -> K>,
    result: Rc<dyn Fn(&T, &I) -> R>,
    current: Option<(T, Grouping<K, I>, usize)>,
}

impl<T, I, K, R> HashJoinCursor<T, I, K, R> {
    pub(crate) fn new(
        outer: BoxCursor<T>,
        build: LookupBuild<K, I>,
        outer_key: Rc<dyn Fn(&T) -> K>,
        result: Rc<dyn Fn(&T, &I) -> R>,
    ) -> Self {
        Self {
            outer,
            inner: Inner::pending(build),
            outer_key,
            result,
            current: None,
        }
    }
}

impl<T: 'static, I, K, R> Cursor for HashJoinCursor<T, I, K, R> {
    type Item = R;

    fn pull(&mut self) -> QueryResult<Option<R>> {
        loop {
            if let Some((outer, group, pos)) = self.current.as_mut() {
                if let Some(inner) = group.elements().get(*pos) {
                    *pos += 1;
                    return Ok(Some((self.result)(outer, inner)));
                }
                self.current = None;
            }
            let Some(outer) = self.outer.pull()? else {
                return Ok(None);
            };
            let key = (self.outer_key)(&outer);
            let lookup = match self.inner.ready() {
                Ok(lookup) => lookup,
                Err(e) => {
                    self.outer = empty_cursor();
                    return Err(e);
                }
            };
            if let Some(group) = lookup.and_then(|lookup| lookup.get(&key)) {
                self.current = Some((outer, group, 0));
            }
        }
    }
}

pub struct GroupJoinCursor<T, I, K, R> {
    outer: BoxCursor<T>,
    inner: Inner<K, I>,
    outer_key: Rc<dyn Fn(&T) -> K>,
    result: Rc<dyn Fn(T, Seq<I>) -> R>,
}

impl<T, I, K, R> GroupJoinCursor<T, I, K, R> {
    pub(crate) fn new(
        outer: BoxCursor<T>,
        build: LookupBuild<K, I>,
        outer_key: Rc<dyn Fn(&T) -> K>,
        result: Rc<dyn Fn(T, Seq<I>) -> R>,
    ) -> Self {
        Self {
            outer,
            inner: Inner::pending(build),
            outer_key,
            result,
        }
    }
}

impl<T: 'static, I: Clone + 'static, K, R> Cursor for GroupJoinCursor<T, I, K, R> {
    type Item = R;

    fn pull(&mut self) -> QueryResult<Option<R>> {
        let Some(outer) = self.outer.pull()? else {
            return Ok(None);
        };
        let key = (self.outer_key)(&outer);
        let matches = match self.inner.ready() {
            Ok(Some(lookup)) => lookup.seq_for(&key),
            Ok(None) => Seq::empty(),
            Err(e) => {
                self.outer = empty_cursor();
                return Err(e);
            }
        };
        Ok(Some((self.result)(outer, matches)))
    }
}
