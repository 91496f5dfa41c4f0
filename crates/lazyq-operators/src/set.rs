//! Set operators over a comparer-keyed hash arena.
//!
//! `except` and `intersect` read the second sequence into a set on the first
//! pull, then stream the first sequence once. Output is always distinct.

use std::hash::Hash;

use lazyq_core::comparer::{resolve_eq, EqRef};
use lazyq_core::error::QueryResult;

use crate::group::KeyIndex;
use crate::metrics::record_buffer;
use crate::seq::{drain_into, Seq};
use crate::source::empty_cursor;
use crate::traits::{BoxCursor, Cursor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetMode {
    /// Yield elements not yet in the set, then add them.
    Insert,
    /// Yield elements that could be removed from the set.
    Remove,
}

pub struct SetCursor<T> {
    source: BoxCursor<T>,
    second: Option<Seq<T>>,
    set: KeyIndex<T>,
    mode: SetMode,
}

impl<T: Clone + 'static> SetCursor<T> {
    fn load_second(&mut self) -> QueryResult<()> {
        let Some(second) = self.second.take() else {
            return Ok(());
        };
        let set = &mut self.set;
        let loaded = drain_into(&mut second.cursor(), |item| {
            set.insert(item);
            Ok(())
        });
        if let Err(e) = loaded {
            self.source = empty_cursor();
            return Err(e);
        }
        record_buffer("set", self.set.len());
        Ok(())
    }
}

impl<T: Clone + 'static> Cursor for SetCursor<T> {
    type Item = T;

    fn pull(&mut self) -> QueryResult<Option<T>> {
        self.load_second()?;
        while let Some(item) = self.source.pull()? {
            let keep = match self.mode {
                SetMode::Insert => self.set.insert(item.clone()),
                SetMode::Remove => self.set.remove(&item),
            };
            if keep {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

impl<T: Clone + 'static> Seq<T> {
    fn set_op(&self, second: Option<&Seq<T>>, mode: SetMode, comparer: EqRef<T>) -> Seq<T> {
        let first = self.clone();
        let second = second.cloned();
        Seq::from_cursor_fn(move || {
            Box::new(SetCursor {
                source: first.cursor(),
                second: second.clone(),
                set: KeyIndex::new(comparer.clone()),
                mode,
            })
        })
    }

    /// Elements of `self` absent from `second`, each yielded once. The
    /// `_using` forms take an explicit comparer and need no `Hash` or `Eq`
    /// on `T`.
    pub fn except_using(&self, second: &Seq<T>, comparer: EqRef<T>) -> Seq<T> {
        self.set_op(Some(second), SetMode::Insert, comparer)
    }

    /// Elements of `self` present in `second`, each yielded once, in `self`
    /// order.
    pub fn intersect_using(&self, second: &Seq<T>, comparer: EqRef<T>) -> Seq<T> {
        self.set_op(Some(second), SetMode::Remove, comparer)
    }

    /// First occurrence of each element. Streams.
    pub fn distinct_using(&self, comparer: EqRef<T>) -> Seq<T> {
        self.set_op(None, SetMode::Insert, comparer)
    }

    pub fn union_using(&self, second: &Seq<T>, comparer: EqRef<T>) -> Seq<T> {
        self.concat(second).distinct_using(comparer)
    }
}

impl<T: Hash + Eq + Clone + 'static> Seq<T> {
    pub fn except(&self, second: &Seq<T>, comparer: Option<EqRef<T>>) -> Seq<T> {
        self.except_using(second, resolve_eq(comparer))
    }

    pub fn intersect(&self, second: &Seq<T>, comparer: Option<EqRef<T>>) -> Seq<T> {
        self.intersect_using(second, resolve_eq(comparer))
    }

    pub fn distinct(&self, comparer: Option<EqRef<T>>) -> Seq<T> {
        self.distinct_using(resolve_eq(comparer))
    }

    pub fn union(&self, second: &Seq<T>, comparer: Option<EqRef<T>>) -> Seq<T> {
        self.union_using(second, resolve_eq(comparer))
    }
}
