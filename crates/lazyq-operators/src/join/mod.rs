//! Equality joins over a lookup built from the inner sequence.
//!
//! Precondition: none on ordering. The inner side is bucketed through the
//! grouping engine on demand; the outer side streams.

pub mod hash;

pub use hash::{GroupJoinCursor, HashJoinCursor};

use std::hash::Hash;
use std::rc::Rc;

use lazyq_core::comparer::{resolve_eq, EqRef};
use lazyq_core::error::QueryResult;

use crate::group::{build_lookup, Lookup};
use crate::seq::Seq;

pub(crate) type LookupBuild<K, I> = Box<dyn FnOnce() -> QueryResult<Lookup<K, I>>>;

/// Deferred lookup construction over `inner`, keyed by `inner_key`.
pub(crate) fn lookup_builder<I, K>(
    inner: &Seq<I>,
    inner_key: &Rc<dyn Fn(&I) -> K>,
    comparer: &EqRef<K>,
) -> LookupBuild<K, I>
where
    I: 'static,
    K: Clone + 'static,
{
    let inner = inner.clone();
    let inner_key = Rc::clone(inner_key);
    let comparer = Rc::clone(comparer);
    Box::new(move || {
        let mut cursor = inner.cursor();
        build_lookup(&mut cursor, &*inner_key, &|item: I| item, comparer)
    })
}

impl<T: 'static> Seq<T> {
    /// Inner equality join. For each outer element, in outer order, emits
    /// `result(outer, inner)` for every inner element whose key matches, in
    /// inner order. Outer elements without a match contribute nothing.
    pub fn join<I, K, R>(
        &self,
        inner: &Seq<I>,
        outer_key: impl Fn(&T) -> K + 'static,
        inner_key: impl Fn(&I) -> K + 'static,
        result: impl Fn(&T, &I) -> R + 'static,
        comparer: Option<EqRef<K>>,
    ) -> Seq<R>
    where
        I: 'static,
        K: Hash + Eq + Clone + 'static,
        R: 'static,
    {
        self.join_using(inner, outer_key, inner_key, result, resolve_eq(comparer))
    }

    /// `join` matched only through `comparer`; `K` needs no `Hash` or `Eq`.
    pub fn join_using<I, K, R>(
        &self,
        inner: &Seq<I>,
        outer_key: impl Fn(&T) -> K + 'static,
        inner_key: impl Fn(&I) -> K + 'static,
        result: impl Fn(&T, &I) -> R + 'static,
        comparer: EqRef<K>,
    ) -> Seq<R>
    where
        I: 'static,
        K: Clone + 'static,
        R: 'static,
    {
        let outer = self.clone();
        let inner = inner.clone();
        let outer_key: Rc<dyn Fn(&T) -> K> = Rc::new(outer_key);
        let inner_key: Rc<dyn Fn(&I) -> K> = Rc::new(inner_key);
        let result: Rc<dyn Fn(&T, &I) -> R> = Rc::new(result);
        Seq::from_cursor_fn(move || {
            Box::new(HashJoinCursor::new(
                outer.cursor(),
                lookup_builder(&inner, &inner_key, &comparer),
                Rc::clone(&outer_key),
                Rc::clone(&result),
            ))
        })
    }

    /// Correlate each outer element with the (possibly empty) sequence of
    /// matching inner elements. Every outer element yields exactly one result.
    pub fn group_join<I, K, R>(
        &self,
        inner: &Seq<I>,
        outer_key: impl Fn(&T) -> K + 'static,
        inner_key: impl Fn(&I) -> K + 'static,
        result: impl Fn(T, Seq<I>) -> R + 'static,
        comparer: Option<EqRef<K>>,
    ) -> Seq<R>
    where
        I: Clone + 'static,
        K: Hash + Eq + Clone + 'static,
        R: 'static,
    {
        self.group_join_using(inner, outer_key, inner_key, result, resolve_eq(comparer))
    }

    pub fn group_join_using<I, K, R>(
        &self,
        inner: &Seq<I>,
        outer_key: impl Fn(&T) -> K + 'static,
        inner_key: impl Fn(&I) -> K + 'static,
        result: impl Fn(T, Seq<I>) -> R + 'static,
        comparer: EqRef<K>,
    ) -> Seq<R>
    where
        I: Clone + 'static,
        K: Clone + 'static,
        R: 'static,
    {
        let outer = self.clone();
        let inner = inner.clone();
        let outer_key: Rc<dyn Fn(&T) -> K> = Rc::new(outer_key);
        let inner_key: Rc<dyn Fn(&I) -> K> = Rc::new(inner_key);
        let result: Rc<dyn Fn(T, Seq<I>) -> R> = Rc::new(result);
        Seq::from_cursor_fn(move || {
            Box::new(GroupJoinCursor::new(
                outer.cursor(),
                lookup_builder(&inner, &inner_key, &comparer),
                Rc::clone(&outer_key),
                Rc::clone(&result),
            ))
        })
    }
}
