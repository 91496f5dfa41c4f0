//! Grouping engine: key-based bucketing with comparer injection.
//!
//! Groups are built on the first pull of a traversal and emitted in the order
//! each key was first seen. Within a group, elements keep source order.

pub mod index;
pub mod lookup;

use std::hash::Hash;
use std::rc::Rc;

use lazyq_core::comparer::{resolve_eq, EqRef};

use crate::seq::{BufferedCursor, Seq};

pub use index::KeyIndex;
pub use lookup::{Grouping, Lookup};

pub(crate) use lookup::build_lookup;

impl<T: 'static> Seq<T> {
    pub fn group_by<K>(&self, key: impl Fn(&T) -> K + 'static) -> Seq<Grouping<K, T>>
    where
        K: Hash + Eq + Clone + 'static,
    {
        self.group_by_select(key, |item| item, None)
    }

    /// `comparer: None` uses default equality.
    pub fn group_by_with<K>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: Option<EqRef<K>>,
    ) -> Seq<Grouping<K, T>>
    where
        K: Hash + Eq + Clone + 'static,
    {
        self.group_by_select(key, |item| item, comparer)
    }

    /// Group projected elements: `element` maps each source element before it
    /// is appended to its bucket.
    pub fn group_by_select<K, E>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        element: impl Fn(T) -> E + 'static,
        comparer: Option<EqRef<K>>,
    ) -> Seq<Grouping<K, E>>
    where
        K: Hash + Eq + Clone + 'static,
        E: 'static,
    {
        self.group_by_select_using(key, element, resolve_eq(comparer))
    }

    /// Group through an explicit comparer. The key type needs no `Hash` or
    /// `Eq` of its own, e.g. `f64` keys with a bitwise comparer.
    pub fn group_by_using<K>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: EqRef<K>,
    ) -> Seq<Grouping<K, T>>
    where
        K: Clone + 'static,
    {
        self.group_by_select_using(key, |item| item, comparer)
    }

    pub fn group_by_select_using<K, E>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        element: impl Fn(T) -> E + 'static,
        comparer: EqRef<K>,
    ) -> Seq<Grouping<K, E>>
    where
        K: Clone + 'static,
        E: 'static,
    {
        let source = self.clone();
        let key: Rc<dyn Fn(&T) -> K> = Rc::new(key);
        let element: Rc<dyn Fn(T) -> E> = Rc::new(element);
        Seq::from_cursor_fn(move || {
            let source = source.clone();
            let key = Rc::clone(&key);
            let element = Rc::clone(&element);
            let comparer = Rc::clone(&comparer);
            Box::new(BufferedCursor::new(move || {
                let mut cursor = source.cursor();
                let lookup = build_lookup(&mut cursor, &*key, &*element, comparer)?;
                Ok(lookup.groups().to_vec())
            }))
        })
    }

    /// Group, then fold each `(key, group)` into a single result.
    pub fn group_by_fold<K, E, R>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        element: impl Fn(T) -> E + 'static,
        result: impl Fn(&K, &Grouping<K, E>) -> R + 'static,
        comparer: Option<EqRef<K>>,
    ) -> Seq<R>
    where
        K: Hash + Eq + Clone + 'static,
        E: 'static,
        R: 'static,
    {
        self.group_by_select(key, element, comparer)
            .select(move |group| result(group.key(), &group))
    }
}
