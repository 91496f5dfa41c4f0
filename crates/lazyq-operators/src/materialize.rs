//! Eager materializers: list, dictionary, lookup and positional access.

use std::fmt;
use std::hash::Hash;

use lazyq_core::comparer::{resolve_eq, EqRef};
use lazyq_core::error::{QueryError, QueryResult};
use lazyq_core::nullable::MaybeNull;

use crate::group::{build_lookup, KeyIndex, Lookup};
use crate::metrics::record_buffer;
use crate::seq::{drain_into, out_of_range, position, Seq};

/// Unique-key map in insertion order.
pub struct Dictionary<K, V> {
    index: KeyIndex<K>,
    values: Vec<V>,
}

impl<K, V> Dictionary<K, V> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.find(key).map(|slot| &self.values[slot])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        (0..self.values.len()).map(move |slot| self.index.key(slot))
    }

    pub fn values(&self) -> std::slice::Iter<'_, V> {
        self.values.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.keys().zip(self.values.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Dictionary<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T: 'static> Seq<T> {
    pub fn to_list(&self) -> QueryResult<Vec<T>> {
        let mut cursor = self.cursor();
        let mut items = Vec::with_capacity(cursor.remaining_hint());
        drain_into(&mut cursor, |item| {
            items.push(item);
            Ok(())
        })?;
        Ok(items)
    }

    /// Strict map construction. The first null key or duplicate key aborts.
    pub fn to_dictionary<K, V>(
        &self,
        key: impl Fn(&T) -> K,
        element: impl Fn(T) -> V,
        comparer: Option<EqRef<K>>,
    ) -> QueryResult<Dictionary<K, V>>
    where
        K: Hash + Eq + MaybeNull + 'static,
    {
        self.to_dictionary_using(key, element, resolve_eq(comparer))
    }

    /// `to_dictionary` keyed only through `comparer`.
    pub fn to_dictionary_using<K, V>(
        &self,
        key: impl Fn(&T) -> K,
        element: impl Fn(T) -> V,
        comparer: EqRef<K>,
    ) -> QueryResult<Dictionary<K, V>>
    where
        K: MaybeNull + 'static,
    {
        let mut index = KeyIndex::new(comparer);
        let mut values = Vec::new();
        drain_into(&mut self.cursor(), |item| {
            let k = key(&item);
            if k.is_null() {
                return Err(QueryError::ArgumentNull { param: "key" });
            }
            if !index.insert(k) {
                return Err(QueryError::DuplicateKey { param: "key" });
            }
            values.push(element(item));
            Ok(())
        })?;
        record_buffer("to_dictionary", values.len());
        Ok(Dictionary { index, values })
    }

    /// Eager multi-map. Duplicate and null keys accumulate into their group.
    pub fn to_lookup<K, E>(
        &self,
        key: impl Fn(&T) -> K,
        element: impl Fn(T) -> E,
        comparer: Option<EqRef<K>>,
    ) -> QueryResult<Lookup<K, E>>
    where
        K: Hash + Eq + Clone + 'static,
    {
        self.to_lookup_using(key, element, resolve_eq(comparer))
    }

    pub fn to_lookup_using<K, E>(
        &self,
        key: impl Fn(&T) -> K,
        element: impl Fn(T) -> E,
        comparer: EqRef<K>,
    ) -> QueryResult<Lookup<K, E>>
    where
        K: Clone + 'static,
    {
        build_lookup(&mut self.cursor(), &key, &element, comparer)
    }

    fn element_at_opt(&self, index: isize) -> QueryResult<Option<T>> {
        let Some(pos) = position(index) else {
            return Ok(None);
        };
        if let Some(source) = self.indexed() {
            return Ok(source.get(pos));
        }
        let mut cursor = self.cursor();
        let mut seen = 0usize;
        while let Some(item) = cursor.pull()? {
            if seen == pos {
                return Ok(Some(item));
            }
            seen += 1;
        }
        Ok(None)
    }

    /// Element at a signed position. Negative or past-the-end positions fail
    /// with `OutOfRange`.
    pub fn element_at(&self, index: isize) -> QueryResult<T> {
        self.element_at_opt(index)?
            .ok_or_else(|| out_of_range(index, self.indexed().map(|s| s.len())))
    }
}

impl<T: Default + 'static> Seq<T> {
    pub fn element_at_or_default(&self, index: isize) -> QueryResult<T> {
        Ok(self.element_at_opt(index)?.unwrap_or_default())
    }
}
