//! `Grouping` and `Lookup`: the immutable results of bucketing a sequence.

use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use lazyq_core::comparer::EqRef;
use lazyq_core::error::QueryResult;

use crate::group::index::KeyIndex;
use crate::metrics::record_buffer;
use crate::seq::{drain_into, Seq};
use crate::source::{Buffer, BufferCursor};
use crate::traits::Cursor;

struct GroupData<K, E> {
    key: K,
    elements: Rc<Vec<E>>,
}

/// A key plus the elements that shared it, in source order.
pub struct Grouping<K, E> {
    data: Rc<GroupData<K, E>>,
}

impl<K, E> Clone for Grouping<K, E> {
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
        }
    }
}

impl<K: fmt::Debug, E: fmt::Debug> fmt::Debug for Grouping<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grouping")
            .field("key", &self.data.key)
            .field("elements", &self.data.elements)
            .finish()
    }
}

impl<K, E> Grouping<K, E> {
    pub fn key(&self) -> &K {
        &self.data.key
    }

    pub fn elements(&self) -> &[E] {
        &self.data.elements
    }

    pub fn len(&self) -> usize {
        self.data.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.data.elements.iter()
    }

    /// Whether both handles refer to the same group instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.data, &b.data)
    }
}

impl<K, E: Clone + 'static> Grouping<K, E> {
    /// The group's elements as an indexed, re-iterable sequence.
    pub fn elements_seq(&self) -> Seq<E> {
        let items = Rc::clone(&self.data.elements);
        let index = Rc::new(Buffer {
            items: Rc::clone(&items),
        });
        Seq::from_cursor_fn(move || Box::new(BufferCursor::new(Rc::clone(&items)))).with_index(index)
    }
}

struct LookupData<K, E> {
    index: KeyIndex<K>,
    groups: Vec<Grouping<K, E>>,
}

/// Eagerly built, immutable multi-map from key to group.
///
/// Groups sit in first-occurrence order. `get` hands back the same
/// `Grouping` instance for every query of an equal key; indexing with an
/// absent key gives an empty slice.
pub struct Lookup<K, E> {
    data: Rc<LookupData<K, E>>,
}

impl<K, E> Clone for Lookup<K, E> {
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
        }
    }
}

impl<K, E> Lookup<K, E> {
    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.groups.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.data.index.contains(key)
    }

    pub fn get(&self, key: &K) -> Option<Grouping<K, E>> {
        self.data
            .index
            .find(key)
            .map(|slot| self.data.groups[slot].clone())
    }

    pub fn groups(&self) -> &[Grouping<K, E>] {
        &self.data.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Grouping<K, E>> {
        self.data.groups.iter()
    }
}

impl<K: 'static, E: 'static> Lookup<K, E> {
    /// Groups as a re-iterable sequence.
    pub fn to_seq(&self) -> Seq<Grouping<K, E>> {
        let lookup = self.clone();
        Seq::from_cursor_fn(move || {
            Box::new(LookupCursor {
                lookup: lookup.clone(),
                pos: 0,
            })
        })
    }

    /// Fold every group into one value, in group order.
    pub fn apply_result<R: 'static>(
        &self,
        result: impl Fn(&K, &Grouping<K, E>) -> R + 'static,
    ) -> Seq<R> {
        self.to_seq().select(move |g| result(g.key(), &g))
    }
}

impl<K, E: Clone + 'static> Lookup<K, E> {
    /// Elements for `key`; empty when the key is absent.
    pub fn seq_for(&self, key: &K) -> Seq<E> {
        match self.get(key) {
            Some(group) => group.elements_seq(),
            None => Seq::empty(),
        }
    }
}

impl<K, E> Index<&K> for Lookup<K, E> {
    type Output = [E];

    fn index(&self, key: &K) -> &[E] {
        match self.data.index.find(key) {
            Some(slot) => self.data.groups[slot].elements(),
            None => &[],
        }
    }
}

struct LookupCursor<K, E> {
    lookup: Lookup<K, E>,
    pos: usize,
}

impl<K, E> Cursor for LookupCursor<K, E> {
    type Item = Grouping<K, E>;

    fn pull(&mut self) -> QueryResult<Option<Grouping<K, E>>> {
        let group = self.lookup.data.groups.get(self.pos).cloned();
        if group.is_some() {
            self.pos += 1;
        }
        Ok(group)
    }

    fn remaining_hint(&self) -> usize {
        self.lookup.len().saturating_sub(self.pos)
    }
}

/// Single forward pass: bucket every element by key, preserving arrival order
/// within each bucket and first-occurrence order across buckets.
pub(crate) fn build_lookup<T, K, E>(
    cursor: &mut dyn Cursor<Item = T>,
    key_of: &dyn Fn(&T) -> K,
    element_of: &dyn Fn(T) -> E,
    comparer: EqRef<K>,
) -> QueryResult<Lookup<K, E>>
where
    K: Clone,
{
    let mut index = KeyIndex::new(comparer);
    let mut buckets: Vec<Vec<E>> = Vec::new();
    let mut rows = 0usize;
    drain_into(cursor, |item| {
        let key = key_of(&item);
        let (slot, inserted) = index.find_or_insert(key);
        if inserted {
            buckets.push(Vec::new());
        }
        buckets[slot].push(element_of(item));
        rows += 1;
        Ok(())
    })?;
    record_buffer("lookup", rows);

    let groups = buckets
        .into_iter()
        .enumerate()
        .map(|(slot, elements)| Grouping {
            data: Rc::new(GroupData {
                key: index.key(slot).clone(),
                elements: Rc::new(elements),
            }),
        })
        .collect();
    Ok(Lookup {
        data: Rc::new(LookupData { index, groups }),
    })
}
