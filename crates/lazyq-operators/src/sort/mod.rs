//! Ordering engine: deferred, stable, multi-key sort.
//!
//! `order_by*` starts a chain and `then_by*` appends secondary stages. Nothing
//! is buffered until a traversal is pulled; each traversal re-reads the
//! source and sorts it once.

pub mod stage;

pub use stage::SortDirection;

use std::ops::Deref;
use std::rc::Rc;

use lazyq_core::comparer::{resolve_cmp, CmpRef};
use lazyq_core::config::QueryConfig;

use crate::metrics::record_buffer;
use crate::seq::{drain_into, BufferedCursor, Seq};
use crate::traits::Cursor;
use stage::{sort_stable, KeyedStage, SortStage};

/// Read the whole source into a vector, reserving at least
/// `buffer_reserve` slots.
fn buffer_all<T>(cursor: &mut dyn Cursor<Item = T>) -> lazyq_core::QueryResult<Vec<T>> {
    let reserve = QueryConfig::global()
        .buffer_reserve
        .max(cursor.remaining_hint());
    let mut items = Vec::with_capacity(reserve);
    drain_into(cursor, |item| {
        items.push(item);
        Ok(())
    })?;
    Ok(items)
}

/// A sequence with a sort chain attached. Dereferences to the sorted `Seq`.
pub struct OrderedSeq<T> {
    source: Seq<T>,
    stages: Vec<Rc<dyn SortStage<T>>>,
    sorted: Seq<T>,
}

impl<T> Clone for OrderedSeq<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            stages: self.stages.clone(),
            sorted: self.sorted.clone(),
        }
    }
}

impl<T> Deref for OrderedSeq<T> {
    type Target = Seq<T>;

    fn deref(&self) -> &Seq<T> {
        &self.sorted
    }
}

impl<T: 'static> OrderedSeq<T> {
    fn new(source: Seq<T>, stages: Vec<Rc<dyn SortStage<T>>>) -> Self {
        let input = source.clone();
        let chain = stages.clone();
        let sorted = Seq::from_cursor_fn(move || {
            let input = input.clone();
            let chain = chain.clone();
            Box::new(BufferedCursor::new(move || {
                let items = buffer_all(&mut input.cursor())?;
                record_buffer("order_by", items.len());
                sort_stable(items, &chain)
            }))
        });
        Self {
            source,
            stages,
            sorted,
        }
    }

    /// Append a stage ordered only through `comparer`. `K` needs no
    /// `PartialOrd` of its own.
    pub fn then_by_using<K: 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: CmpRef<K>,
        direction: SortDirection,
    ) -> Self {
        let mut stages = self.stages.clone();
        stages.push(Rc::new(KeyedStage {
            key: Rc::new(key),
            comparer,
            direction,
        }));
        OrderedSeq::new(self.source.clone(), stages)
    }

    /// Number of key stages in the chain.
    pub fn depth(&self) -> usize {
        self.stages.len()
    }

    pub fn as_seq(&self) -> &Seq<T> {
        &self.sorted
    }

    pub fn into_seq(self) -> Seq<T> {
        self.sorted
    }

    pub fn then_by<K: PartialOrd + 'static>(&self, key: impl Fn(&T) -> K + 'static) -> Self {
        self.then_by_using(key, resolve_cmp(None), SortDirection::Ascending)
    }

    pub fn then_by_descending<K: PartialOrd + 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
    ) -> Self {
        self.then_by_using(key, resolve_cmp(None), SortDirection::Descending)
    }

    pub fn then_by_with<K: PartialOrd + 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: Option<CmpRef<K>>,
    ) -> Self {
        self.then_by_using(key, resolve_cmp(comparer), SortDirection::Ascending)
    }

    pub fn then_by_descending_with<K: PartialOrd + 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: Option<CmpRef<K>>,
    ) -> Self {
        self.then_by_using(key, resolve_cmp(comparer), SortDirection::Descending)
    }
}

impl<T: 'static> From<OrderedSeq<T>> for Seq<T> {
    fn from(ordered: OrderedSeq<T>) -> Self {
        ordered.into_seq()
    }
}

impl<T: 'static> Seq<T> {
    /// Start a chain ordered only through `comparer`.
    pub fn order_by_using<K: 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: CmpRef<K>,
        direction: SortDirection,
    ) -> OrderedSeq<T> {
        OrderedSeq::new(self.clone(), Vec::new()).then_by_using(key, comparer, direction)
    }

    /// Stable ascending sort by `key` under natural ordering: `None` keys
    /// first, NaN-like keys below every other value.
    pub fn order_by<K: PartialOrd + 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
    ) -> OrderedSeq<T> {
        self.order_by_using(key, resolve_cmp(None), SortDirection::Ascending)
    }

    pub fn order_by_descending<K: PartialOrd + 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
    ) -> OrderedSeq<T> {
        self.order_by_using(key, resolve_cmp(None), SortDirection::Descending)
    }

    pub fn order_by_with<K: PartialOrd + 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: Option<CmpRef<K>>,
    ) -> OrderedSeq<T> {
        self.order_by_using(key, resolve_cmp(comparer), SortDirection::Ascending)
    }

    pub fn order_by_descending_with<K: PartialOrd + 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: Option<CmpRef<K>>,
    ) -> OrderedSeq<T> {
        self.order_by_using(key, resolve_cmp(comparer), SortDirection::Descending)
    }

    /// Yield the source back to front. Buffers on first pull.
    pub fn reverse(&self) -> Seq<T> {
        let source = self.clone();
        Seq::from_cursor_fn(move || {
            let source = source.clone();
            Box::new(BufferedCursor::new(move || {
                let mut items = buffer_all(&mut source.cursor())?;
                record_buffer("reverse", items.len());
                items.reverse();
                Ok(items)
            }))
        })
    }
}

impl<T: PartialOrd + Clone + 'static> Seq<T> {
    /// Sort by the elements themselves.
    pub fn order(&self) -> OrderedSeq<T> {
        self.order_by(T::clone)
    }

    pub fn order_descending(&self) -> OrderedSeq<T> {
        self.order_by_descending(T::clone)
    }
}
