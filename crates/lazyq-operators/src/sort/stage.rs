//! Sort stages and the stable index sort.
//!
//! Each stage computes its keys once per buffered element; the composite
//! comparator then walks stages lexicographically and finally falls back to
//! source position, so equal key tuples keep their relative order.

use std::cmp::Ordering;
use std::rc::Rc;

use lazyq_core::comparer::CmpRef;
use lazyq_core::error::QueryResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

pub(crate) trait SortStage<T> {
    fn compute(&self, items: &[T]) -> Box<dyn StageKeys>;
}

pub(crate) trait StageKeys {
    fn compare(&self, a: usize, b: usize) -> QueryResult<Ordering>;
}

pub(crate) struct KeyedStage<T, K> {
    pub(crate) key: Rc<dyn Fn(&T) -> K>,
    pub(crate) comparer: CmpRef<K>,
    pub(crate) direction: SortDirection,
}

struct ComputedKeys<K> {
    keys: Vec<K>,
    comparer: CmpRef<K>,
    direction: SortDirection,
}

impl<K> StageKeys for ComputedKeys<K> {
    fn compare(&self, a: usize, b: usize) -> QueryResult<Ordering> {
        let ord = self.comparer.compare(&self.keys[a], &self.keys[b])?;
        Ok(self.direction.apply(ord))
    }
}

impl<T, K: 'static> SortStage<T> for KeyedStage<T, K> {
    fn compute(&self, items: &[T]) -> Box<dyn StageKeys> {
        Box::new(ComputedKeys {
            keys: items.iter().map(|item| (self.key)(item)).collect(),
            comparer: Rc::clone(&self.comparer),
            direction: self.direction,
        })
    }
}

/// Stable sort of `items` by the stage chain. Comparer failures abort the
/// sort and surface to the caller.
pub(crate) fn sort_stable<T>(items: Vec<T>, stages: &[Rc<dyn SortStage<T>>]) -> QueryResult<Vec<T>> {
    let keys: Vec<Box<dyn StageKeys>> = stages.iter().map(|s| s.compute(&items)).collect();
    let mut order: Vec<usize> = (0..items.len()).collect();
    merge_sort(&mut order, &mut |a, b| {
        for stage in &keys {
            match stage.compare(a, b)? {
                Ordering::Equal => continue,
                other => return Ok(other),
            }
        }
        Ok(a.cmp(&b))
    })?;

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect())
}

/// Bottom-up merge sort with a fallible comparator. Ties take the left run
/// first, which keeps the sort stable.
fn merge_sort(
    order: &mut Vec<usize>,
    cmp: &mut dyn FnMut(usize, usize) -> QueryResult<Ordering>,
) -> QueryResult<()> {
    let len = order.len();
    let mut scratch = vec![0usize; len];
    let mut width = 1;
    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut i, mut j, mut k) = (start, mid, start);
            while i < mid && j < end {
                if cmp(order[j], order[i])? == Ordering::Less {
                    scratch[k] = order[j];
                    j += 1;
                } else {
                    scratch[k] = order[i];
                    i += 1;
                }
                k += 1;
            }
            scratch[k..k + (mid - i)].copy_from_slice(&order[i..mid]);
            k += mid - i;
            scratch[k..k + (end - j)].copy_from_slice(&order[j..end]);
            start = end;
        }
        std::mem::swap(order, &mut scratch);
        width *= 2;
    }
    Ok(())
}
