//! Numeric aggregates and extrema.
//!
//! Accumulation rules (checked integers, widened totals, unchecked floats)
//! come from `lazyq_core::numeric`. Extrema skip NaN-like values unless
//! nothing else is present.

use std::cmp::Ordering;

use lazyq_core::comparer::{is_nan_like, resolve_cmp, CmpRef, Comparer};
use lazyq_core::error::{QueryError, QueryResult};
use lazyq_core::numeric::{Averageable, Summable};

use crate::seq::Seq;
use crate::traits::Cursor;

fn sum_of<T: Summable>(mut next: impl FnMut() -> QueryResult<Option<T>>) -> QueryResult<T> {
    let mut total = T::zero_total();
    while let Some(value) = next()? {
        total = T::add_to_total(total, value)?;
    }
    T::from_total(total)
}

fn average_of<T: Averageable>(
    mut next: impl FnMut() -> QueryResult<Option<T>>,
) -> QueryResult<Option<T::Output>> {
    let mut total = T::zero_total();
    let mut count = 0u64;
    while let Some(value) = next()? {
        total = T::add_to_total(total, value)?;
        count += 1;
    }
    Ok((count > 0).then(|| T::finish(total, count)))
}

/// Best element under `comparer` in direction `want`. Ties keep the earlier
/// element. A NaN-like best is displaced by the first ordinary value, and a
/// NaN-like candidate never displaces anything.
fn extreme_of<T: PartialEq>(
    mut next: impl FnMut() -> QueryResult<Option<T>>,
    comparer: &dyn Comparer<T>,
    want: Ordering,
) -> QueryResult<Option<T>> {
    let mut best: Option<T> = None;
    while let Some(item) = next()? {
        let replace = match &best {
            None => true,
            Some(current) if is_nan_like(current) => !is_nan_like(&item),
            Some(_) if is_nan_like(&item) => false,
            Some(current) => comparer.compare(&item, current)? == want,
        };
        if replace {
            best = Some(item);
        }
    }
    Ok(best)
}

/// Next present value from a nullable cursor.
fn next_present<T>(cursor: &mut dyn Cursor<Item = Option<T>>) -> QueryResult<Option<T>> {
    while let Some(item) = cursor.pull()? {
        if item.is_some() {
            return Ok(item);
        }
    }
    Ok(None)
}

impl<T: Summable> Seq<T> {
    /// Zero for an empty sequence.
    pub fn sum(&self) -> QueryResult<T> {
        let mut cursor = self.cursor();
        sum_of(|| cursor.pull())
    }
}

impl<T: Averageable> Seq<T> {
    pub fn average(&self) -> QueryResult<T::Output> {
        let mut cursor = self.cursor();
        average_of(|| cursor.pull())?.ok_or(QueryError::NoElements)
    }
}

impl<T: PartialOrd + 'static> Seq<T> {
    pub fn max(&self) -> QueryResult<T> {
        self.max_with(None)
    }

    pub fn min(&self) -> QueryResult<T> {
        self.min_with(None)
    }

    /// `comparer: None` uses natural ordering. Two ordinary values without a
    /// mutual ordering fail with `NotComparable`.
    pub fn max_with(&self, comparer: Option<CmpRef<T>>) -> QueryResult<T> {
        self.max_using(resolve_cmp(comparer))
    }

    pub fn min_with(&self, comparer: Option<CmpRef<T>>) -> QueryResult<T> {
        self.min_using(resolve_cmp(comparer))
    }
}

impl<T: PartialEq + 'static> Seq<T> {
    /// Extrema ranked only through `comparer`. `PartialEq` is still needed to
    /// recognise NaN-like values.
    pub fn max_using(&self, comparer: CmpRef<T>) -> QueryResult<T> {
        let mut cursor = self.cursor();
        extreme_of(|| cursor.pull(), &*comparer, Ordering::Greater)?.ok_or(QueryError::NoElements)
    }

    pub fn min_using(&self, comparer: CmpRef<T>) -> QueryResult<T> {
        let mut cursor = self.cursor();
        extreme_of(|| cursor.pull(), &*comparer, Ordering::Less)?.ok_or(QueryError::NoElements)
    }
}

impl<T: Summable> Seq<Option<T>> {
    /// Sum of the present values; `Some(zero)` when none are present.
    pub fn nullable_sum(&self) -> QueryResult<Option<T>> {
        let mut cursor = self.cursor();
        sum_of(|| next_present(&mut cursor)).map(Some)
    }
}

impl<T: Averageable> Seq<Option<T>> {
    /// `None` when no value is present.
    pub fn nullable_average(&self) -> QueryResult<Option<T::Output>> {
        let mut cursor = self.cursor();
        average_of(|| next_present(&mut cursor))
    }
}

impl<T: PartialOrd + 'static> Seq<Option<T>> {
    pub fn nullable_max(&self) -> QueryResult<Option<T>> {
        let comparer = resolve_cmp::<T>(None);
        let mut cursor = self.cursor();
        extreme_of(|| next_present(&mut cursor), &*comparer, Ordering::Greater)
    }

    pub fn nullable_min(&self) -> QueryResult<Option<T>> {
        let comparer = resolve_cmp::<T>(None);
        let mut cursor = self.cursor();
        extreme_of(|| next_present(&mut cursor), &*comparer, Ordering::Less)
    }
}
