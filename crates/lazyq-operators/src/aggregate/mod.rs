//! Terminal operators: folds, quantifiers and element picks.
//!
//! Everything here runs immediately and consumes at most one traversal.
//! Short-circuiting operators stop pulling as soon as the answer is known.

pub mod numeric;

use std::hash::Hash;

use lazyq_core::comparer::{resolve_eq, EqRef};
use lazyq_core::error::{QueryError, QueryResult};

use crate::seq::Seq;

impl<T: 'static> Seq<T> {
    /// Fold without a seed; the first element seeds the accumulator.
    pub fn aggregate(&self, mut f: impl FnMut(T, T) -> T) -> QueryResult<T> {
        let mut cursor = self.cursor();
        let mut acc = cursor.pull()?.ok_or(QueryError::NoElements)?;
        while let Some(item) = cursor.pull()? {
            acc = f(acc, item);
        }
        Ok(acc)
    }

    pub fn aggregate_seed<A>(&self, seed: A, mut f: impl FnMut(A, T) -> A) -> QueryResult<A> {
        let mut cursor = self.cursor();
        let mut acc = seed;
        while let Some(item) = cursor.pull()? {
            acc = f(acc, item);
        }
        Ok(acc)
    }

    /// Seeded fold followed by a projection of the final accumulator.
    pub fn aggregate_with<A, R>(
        &self,
        seed: A,
        f: impl FnMut(A, T) -> A,
        result: impl FnOnce(A) -> R,
    ) -> QueryResult<R> {
        self.aggregate_seed(seed, f).map(result)
    }

    pub fn count(&self) -> QueryResult<usize> {
        if let Some(index) = self.indexed() {
            return Ok(index.len());
        }
        let mut cursor = self.cursor();
        let mut n = 0usize;
        while cursor.pull()?.is_some() {
            n += 1;
        }
        Ok(n)
    }

    pub fn count_where(&self, pred: impl Fn(&T) -> bool) -> QueryResult<usize> {
        self.aggregate_seed(0usize, |n, item| if pred(&item) { n + 1 } else { n })
    }

    pub fn any(&self) -> QueryResult<bool> {
        if let Some(index) = self.indexed() {
            return Ok(!index.is_empty());
        }
        Ok(self.cursor().pull()?.is_some())
    }

    pub fn any_where(&self, pred: impl Fn(&T) -> bool) -> QueryResult<bool> {
        let mut cursor = self.cursor();
        while let Some(item) = cursor.pull()? {
            if pred(&item) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True for an empty sequence.
    pub fn all(&self, pred: impl Fn(&T) -> bool) -> QueryResult<bool> {
        Ok(!self.any_where(|item| !pred(item))?)
    }

    pub fn first(&self) -> QueryResult<T> {
        self.cursor().pull()?.ok_or(QueryError::NoElements)
    }

    pub fn last(&self) -> QueryResult<T> {
        self.last_opt()?.ok_or(QueryError::NoElements)
    }

    fn last_opt(&self) -> QueryResult<Option<T>> {
        if let Some(index) = self.indexed() {
            return Ok(index.len().checked_sub(1).and_then(|i| index.get(i)));
        }
        let mut cursor = self.cursor();
        let mut last = None;
        while let Some(item) = cursor.pull()? {
            last = Some(item);
        }
        Ok(last)
    }

    /// The only element. Stops pulling at the second one.
    pub fn single(&self) -> QueryResult<T> {
        self.single_opt()?.ok_or(QueryError::NoElements)
    }

    fn single_opt(&self) -> QueryResult<Option<T>> {
        let mut cursor = self.cursor();
        let Some(item) = cursor.pull()? else {
            return Ok(None);
        };
        if cursor.pull()?.is_some() {
            return Err(QueryError::MoreThanOneElement);
        }
        Ok(Some(item))
    }
}

impl<T: Default + 'static> Seq<T> {
    pub fn first_or_default(&self) -> QueryResult<T> {
        Ok(self.cursor().pull()?.unwrap_or_default())
    }

    pub fn last_or_default(&self) -> QueryResult<T> {
        Ok(self.last_opt()?.unwrap_or_default())
    }

    /// Default when empty; more than one element still fails.
    pub fn single_or_default(&self) -> QueryResult<T> {
        Ok(self.single_opt()?.unwrap_or_default())
    }
}

impl<T: PartialEq + 'static> Seq<T> {
    pub fn contains(&self, value: &T) -> QueryResult<bool> {
        self.any_where(|item| item == value)
    }

    /// Pairwise equality; sequences of different lengths are unequal.
    pub fn sequence_equal(&self, other: &Seq<T>) -> QueryResult<bool> {
        let mut left = self.cursor();
        let mut right = other.cursor();
        loop {
            match (left.pull()?, right.pull()?) {
                (None, None) => return Ok(true),
                (Some(a), Some(b)) if a == b => continue,
                _ => return Ok(false),
            }
        }
    }
}

impl<T: 'static> Seq<T> {
    pub fn contains_using(&self, value: &T, comparer: EqRef<T>) -> QueryResult<bool> {
        self.any_where(|item| comparer.equals(item, value))
    }
}

impl<T: Hash + Eq + 'static> Seq<T> {
    /// `comparer: None` uses default equality.
    pub fn contains_with(&self, value: &T, comparer: Option<EqRef<T>>) -> QueryResult<bool> {
        self.contains_using(value, resolve_eq(comparer))
    }
}
