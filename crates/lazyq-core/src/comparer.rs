//! Pluggable equality and ordering capabilities over key types.
//!
//! Operators take comparers as `Option<EqRef<K>>` / `Option<CmpRef<K>>`.
//! `None` never means "no comparison": it resolves to [`DefaultEquality`] or
//! [`NaturalOrder`] through [`resolve_eq`] / [`resolve_cmp`].
//! The `_using` operator forms take the comparer itself and put no trait
//! bounds on the key.

use std::cmp::Ordering;
use std::hash::Hash;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::{QueryError, QueryResult};
use crate::hash::{hash_str_folded, stable_hash};

/// Equality plus a hash consistent with it: `equals(a, b)` implies
/// `hash(a) == hash(b)`.
pub trait EqualityComparer<K: ?Sized> {
    fn equals(&self, a: &K, b: &K) -> bool;
    fn hash(&self, key: &K) -> u64;
}

/// Total ordering over keys. Fails with [`QueryError::NotComparable`] when two
/// values carry no mutual ordering.
pub trait Comparer<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> QueryResult<Ordering>;
}

pub type EqRef<K> = Rc<dyn EqualityComparer<K>>;
pub type CmpRef<K> = Rc<dyn Comparer<K>>;

/// Structural equality (`Eq`) with the stable blake3 hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEquality;

impl<K: Hash + Eq + ?Sized> EqualityComparer<K> for DefaultEquality {
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }

    fn hash(&self, key: &K) -> u64 {
        stable_hash(key)
    }
}

/// Natural ordering over `PartialOrd`.
///
/// `None` sorts before `Some(_)` (derived `Option` ordering). Values unequal to
/// themselves (NaN) sort below everything else and equal to each other. Two
/// ordinary values with no mutual ordering fail with `NotComparable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<K: PartialOrd + ?Sized> Comparer<K> for NaturalOrder {
    fn compare(&self, a: &K, b: &K) -> QueryResult<Ordering> {
        if let Some(ord) = a.partial_cmp(b) {
            return Ok(ord);
        }
        match (is_nan_like(a), is_nan_like(b)) {
            (true, true) => Ok(Ordering::Equal),
            (true, false) => Ok(Ordering::Less),
            (false, true) => Ok(Ordering::Greater),
            (false, false) => Err(QueryError::NotComparable),
        }
    }
}

/// True for values that compare unequal to themselves (floating-point NaN).
#[allow(clippy::eq_op)]
pub fn is_nan_like<K: PartialEq + ?Sized>(value: &K) -> bool {
    value != value
}

pub fn resolve_eq<K: Hash + Eq + 'static>(comparer: Option<EqRef<K>>) -> EqRef<K> {
    comparer.unwrap_or_else(|| Rc::new(DefaultEquality))
}

pub fn resolve_cmp<K: PartialOrd + 'static>(comparer: Option<CmpRef<K>>) -> CmpRef<K> {
    comparer.unwrap_or_else(|| Rc::new(NaturalOrder))
}

/// Equality comparer assembled from two closures.
pub struct FnEquality<K: ?Sized, E, H> {
    eq: E,
    hash: H,
    _key: PhantomData<fn(&K)>,
}

impl<K: ?Sized, E, H> EqualityComparer<K> for FnEquality<K, E, H>
where
    E: Fn(&K, &K) -> bool,
    H: Fn(&K) -> u64,
{
    fn equals(&self, a: &K, b: &K) -> bool {
        (self.eq)(a, b)
    }

    fn hash(&self, key: &K) -> u64 {
        (self.hash)(key)
    }
}

pub fn equality_from_fns<K, E, H>(eq: E, hash: H) -> EqRef<K>
where
    K: ?Sized + 'static,
    E: Fn(&K, &K) -> bool + 'static,
    H: Fn(&K) -> u64 + 'static,
{
    Rc::new(FnEquality {
        eq,
        hash,
        _key: PhantomData,
    })
}

/// Infallible comparer from a closure.
pub struct FnComparer<K: ?Sized, F> {
    cmp: F,
    _key: PhantomData<fn(&K)>,
}

impl<K: ?Sized, F> Comparer<K> for FnComparer<K, F>
where
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, a: &K, b: &K) -> QueryResult<Ordering> {
        Ok((self.cmp)(a, b))
    }
}

pub fn comparer_from_fn<K, F>(cmp: F) -> CmpRef<K>
where
    K: ?Sized + 'static,
    F: Fn(&K, &K) -> Ordering + 'static,
{
    Rc::new(FnComparer {
        cmp,
        _key: PhantomData,
    })
}

/// Case-insensitive string equality and ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitive;

impl CaseInsensitive {
    fn fold(s: &str) -> String {
        s.to_lowercase()
    }
}

impl EqualityComparer<String> for CaseInsensitive {
    fn equals(&self, a: &String, b: &String) -> bool {
        Self::fold(a) == Self::fold(b)
    }

    fn hash(&self, key: &String) -> u64 {
        hash_str_folded(key)
    }
}

impl EqualityComparer<&'static str> for CaseInsensitive {
    fn equals(&self, a: &&'static str, b: &&'static str) -> bool {
        Self::fold(a) == Self::fold(b)
    }

    fn hash(&self, key: &&'static str) -> u64 {
        hash_str_folded(key)
    }
}

impl Comparer<String> for CaseInsensitive {
    fn compare(&self, a: &String, b: &String) -> QueryResult<Ordering> {
        Ok(Self::fold(a).cmp(&Self::fold(b)))
    }
}
