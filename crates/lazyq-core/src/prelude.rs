//! Convenient re-exports for downstream crates.

pub use crate::comparer::{
    comparer_from_fn, equality_from_fns, resolve_cmp, resolve_eq, CaseInsensitive, CmpRef,
    Comparer, DefaultEquality, EqRef, EqualityComparer, NaturalOrder,
};
pub use crate::config::QueryConfig;
pub use crate::error::{ErrorKind, QueryError, QueryResult};
pub use crate::lease::{Lease, LeaseTracker};
pub use crate::nullable::MaybeNull;
pub use crate::numeric::{Averageable, Summable};
