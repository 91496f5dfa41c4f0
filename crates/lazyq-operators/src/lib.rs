#![forbid(unsafe_code)]
//! lazyq-operators: the cursor protocol, `Seq<T>` and every query operator.
//!
//! Design intent:
//! - Operators are inherent methods on `Seq<T>`; each returns immediately and
//!   reads nothing until a cursor is pulled.
//! - Buffering operators (sort, group, join, sets, reverse) materialize on the
//!   first pull of each traversal, never at declaration.
//! - Terminal operators (aggregates, materializers) run immediately.

pub mod metrics;
pub mod seq;
pub mod source;
pub mod traits;

pub mod concat;
pub mod filter;
pub mod map;

pub mod group;
pub mod join;
pub mod sort;

pub mod aggregate;
pub mod materialize;
pub mod set;

pub use group::{Grouping, KeyIndex, Lookup};
pub use materialize::Dictionary;
pub use seq::{BufferedCursor, Seq, SeqIter};
pub use sort::{OrderedSeq, SortDirection};
pub use source::{Resource, ResourceCursor};
pub use traits::{BoxCursor, Cursor, IndexedSource};
