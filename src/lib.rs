#![forbid(unsafe_code)]
//! lazyq: a deferred-execution query engine over sequences.
//!
//! ```
//! use lazyq::prelude::*;
//!
//! let words = Seq::from_vec(vec!["pear", "fig", "apple", "kiwi"]);
//! let sorted = words
//!     .order_by(|w| w.len())
//!     .then_by(|w| *w)
//!     .to_list()
//!     .unwrap();
//! assert_eq!(sorted, vec!["fig", "kiwi", "pear", "apple"]);
//! ```

pub use lazyq_core::{ErrorKind, QueryError, QueryResult};
pub use lazyq_operators::{
    BoxCursor, Cursor, Dictionary, Grouping, Lookup, OrderedSeq, Resource, Seq, SortDirection,
};

pub mod prelude {
    pub use lazyq_core::prelude::*;
    pub use lazyq_operators::{
        BoxCursor, Cursor, Dictionary, Grouping, IndexedSource, Lookup, OrderedSeq, Resource,
        Seq, SortDirection,
    };
}
