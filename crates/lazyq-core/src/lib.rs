#![forbid(unsafe_code)]
//! lazyq-core: errors, comparer capabilities, stable hashing, numeric
//! accumulation rules and configuration shared by the operator crate.
//!
//! Nothing here iterates; the cursor protocol and operators live in
//! `lazyq-operators`.

pub mod comparer;
pub mod config;
pub mod error;
pub mod hash;
pub mod lease;
pub mod nullable;
pub mod numeric;
pub mod prelude;

pub use error::{ErrorKind, QueryError, QueryResult};
