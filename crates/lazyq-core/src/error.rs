use thiserror::Error;

/// Canonical result for every query operation.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Coarse error taxonomy callers assert against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    ArgumentNull,
    Argument,
    InvalidOperation,
    OutOfRange,
    Overflow,
    Source,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("value cannot be null (parameter '{param}')")]
    ArgumentNull { param: &'static str },

    #[error("an item with the same key has already been added (parameter '{param}')")]
    DuplicateKey { param: &'static str },

    #[error("at least one value must carry an ordering to be compared")]
    NotComparable,

    #[error("sequence contains no elements")]
    NoElements,

    #[error("sequence contains more than one element")]
    MoreThanOneElement,

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("index {index} was out of range (length {len:?})")]
    OutOfRange { index: isize, len: Option<usize> },

    #[error("arithmetic operation resulted in an overflow: {operation}")]
    Overflow { operation: &'static str },

    // Sources and fallible selectors map their own failures here.
    #[error("source error: {0}")]
    Source(String),
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::ArgumentNull { .. } => ErrorKind::ArgumentNull,
            QueryError::DuplicateKey { .. } | QueryError::NotComparable => ErrorKind::Argument,
            QueryError::NoElements
            | QueryError::MoreThanOneElement
            | QueryError::InvalidOperation(_) => ErrorKind::InvalidOperation,
            QueryError::OutOfRange { .. } => ErrorKind::OutOfRange,
            QueryError::Overflow { .. } => ErrorKind::Overflow,
            QueryError::Source(_) => ErrorKind::Source,
        }
    }

    pub fn source_error(msg: impl Into<String>) -> Self {
        QueryError::Source(msg.into())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(e: serde_json::Error) -> Self {
        QueryError::InvalidOperation(format!("config: {e}"))
    }
}
