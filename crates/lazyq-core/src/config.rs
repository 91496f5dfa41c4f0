//! Engine tuning knobs shared by the buffering operators.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::QueryResult;

static GLOBAL: Lazy<QueryConfig> = Lazy::new(QueryConfig::from_env);

/// Upper bound on `max_load_percent`: at most 64 entries per bucket head.
pub const MAX_LOAD_PERCENT: usize = 6_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Initial number of chained bucket heads in a hash arena. Rounded up to a
    /// power of two.
    pub initial_buckets: usize,

    /// Grow the head table once entries exceed this percentage of heads.
    pub max_load_percent: usize,

    /// Minimum capacity reserved by buffering operators (sort, reverse).
    pub buffer_reserve: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            initial_buckets: 8,
            max_load_percent: 100,
            buffer_reserve: 0,
        }
    }
}

impl QueryConfig {
    /// Process-wide config, read from the environment on first use.
    pub fn global() -> &'static QueryConfig {
        &GLOBAL
    }

    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LAZYQ_INITIAL_BUCKETS`: initial hash arena head count
    /// - `LAZYQ_MAX_LOAD_PERCENT`: arena growth threshold
    /// - `LAZYQ_BUFFER_RESERVE`: minimum buffer capacity
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("LAZYQ_INITIAL_BUCKETS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.initial_buckets = v;
            }
        }

        if let Ok(s) = std::env::var("LAZYQ_MAX_LOAD_PERCENT") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_load_percent = v;
            }
        }

        if let Ok(s) = std::env::var("LAZYQ_BUFFER_RESERVE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.buffer_reserve = v;
            }
        }

        cfg.normalized()
    }

    pub fn from_json(text: &str) -> QueryResult<Self> {
        let cfg: QueryConfig = serde_json::from_str(text)?;
        Ok(cfg.normalized())
    }

    /// Head count actually used by a fresh arena.
    pub fn bucket_heads(&self) -> usize {
        self.initial_buckets.max(1).next_power_of_two()
    }

    fn normalized(mut self) -> Self {
        if self.max_load_percent == 0 {
            self.max_load_percent = 100;
        }
        self.max_load_percent = self.max_load_percent.min(MAX_LOAD_PERCENT);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg = QueryConfig::from_json(r#"{"initial_buckets": 5}"#).unwrap();
        assert_eq!(cfg.initial_buckets, 5);
        assert_eq!(cfg.bucket_heads(), 8);
        assert_eq!(cfg.max_load_percent, 100);
    }

    #[test]
    fn zero_load_is_normalized() {
        let cfg = QueryConfig::from_json(r#"{"max_load_percent": 0}"#).unwrap();
        assert_eq!(cfg.max_load_percent, 100);
    }

    #[test]
    fn oversized_load_is_capped() {
        let text = format!(r#"{{"max_load_percent": {}}}"#, usize::MAX);
        let cfg = QueryConfig::from_json(&text).unwrap();
        assert_eq!(cfg.max_load_percent, MAX_LOAD_PERCENT);
    }
}
