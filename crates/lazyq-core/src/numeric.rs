//! Accumulation rules for `sum` / `average`.
//!
//! Integral running totals are checked and fail with `Overflow`. Floating-point
//! totals never check: IEEE overflow goes to infinity and NaN stays NaN.
//! Narrow types accumulate in a wider total where the result type allows it:
//! `f32` sums in `f64`, and `i32`/`u32` average through a 64-bit total.

use crate::error::{QueryError, QueryResult};

pub trait Summable: Copy + 'static {
    type Total: Copy;

    fn zero_total() -> Self::Total;
    fn add_to_total(total: Self::Total, value: Self) -> QueryResult<Self::Total>;
    fn from_total(total: Self::Total) -> QueryResult<Self>;

    /// The additive identity of the element type.
    fn zero() -> Self;
}

pub trait Averageable: Copy + 'static {
    type Total: Copy;
    type Output: Copy + 'static;

    fn zero_total() -> Self::Total;
    fn add_to_total(total: Self::Total, value: Self) -> QueryResult<Self::Total>;
    /// `count` is never zero.
    fn finish(total: Self::Total, count: u64) -> Self::Output;
}

macro_rules! checked_sum {
    ($($t:ty),*) => {
        $(
            impl Summable for $t {
                type Total = $t;

                fn zero_total() -> $t {
                    0
                }

                fn add_to_total(total: $t, value: $t) -> QueryResult<$t> {
                    total
                        .checked_add(value)
                        .ok_or(QueryError::Overflow { operation: "sum" })
                }

                fn from_total(total: $t) -> QueryResult<$t> {
                    Ok(total)
                }

                fn zero() -> $t {
                    0
                }
            }
        )*
    };
}

checked_sum!(i32, i64, u32, u64);

impl Summable for f64 {
    type Total = f64;

    fn zero_total() -> f64 {
        0.0
    }

    fn add_to_total(total: f64, value: f64) -> QueryResult<f64> {
        Ok(total + value)
    }

    fn from_total(total: f64) -> QueryResult<f64> {
        Ok(total)
    }

    fn zero() -> f64 {
        0.0
    }
}

impl Summable for f32 {
    type Total = f64;

    fn zero_total() -> f64 {
        0.0
    }

    fn add_to_total(total: f64, value: f32) -> QueryResult<f64> {
        Ok(total + f64::from(value))
    }

    fn from_total(total: f64) -> QueryResult<f32> {
        Ok(total as f32)
    }

    fn zero() -> f32 {
        0.0
    }
}

macro_rules! checked_average {
    ($($t:ty => $total:ty),*) => {
        $(
            impl Averageable for $t {
                type Total = $total;
                type Output = f64;

                fn zero_total() -> $total {
                    0
                }

                fn add_to_total(total: $total, value: $t) -> QueryResult<$total> {
                    total
                        .checked_add(<$total>::from(value))
                        .ok_or(QueryError::Overflow { operation: "average" })
                }

                fn finish(total: $total, count: u64) -> f64 {
                    total as f64 / count as f64
                }
            }
        )*
    };
}

checked_average!(i32 => i64, i64 => i64, u32 => u64, u64 => u64);

impl Averageable for f64 {
    type Total = f64;
    type Output = f64;

    fn zero_total() -> f64 {
        0.0
    }

    fn add_to_total(total: f64, value: f64) -> QueryResult<f64> {
        Ok(total + value)
    }

    fn finish(total: f64, count: u64) -> f64 {
        total / count as f64
    }
}

impl Averageable for f32 {
    type Total = f64;
    type Output = f32;

    fn zero_total() -> f64 {
        0.0
    }

    fn add_to_total(total: f64, value: f32) -> QueryResult<f64> {
        Ok(total + f64::from(value))
    }

    fn finish(total: f64, count: u64) -> f32 {
        (total / count as f64) as f32
    }
}
