//! Expression evaluation with symbol resolution

pub mod expression;

pub use expression::{Evaluated, ExprValue, ExpressionEvaluator, Width};

/// Which of the two scans over the source is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Builds the label table; label values are not yet known.
    First,
    /// Resolves every reference and emits bytes.
    Second,
}
