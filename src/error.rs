//! Error types for sqlbind.

use crate::ast::Value;
use thiserror::Error;

/// The main error type for compile-time failures.
///
/// Every variant names the compiling step that raised it, so a failed
/// `to_text`/`to_prepared` call points back at the incomplete or invalid
/// part of the builder call chain. None of these are transient: the library
/// performs no I/O, and retrying the same query yields the same error.
#[derive(Debug, Error)]
pub enum SqlError {
    /// The query has no FROM target.
    #[error("{step}: no target table specified")]
    MissingTable { step: &'static str },

    /// An INSERT/UPDATE statement is missing its payload clause.
    #[error("{step}: missing {clause} clause")]
    MissingClause {
        step: &'static str,
        clause: &'static str,
    },

    /// LIMIT/OFFSET value out of range (must be greater than zero).
    #[error("{step}: {what} must be greater than zero, got {value}")]
    Range {
        step: &'static str,
        what: &'static str,
        value: i64,
    },

    /// A bound value has no literal SQL form. Only raised by literal
    /// rendering; the prepared rendering hands the value through verbatim.
    #[error("value {value:?} cannot be converted to a SQL literal")]
    Unconvertible { value: Value },

    /// Sub-query nesting exceeded the recursion cap.
    #[error("sub-query nesting exceeds maximum depth of {0}")]
    TooDeep(usize),

    /// Internal invariant violation. Unreachable through the public API.
    #[error("{step}: {message}")]
    Internal { step: &'static str, message: String },
}

impl SqlError {
    /// Create a missing-table error for the given compiling step.
    pub fn missing_table(step: &'static str) -> Self {
        Self::MissingTable { step }
    }

    /// Create a missing-clause error for the given compiling step.
    pub fn missing_clause(step: &'static str, clause: &'static str) -> Self {
        Self::MissingClause { step, clause }
    }

    /// Create a range error for the given compiling step.
    pub fn range(step: &'static str, what: &'static str, value: i64) -> Self {
        Self::Range { step, what, value }
    }

    pub(crate) fn internal(step: &'static str, message: impl Into<String>) -> Self {
        Self::Internal {
            step,
            message: message.into(),
        }
    }
}

/// Result type alias for sqlbind operations.
pub type SqlResult<T> = Result<T, SqlError>;
