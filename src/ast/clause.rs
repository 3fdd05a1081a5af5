//! The clause model: every fragment of a query is one tagged variant.

use serde::{Deserialize, Serialize};

use crate::ast::{Combinator, JoinKind, Section, Value};
use crate::query::Query;

/// Discriminator used for section grouping and single-valued overwrite
/// semantics (a second LIMIT replaces the first rather than appending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClauseKind {
    From,
    Column,
    RawColumn,
    Join,
    GroupBy,
    OrderBy,
    Limit,
    Offset,
    Where,
    Having,
    Insert,
    Update,
}

/// One atomic fragment of a query, immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Clause {
    From {
        table: String,
        alias: Option<String>,
    },
    Column {
        name: String,
        alias: Option<String>,
    },
    RawColumn {
        expr: String,
    },
    Join {
        kind: JoinKind,
        table: String,
        left: String,
        op: String,
        right: String,
    },
    GroupBy {
        columns: Vec<String>,
    },
    OrderBy {
        column: String,
        desc: bool,
    },
    Limit {
        rows: i64,
    },
    Offset {
        rows: i64,
    },
    /// A condition in the WHERE or HAVING section. `negate` and
    /// `combinator` are fixed at append time from the query's pending
    /// flags.
    Condition {
        section: Section,
        negate: bool,
        combinator: Combinator,
        predicate: Predicate,
    },
    /// INSERT payload: either explicit columns/values or a source
    /// sub-query.
    Insert {
        columns: Vec<String>,
        values: Vec<Value>,
        source: Option<Box<Query>>,
    },
    /// UPDATE payload: ordered column assignments.
    Update {
        assignments: Vec<(String, Value)>,
    },
}

impl Clause {
    /// The discriminator for this clause.
    pub fn kind(&self) -> ClauseKind {
        match self {
            Clause::From { .. } => ClauseKind::From,
            Clause::Column { .. } => ClauseKind::Column,
            Clause::RawColumn { .. } => ClauseKind::RawColumn,
            Clause::Join { .. } => ClauseKind::Join,
            Clause::GroupBy { .. } => ClauseKind::GroupBy,
            Clause::OrderBy { .. } => ClauseKind::OrderBy,
            Clause::Limit { .. } => ClauseKind::Limit,
            Clause::Offset { .. } => ClauseKind::Offset,
            Clause::Condition {
                section: Section::Where,
                ..
            } => ClauseKind::Where,
            Clause::Condition {
                section: Section::Having,
                ..
            } => ClauseKind::Having,
            Clause::Insert { .. } => ClauseKind::Insert,
            Clause::Update { .. } => ClauseKind::Update,
        }
    }
}

/// The predicate carried by a condition clause.
///
/// Rendering dispatches on this variant with an explicit `match`; the set
/// is closed, so an unhandled predicate is a programming error, not a
/// user-facing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// `col op value`, operand bound
    Compare {
        column: String,
        op: String,
        value: Value,
    },
    /// `left op right`, both identifiers, nothing bound
    ColumnCompare {
        left: String,
        op: String,
        right: String,
    },
    /// `col [NOT] LIKE pattern`, pattern bound
    Like { column: String, pattern: String },
    /// `col [NOT] BETWEEN from AND to`, both bounds bound
    Between {
        column: String,
        from: Value,
        to: Value,
    },
    /// `col [NOT] IN (v, v, ...)`, every member bound
    In { column: String, values: Vec<Value> },
    /// `col [NOT] IN (sub-query)`
    InSubquery { column: String, query: Box<Query> },
    /// `col IS [NOT] NULL`
    NullCheck { column: String },
    /// `col = TRUE` / `col = FALSE`, bare keyword, never bound
    Boolean { column: String, value: bool },
    /// `[NOT] EXISTS (sub-query)`
    Exists { query: Box<Query> },
    /// Caller expression emitted verbatim, unescaped
    Raw { expr: String },
}
