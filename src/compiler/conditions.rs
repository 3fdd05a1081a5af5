//! Condition rendering.
//!
//! Each predicate variant maps to exactly one rendering rule through the
//! `match` below; the variant set is closed, so there is no fallthrough.

use crate::ast::{Predicate, Value};
use crate::compiler::Compiler;
use crate::compiler::result::Binder;
use crate::error::SqlResult;

impl Compiler {
    /// Render one predicate, binding scalar operands through `binder`.
    ///
    /// Literals are never inlined except for the BOOLEAN rule, which emits
    /// a bare `TRUE`/`FALSE` keyword. Sub-queries compile recursively
    /// through the same binder, so their operands stay parameterized in
    /// the enclosing skeleton.
    pub(crate) fn render_predicate(
        &self,
        predicate: &Predicate,
        negate: bool,
        binder: &mut Binder,
        depth: usize,
    ) -> SqlResult<String> {
        let fragment = match predicate {
            Predicate::Compare { column, op, value } => {
                let symbol = binder.bind(value.clone());
                format!("{} {} {}", self.quote(column), op, symbol)
            }
            Predicate::ColumnCompare { left, op, right } => {
                format!("{} {} {}", self.quote(left), op, self.quote(right))
            }
            Predicate::Like { column, pattern } => {
                let symbol = binder.bind(Value::Text(pattern.clone()));
                if negate {
                    format!("{} NOT LIKE {}", self.quote(column), symbol)
                } else {
                    format!("{} LIKE {}", self.quote(column), symbol)
                }
            }
            Predicate::Between { column, from, to } => {
                let low = binder.bind(from.clone());
                let high = binder.bind(to.clone());
                if negate {
                    format!("{} NOT BETWEEN {} AND {}", self.quote(column), low, high)
                } else {
                    format!("{} BETWEEN {} AND {}", self.quote(column), low, high)
                }
            }
            Predicate::In { column, values } => {
                let symbols: Vec<String> =
                    values.iter().map(|v| binder.bind(v.clone())).collect();
                let list = symbols.join(",");
                if negate {
                    format!("{} NOT IN ({})", self.quote(column), list)
                } else {
                    format!("{} IN ({})", self.quote(column), list)
                }
            }
            Predicate::InSubquery { column, query } => {
                let sub = self.subquery_sql(query, binder, depth)?;
                if negate {
                    format!("{} NOT IN ({})", self.quote(column), sub)
                } else {
                    format!("{} IN ({})", self.quote(column), sub)
                }
            }
            Predicate::NullCheck { column } => {
                if negate {
                    format!("{} IS NOT NULL", self.quote(column))
                } else {
                    format!("{} IS NULL", self.quote(column))
                }
            }
            Predicate::Boolean { column, value } => {
                // negate flips the keyword rather than prefixing NOT
                let keyword = if *value != negate { "TRUE" } else { "FALSE" };
                format!("{} = {}", self.quote(column), keyword)
            }
            Predicate::Exists { query } => {
                let sub = self.subquery_sql(query, binder, depth)?;
                if negate {
                    format!("NOT EXISTS ({})", sub)
                } else {
                    format!("EXISTS ({})", sub)
                }
            }
            Predicate::Raw { expr } => expr.clone(),
        };
        Ok(fragment)
    }
}
