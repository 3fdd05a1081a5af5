//! The fluent query builder.

use serde::{Deserialize, Serialize};

use crate::ast::{Clause, ClauseKind, Combinator, JoinKind, Predicate, Section, Statement, Value};
use crate::compiler::{CompiledSql, Compiler, Dialect};
use crate::error::SqlResult;

/// A SQL statement under construction: an ordered clause sequence, the
/// target statement kind, a distinct flag, and two single-use pending
/// modifier flags.
///
/// Mutators never fail; all validation is deferred to compile time. The
/// builder is unsynchronized: hand [`Query::fork`] copies to other threads
/// rather than sharing one value.
///
/// # Example
///
/// ```
/// use sqlbind::{Builder, Dialect};
///
/// let builder = Builder::new(Dialect::Mysql);
/// let sql = builder
///     .query("user")
///     .select(["id", "name"])
///     .filter("age", ">", 21)
///     .limit(10)
///     .to_text()
///     .unwrap();
/// assert_eq!(sql, "SELECT `id`,`name` FROM `user` WHERE `age` > 21 LIMIT 10");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    dialect: Dialect,
    statement: Statement,
    distinct: bool,
    clauses: Vec<Clause>,
    #[serde(skip)]
    pending_not: bool,
    #[serde(skip)]
    pending_or: bool,
}

impl Query {
    /// Create an empty SELECT query for the given dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            statement: Statement::Select,
            distinct: false,
            clauses: Vec::new(),
            pending_not: false,
            pending_or: false,
        }
    }

    /// The statement kind this query compiles to.
    pub fn statement(&self) -> Statement {
        self.statement
    }

    /// The dialect this query was minted with.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub(crate) fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// The clause sequence, in append order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub(crate) fn first_of(&self, kind: ClauseKind) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.kind() == kind)
    }

    /// Deep copy with the pending not/or flags reset, safe to hand to
    /// another thread or mutate independently.
    pub fn fork(&self) -> Self {
        let mut copy = self.clone();
        copy.pending_not = false;
        copy.pending_or = false;
        copy
    }

    // ==================== compilation ====================

    /// Compile into a fresh result with its own binder. Two calls share no
    /// mutable state.
    pub fn compile(&self) -> SqlResult<CompiledSql> {
        Compiler::new(self.dialect).compile(self)
    }

    /// Fully literal-substituted SQL text.
    pub fn to_text(&self) -> SqlResult<String> {
        self.compile()?.to_text()
    }

    /// Skeleton SQL plus the ordered bind values, for parameterized
    /// execution. Never fails for value-conversion reasons; sub-query
    /// operands bind through the same pass, so even values without a
    /// literal form come back in the value list.
    pub fn to_prepared(&self) -> SqlResult<(String, Vec<Value>)> {
        Ok(self.compile()?.into_prepared())
    }

    // ==================== pending modifiers ====================

    /// Negate the next condition. Calling twice before a condition is a
    /// no-op; the flag is a boolean, not a counter.
    pub fn not(mut self) -> Self {
        self.pending_not = true;
        self
    }

    /// Join the next condition with OR instead of AND.
    pub fn or(mut self) -> Self {
        self.pending_or = true;
        self
    }

    // ==================== structural clauses ====================

    /// Add FROM clauses for the given tables. Each table string may carry
    /// a trailing `AS alias`, split into name and alias.
    pub fn from<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for table in tables {
            let (table, alias) = split_alias(table.as_ref());
            self.clauses.push(Clause::From { table, alias });
        }
        self
    }

    /// Select the given columns. Each column string may itself carry an
    /// `AS alias`.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.statement = Statement::Select;
        for column in columns {
            let (name, alias) = split_alias(column.as_ref());
            self.clauses.push(Clause::Column { name, alias });
        }
        self
    }

    /// Select `*` (adds no column clause; the compiler renders `*` when
    /// none exist).
    pub fn select_all(mut self) -> Self {
        self.statement = Statement::Select;
        self
    }

    /// Add a raw expression to the column list, emitted verbatim.
    pub fn raw_select(mut self, expr: impl Into<String>) -> Self {
        self.clauses.push(Clause::RawColumn { expr: expr.into() });
        self
    }

    /// Add DISTINCT to the SELECT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    fn push_join(
        mut self,
        kind: JoinKind,
        table: impl AsRef<str>,
        left: impl AsRef<str>,
        op: impl Into<String>,
        right: impl AsRef<str>,
    ) -> Self {
        self.clauses.push(Clause::Join {
            kind,
            table: table.as_ref().to_string(),
            left: left.as_ref().to_string(),
            op: op.into(),
            right: right.as_ref().to_string(),
        });
        self
    }

    /// Add an INNER JOIN clause.
    pub fn inner_join(
        self,
        table: impl AsRef<str>,
        left: impl AsRef<str>,
        op: impl Into<String>,
        right: impl AsRef<str>,
    ) -> Self {
        self.push_join(JoinKind::Inner, table, left, op, right)
    }

    /// Add a LEFT JOIN clause.
    pub fn left_join(
        self,
        table: impl AsRef<str>,
        left: impl AsRef<str>,
        op: impl Into<String>,
        right: impl AsRef<str>,
    ) -> Self {
        self.push_join(JoinKind::Left, table, left, op, right)
    }

    /// Add a RIGHT JOIN clause.
    pub fn right_join(
        self,
        table: impl AsRef<str>,
        left: impl AsRef<str>,
        op: impl Into<String>,
        right: impl AsRef<str>,
    ) -> Self {
        self.push_join(JoinKind::Right, table, left, op, right)
    }

    /// Add an ORDER BY clause, ascending.
    pub fn order_by(mut self, column: impl AsRef<str>) -> Self {
        self.clauses.push(Clause::OrderBy {
            column: column.as_ref().to_string(),
            desc: false,
        });
        self
    }

    /// Add an ORDER BY clause, descending.
    pub fn order_by_desc(mut self, column: impl AsRef<str>) -> Self {
        self.clauses.push(Clause::OrderBy {
            column: column.as_ref().to_string(),
            desc: true,
        });
        self
    }

    /// Set the GROUP BY columns. Single-valued: a second call replaces the
    /// first.
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        self.replace_or_push(Clause::GroupBy { columns });
        self
    }

    /// Set the LIMIT row count. Single-valued; negative input clamps to
    /// zero at build time, and a zero limit fails later at compile time.
    pub fn limit(mut self, rows: i64) -> Self {
        self.replace_or_push(Clause::Limit {
            rows: rows.max(0),
        });
        self
    }

    /// Set the OFFSET. Single-valued; negative input clamps to zero at
    /// build time, and a zero offset fails later at compile time.
    pub fn offset(mut self, rows: i64) -> Self {
        self.replace_or_push(Clause::Offset {
            rows: rows.max(0),
        });
        self
    }

    // ==================== WHERE conditions ====================

    /// Add a comparison condition: `column op value`.
    pub fn filter(
        mut self,
        column: impl AsRef<str>,
        op: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        let predicate = Predicate::Compare {
            column: column.as_ref().to_string(),
            op: op.into(),
            value: value.into(),
        };
        self.push_condition(Section::Where, predicate);
        self
    }

    pub fn or_filter(
        self,
        column: impl AsRef<str>,
        op: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.or().filter(column, op, value)
    }

    /// Compare two columns: `left op right`. Both sides are identifiers;
    /// nothing is bound.
    pub fn filter_columns(
        mut self,
        left: impl AsRef<str>,
        op: impl Into<String>,
        right: impl AsRef<str>,
    ) -> Self {
        let predicate = Predicate::ColumnCompare {
            left: left.as_ref().to_string(),
            op: op.into(),
            right: right.as_ref().to_string(),
        };
        self.push_condition(Section::Where, predicate);
        self
    }

    pub fn or_filter_columns(
        self,
        left: impl AsRef<str>,
        op: impl Into<String>,
        right: impl AsRef<str>,
    ) -> Self {
        self.or().filter_columns(left, op, right)
    }

    /// Add a LIKE condition.
    pub fn filter_like(mut self, column: impl AsRef<str>, pattern: impl Into<String>) -> Self {
        let predicate = Predicate::Like {
            column: column.as_ref().to_string(),
            pattern: pattern.into(),
        };
        self.push_condition(Section::Where, predicate);
        self
    }

    pub fn filter_not_like(self, column: impl AsRef<str>, pattern: impl Into<String>) -> Self {
        self.not().filter_like(column, pattern)
    }

    pub fn or_filter_like(self, column: impl AsRef<str>, pattern: impl Into<String>) -> Self {
        self.or().filter_like(column, pattern)
    }

    pub fn or_filter_not_like(self, column: impl AsRef<str>, pattern: impl Into<String>) -> Self {
        self.or().not().filter_like(column, pattern)
    }

    /// Add a BETWEEN condition.
    pub fn between(
        mut self,
        column: impl AsRef<str>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        let predicate = Predicate::Between {
            column: column.as_ref().to_string(),
            from: from.into(),
            to: to.into(),
        };
        self.push_condition(Section::Where, predicate);
        self
    }

    pub fn not_between(
        self,
        column: impl AsRef<str>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        self.not().between(column, from, to)
    }

    pub fn or_between(
        self,
        column: impl AsRef<str>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        self.or().between(column, from, to)
    }

    pub fn or_not_between(
        self,
        column: impl AsRef<str>,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Self {
        self.or().not().between(column, from, to)
    }

    /// Add an IN condition over a member list.
    pub fn filter_in<I, V>(mut self, column: impl AsRef<str>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let predicate = Predicate::In {
            column: column.as_ref().to_string(),
            values: values.into_iter().map(Into::into).collect(),
        };
        self.push_condition(Section::Where, predicate);
        self
    }

    pub fn filter_not_in<I, V>(self, column: impl AsRef<str>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.not().filter_in(column, values)
    }

    pub fn or_filter_in<I, V>(self, column: impl AsRef<str>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.or().filter_in(column, values)
    }

    pub fn or_filter_not_in<I, V>(self, column: impl AsRef<str>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.or().not().filter_in(column, values)
    }

    /// Add an IN condition over a sub-query.
    pub fn filter_in_query(mut self, column: impl AsRef<str>, query: Query) -> Self {
        let predicate = Predicate::InSubquery {
            column: column.as_ref().to_string(),
            query: Box::new(query),
        };
        self.push_condition(Section::Where, predicate);
        self
    }

    pub fn filter_not_in_query(self, column: impl AsRef<str>, query: Query) -> Self {
        self.not().filter_in_query(column, query)
    }

    pub fn or_filter_in_query(self, column: impl AsRef<str>, query: Query) -> Self {
        self.or().filter_in_query(column, query)
    }

    pub fn or_filter_not_in_query(self, column: impl AsRef<str>, query: Query) -> Self {
        self.or().not().filter_in_query(column, query)
    }

    /// Add an IS NULL condition.
    pub fn filter_null(mut self, column: impl AsRef<str>) -> Self {
        let predicate = Predicate::NullCheck {
            column: column.as_ref().to_string(),
        };
        self.push_condition(Section::Where, predicate);
        self
    }

    pub fn filter_not_null(self, column: impl AsRef<str>) -> Self {
        self.not().filter_null(column)
    }

    pub fn or_filter_null(self, column: impl AsRef<str>) -> Self {
        self.or().filter_null(column)
    }

    pub fn or_filter_not_null(self, column: impl AsRef<str>) -> Self {
        self.or().not().filter_null(column)
    }

    /// Add a `column = TRUE` condition.
    pub fn filter_true(mut self, column: impl AsRef<str>) -> Self {
        let predicate = Predicate::Boolean {
            column: column.as_ref().to_string(),
            value: true,
        };
        self.push_condition(Section::Where, predicate);
        self
    }

    pub fn or_filter_true(self, column: impl AsRef<str>) -> Self {
        self.or().filter_true(column)
    }

    /// Add a `column = FALSE` condition.
    pub fn filter_false(mut self, column: impl AsRef<str>) -> Self {
        let predicate = Predicate::Boolean {
            column: column.as_ref().to_string(),
            value: false,
        };
        self.push_condition(Section::Where, predicate);
        self
    }

    pub fn or_filter_false(self, column: impl AsRef<str>) -> Self {
        self.or().filter_false(column)
    }

    /// Add an EXISTS condition over a sub-query.
    pub fn filter_exists(mut self, query: Query) -> Self {
        let predicate = Predicate::Exists {
            query: Box::new(query),
        };
        self.push_condition(Section::Where, predicate);
        self
    }

    pub fn filter_not_exists(self, query: Query) -> Self {
        self.not().filter_exists(query)
    }

    /// Add a raw condition, emitted verbatim and unescaped.
    pub fn filter_raw(mut self, expr: impl Into<String>) -> Self {
        let predicate = Predicate::Raw { expr: expr.into() };
        self.push_condition(Section::Where, predicate);
        self
    }

    // ==================== HAVING conditions ====================

    /// Add a comparison condition to the HAVING section.
    pub fn having(
        mut self,
        column: impl AsRef<str>,
        op: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        let predicate = Predicate::Compare {
            column: column.as_ref().to_string(),
            op: op.into(),
            value: value.into(),
        };
        self.push_condition(Section::Having, predicate);
        self
    }

    pub fn or_having(
        self,
        column: impl AsRef<str>,
        op: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.or().having(column, op, value)
    }

    /// Add a raw expression to the HAVING section.
    pub fn having_raw(mut self, expr: impl Into<String>) -> Self {
        let predicate = Predicate::Raw { expr: expr.into() };
        self.push_condition(Section::Having, predicate);
        self
    }

    pub fn or_having_raw(self, expr: impl Into<String>) -> Self {
        self.or().having_raw(expr)
    }

    // ==================== mutation statements ====================

    /// Build an INSERT from explicit columns and values. Replaces any
    /// prior insert payload.
    pub fn insert<C, S, V, T>(mut self, columns: C, values: V) -> Self
    where
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
        V: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.statement = Statement::Insert;
        self.clear_kind(ClauseKind::Insert);
        self.clauses.push(Clause::Insert {
            columns: columns.into_iter().map(|c| c.as_ref().to_string()).collect(),
            values: values.into_iter().map(Into::into).collect(),
            source: None,
        });
        self
    }

    /// Build an INSERT from ordered column/value pairs.
    pub fn insert_from_map<I, S, T>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<Value>,
    {
        self.statement = Statement::Insert;
        self.clear_kind(ClauseKind::Insert);
        let mut columns = Vec::new();
        let mut values = Vec::new();
        for (column, value) in pairs {
            columns.push(column.as_ref().to_string());
            values.push(value.into());
        }
        self.clauses.push(Clause::Insert {
            columns,
            values,
            source: None,
        });
        self
    }

    /// Build an INSERT whose rows come from a sub-query instead of a
    /// VALUES section.
    pub fn insert_from_query(mut self, query: Query) -> Self {
        self.statement = Statement::Insert;
        self.clear_kind(ClauseKind::Insert);
        self.clauses.push(Clause::Insert {
            columns: Vec::new(),
            values: Vec::new(),
            source: Some(Box::new(query)),
        });
        self
    }

    /// Build an UPDATE from ordered column assignments. Replaces any prior
    /// update payload.
    pub fn update<I, S, T>(mut self, assignments: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<Value>,
    {
        self.statement = Statement::Update;
        self.clear_kind(ClauseKind::Update);
        self.clauses.push(Clause::Update {
            assignments: assignments
                .into_iter()
                .map(|(c, v)| (c.as_ref().to_string(), v.into()))
                .collect(),
        });
        self
    }

    /// Build a DELETE statement.
    pub fn delete(mut self) -> Self {
        self.statement = Statement::Delete;
        self
    }

    // ==================== internals ====================

    /// Consume both pending flags and append a condition clause carrying
    /// them.
    fn push_condition(&mut self, section: Section, predicate: Predicate) {
        let negate = std::mem::take(&mut self.pending_not);
        let combinator = if std::mem::take(&mut self.pending_or) {
            Combinator::Or
        } else {
            Combinator::And
        };
        self.clauses.push(Clause::Condition {
            section,
            negate,
            combinator,
            predicate,
        });
    }

    /// Replace every clause of the same kind, or append when none exists.
    fn replace_or_push(&mut self, clause: Clause) {
        let kind = clause.kind();
        let mut replaced = false;
        for slot in self.clauses.iter_mut() {
            if slot.kind() == kind {
                *slot = clause.clone();
                replaced = true;
            }
        }
        if !replaced {
            self.clauses.push(clause);
        }
    }

    fn clear_kind(&mut self, kind: ClauseKind) {
        self.clauses.retain(|c| c.kind() != kind);
    }
}

/// Split a trailing case-insensitive `AS alias` out of a table or column
/// token.
fn split_alias(input: &str) -> (String, Option<String>) {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if let Some(pos) = tokens.iter().position(|t| t.eq_ignore_ascii_case("as")) {
        if pos > 0 && pos + 1 < tokens.len() {
            return (tokens[..pos].join(" "), Some(tokens[pos + 1..].join(" ")));
        }
    }
    (input.trim().to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_alias() {
        assert_eq!(split_alias("user"), ("user".to_string(), None));
        assert_eq!(
            split_alias("tableA as t1"),
            ("tableA".to_string(), Some("t1".to_string()))
        );
        assert_eq!(
            split_alias("telphone AS phone"),
            ("telphone".to_string(), Some("phone".to_string()))
        );
        assert_eq!(
            split_alias("  name   aS  n  "),
            ("name".to_string(), Some("n".to_string()))
        );
    }

    #[test]
    fn test_pending_flags_consumed_once() {
        let q = Query::new(Dialect::Generic)
            .from(["t"])
            .not()
            .not()
            .filter_like("name", "%a%")
            .filter_like("name", "%b%");
        let clauses = q.clauses();
        assert!(matches!(
            clauses[1],
            Clause::Condition { negate: true, .. }
        ));
        assert!(matches!(
            clauses[2],
            Clause::Condition { negate: false, .. }
        ));
    }

    #[test]
    fn test_limit_replaces_prior_limit() {
        let q = Query::new(Dialect::Generic).from(["t"]).limit(5).limit(10);
        let limits: Vec<_> = q
            .clauses()
            .iter()
            .filter(|c| c.kind() == ClauseKind::Limit)
            .collect();
        assert_eq!(limits.len(), 1);
        assert!(matches!(limits[0], Clause::Limit { rows: 10 }));
    }

    #[test]
    fn test_negative_limit_clamps_to_zero() {
        let q = Query::new(Dialect::Generic).from(["t"]).limit(-5);
        assert!(matches!(
            q.first_of(ClauseKind::Limit),
            Some(Clause::Limit { rows: 0 })
        ));
    }

    #[test]
    fn test_insert_replaces_prior_insert() {
        let q = Query::new(Dialect::Generic)
            .from(["t"])
            .insert(["a"], [1])
            .insert(["b"], [2]);
        let inserts: Vec<_> = q
            .clauses()
            .iter()
            .filter(|c| c.kind() == ClauseKind::Insert)
            .collect();
        assert_eq!(inserts.len(), 1);
    }

    #[test]
    fn test_fork_resets_pending_flags() {
        let q = Query::new(Dialect::Generic).from(["t"]).not().or();
        let forked = q.fork();
        assert!(!forked.pending_not);
        assert!(!forked.pending_or);
    }
}
