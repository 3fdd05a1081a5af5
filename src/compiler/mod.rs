//! SQL compiler for the clause model.
//!
//! Renders a query's sections in fixed order, dispatching each condition
//! to its rule and recursing into embedded sub-queries. One compile pass
//! owns one live binder shared by every sub-query it recurses into;
//! compiling the same query twice yields two fully independent results.

pub mod conditions;
pub mod dialect;
pub mod result;

#[cfg(test)]
mod tests;

pub use dialect::{BindStyle, Dialect, DialectStyle};
pub use result::{Binder, CompiledSql};

use crate::ast::{Clause, ClauseKind, Section, Statement};
use crate::error::{SqlError, SqlResult};
use crate::query::Query;

/// Sub-query recursion cap, guarding against pathologically deep
/// EXISTS/IN-subquery chains.
pub const MAX_SUBQUERY_DEPTH: usize = 32;

/// Renders queries for one dialect. Stateless between compile passes.
#[derive(Debug, Clone, Copy)]
pub struct Compiler {
    style: DialectStyle,
}

impl Compiler {
    /// A compiler for one of the built-in dialects.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            style: dialect.style(),
        }
    }

    /// A compiler for an explicit style descriptor. This is how the Named
    /// bind style, unused by the built-in dialects, is reached.
    pub fn with_style(style: DialectStyle) -> Self {
        Self { style }
    }

    /// Compile a query into a fresh result with its own binder.
    pub fn compile(&self, query: &Query) -> SqlResult<CompiledSql> {
        let mut binder = Binder::new(self.style.bind, self.style.prefix);
        let sql = self.compile_statement(query, &mut binder, 0)?;
        Ok(CompiledSql::new(sql, binder))
    }

    fn compile_statement(
        &self,
        query: &Query,
        binder: &mut Binder,
        depth: usize,
    ) -> SqlResult<String> {
        if depth > MAX_SUBQUERY_DEPTH {
            return Err(SqlError::TooDeep(MAX_SUBQUERY_DEPTH));
        }
        match query.statement() {
            Statement::Select => self.compile_select(query, binder, depth),
            Statement::Insert => self.compile_insert(query, binder, depth),
            Statement::Update => self.compile_update(query, binder, depth),
            Statement::Delete => self.compile_delete(query, binder, depth),
        }
    }

    /// Compile an embedded sub-query through the enclosing pass's binder,
    /// so its operands stay parameterized and never re-enter the skeleton
    /// as text.
    pub(crate) fn subquery_sql(
        &self,
        query: &Query,
        binder: &mut Binder,
        depth: usize,
    ) -> SqlResult<String> {
        self.compile_statement(query, binder, depth + 1)
    }

    pub(crate) fn quote(&self, ident: &str) -> String {
        self.style.quote(ident)
    }

    fn compile_select(
        &self,
        query: &Query,
        binder: &mut Binder,
        depth: usize,
    ) -> SqlResult<String> {
        let mut sections = vec!["SELECT".to_string()];
        if query.is_distinct() {
            sections.push("DISTINCT".to_string());
        }
        sections.push(self.compile_columns(query));
        sections.push(self.compile_from(query, "compile_select")?);
        push_nonempty(&mut sections, self.compile_joins(query));
        push_nonempty(
            &mut sections,
            self.compile_conditions(query, Section::Where, binder, depth)?,
        );
        push_nonempty(&mut sections, self.compile_group_by(query));
        push_nonempty(
            &mut sections,
            self.compile_conditions(query, Section::Having, binder, depth)?,
        );
        push_nonempty(&mut sections, self.compile_order_by(query));
        push_nonempty(&mut sections, self.compile_limit(query)?);
        push_nonempty(&mut sections, self.compile_offset(query)?);
        Ok(sections.join(" "))
    }

    /// Concatenate column clauses in append order; no column clause at all
    /// renders `*`.
    fn compile_columns(&self, query: &Query) -> String {
        let mut cols = Vec::new();
        for clause in query.clauses() {
            match clause {
                Clause::Column { name, alias } => match alias {
                    Some(alias) => {
                        cols.push(format!("{} AS {}", self.quote(name), self.quote(alias)))
                    }
                    None => cols.push(self.quote(name)),
                },
                Clause::RawColumn { expr } => cols.push(expr.clone()),
                _ => {}
            }
        }
        if cols.is_empty() {
            "*".to_string()
        } else {
            cols.join(",")
        }
    }

    fn compile_from(&self, query: &Query, step: &'static str) -> SqlResult<String> {
        let mut tables = Vec::new();
        for clause in query.clauses() {
            if let Clause::From { table, alias } = clause {
                match alias {
                    Some(alias) => {
                        tables.push(format!("{} AS {}", self.quote(table), self.quote(alias)))
                    }
                    None => tables.push(self.quote(table)),
                }
            }
        }
        if tables.is_empty() {
            return Err(SqlError::missing_table(step));
        }
        Ok(format!("FROM {}", tables.join(",")))
    }

    fn compile_joins(&self, query: &Query) -> String {
        let mut joins = Vec::new();
        for clause in query.clauses() {
            if let Clause::Join {
                kind,
                table,
                left,
                op,
                right,
            } = clause
            {
                joins.push(format!(
                    "{} {} ON {} {} {}",
                    kind.keyword(),
                    self.quote(table),
                    self.quote(left),
                    op,
                    self.quote(right),
                ));
            }
        }
        joins.join(" ")
    }

    /// Render one condition section. The first condition never emits its
    /// combinator; every later one is preceded by AND or OR.
    fn compile_conditions(
        &self,
        query: &Query,
        section: Section,
        binder: &mut Binder,
        depth: usize,
    ) -> SqlResult<String> {
        let mut fragments = Vec::new();
        for clause in query.clauses() {
            let Clause::Condition {
                section: clause_section,
                negate,
                combinator,
                predicate,
            } = clause
            else {
                continue;
            };
            if *clause_section != section {
                continue;
            }
            if fragments.is_empty() {
                fragments.push(
                    match section {
                        Section::Where => "WHERE",
                        Section::Having => "HAVING",
                    }
                    .to_string(),
                );
            } else {
                fragments.push(combinator.keyword().to_string());
            }
            fragments.push(self.render_predicate(predicate, *negate, binder, depth)?);
        }
        Ok(fragments.join(" "))
    }

    fn compile_group_by(&self, query: &Query) -> String {
        let Some(Clause::GroupBy { columns }) = query.first_of(ClauseKind::GroupBy) else {
            return String::new();
        };
        let cols: Vec<String> = columns.iter().map(|c| self.quote(c)).collect();
        format!("GROUP BY {}", cols.join(","))
    }

    fn compile_order_by(&self, query: &Query) -> String {
        let mut cols = Vec::new();
        for clause in query.clauses() {
            if let Clause::OrderBy { column, desc } = clause {
                let direction = if *desc { "DESC" } else { "ASC" };
                cols.push(format!("{} {}", self.quote(column), direction));
            }
        }
        if cols.is_empty() {
            String::new()
        } else {
            format!("ORDER BY {}", cols.join(","))
        }
    }

    fn compile_limit(&self, query: &Query) -> SqlResult<String> {
        let Some(Clause::Limit { rows }) = query.first_of(ClauseKind::Limit) else {
            return Ok(String::new());
        };
        if *rows <= 0 {
            return Err(SqlError::range("compile_limit", "row count", *rows));
        }
        Ok(format!("LIMIT {}", rows))
    }

    fn compile_offset(&self, query: &Query) -> SqlResult<String> {
        let Some(Clause::Offset { rows }) = query.first_of(ClauseKind::Offset) else {
            return Ok(String::new());
        };
        if *rows <= 0 {
            return Err(SqlError::range("compile_offset", "offset", *rows));
        }
        Ok(format!("OFFSET {}", rows))
    }

    fn compile_insert(
        &self,
        query: &Query,
        binder: &mut Binder,
        depth: usize,
    ) -> SqlResult<String> {
        let table = self.target_table(query, "compile_insert")?;
        let Some(Clause::Insert {
            columns,
            values,
            source,
        }) = query.first_of(ClauseKind::Insert)
        else {
            return Err(SqlError::missing_clause("compile_insert", "insert"));
        };

        let mut sections = vec![format!("INSERT INTO {}", table)];

        // INSERT ... SELECT: the source query replaces the VALUES section.
        if let Some(source) = source {
            sections.push(self.subquery_sql(source, binder, depth)?);
            return Ok(sections.join(" "));
        }

        if !columns.is_empty() {
            let cols: Vec<String> = columns.iter().map(|c| self.quote(c)).collect();
            sections.push(format!("({})", cols.join(",")));
        }
        sections.push("VALUES".to_string());
        let symbols: Vec<String> = values.iter().map(|v| binder.bind(v.clone())).collect();
        sections.push(format!("({})", symbols.join(",")));
        Ok(sections.join(" "))
    }

    fn compile_update(
        &self,
        query: &Query,
        binder: &mut Binder,
        depth: usize,
    ) -> SqlResult<String> {
        let table = self.target_table(query, "compile_update")?;
        let Some(Clause::Update { assignments }) = query.first_of(ClauseKind::Update) else {
            return Err(SqlError::missing_clause("compile_update", "update"));
        };

        let pairs: Vec<String> = assignments
            .iter()
            .map(|(column, value)| format!("{}={}", self.quote(column), binder.bind(value.clone())))
            .collect();

        let mut sections = vec![format!("UPDATE {} SET {}", table, pairs.join(","))];
        push_nonempty(
            &mut sections,
            self.compile_conditions(query, Section::Where, binder, depth)?,
        );
        Ok(sections.join(" "))
    }

    fn compile_delete(
        &self,
        query: &Query,
        binder: &mut Binder,
        depth: usize,
    ) -> SqlResult<String> {
        let table = self.target_table(query, "compile_delete")?;
        let mut sections = vec![format!("DELETE FROM {}", table)];
        push_nonempty(
            &mut sections,
            self.compile_conditions(query, Section::Where, binder, depth)?,
        );
        Ok(sections.join(" "))
    }

    /// The first FROM clause names the target table of INSERT/UPDATE/DELETE.
    fn target_table(&self, query: &Query, step: &'static str) -> SqlResult<String> {
        match query.first_of(ClauseKind::From) {
            Some(Clause::From { table, .. }) => Ok(self.quote(table)),
            _ => Err(SqlError::missing_table(step)),
        }
    }
}

fn push_nonempty(sections: &mut Vec<String>, fragment: String) {
    if !fragment.is_empty() {
        sections.push(fragment);
    }
}
