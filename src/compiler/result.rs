//! Parameter binder and compile result.

use crate::ast::Value;
use crate::compiler::dialect::BindStyle;
use crate::error::{SqlError, SqlResult};

/// Accumulates bound values for one compile pass.
///
/// The Nth bind call within a pass always receives the Nth symbol, so a
/// pass is deterministic and replayable. A binder is never reused across
/// passes; sub-queries compiled within a pass bind through the same
/// binder as the enclosing statement.
#[derive(Debug, Clone)]
pub struct Binder {
    style: BindStyle,
    prefix: char,
    values: Vec<Value>,
}

impl Binder {
    pub fn new(style: BindStyle, prefix: char) -> Self {
        Self {
            style,
            prefix,
            values: Vec::new(),
        }
    }

    /// Record a value and return the bind symbol that references it.
    pub fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        self.symbol(self.values.len() - 1)
    }

    /// The symbol assigned to the `index`-th bound value (0-based).
    fn symbol(&self, index: usize) -> String {
        match self.style {
            BindStyle::Anonymous => self.prefix.to_string(),
            BindStyle::Numbered => format!("{}{}", self.prefix, index + 1),
            BindStyle::Named => format!("{}param{}", self.prefix, index),
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The outcome of one compile pass: a SQL skeleton with embedded bind
/// symbols plus the binder that assigned them.
#[derive(Debug, Clone)]
pub struct CompiledSql {
    sql: String,
    binder: Binder,
    text: Option<String>,
}

impl CompiledSql {
    pub(crate) fn new(sql: String, binder: Binder) -> Self {
        Self {
            sql,
            binder,
            text: None,
        }
    }

    /// The prepared rendering: skeleton SQL plus ordered bind values.
    /// Never fails.
    pub fn as_prepared(&self) -> (&str, &[Value]) {
        (&self.sql, self.binder.values())
    }

    /// Consume the result, yielding owned skeleton SQL and values.
    pub fn into_prepared(self) -> (String, Vec<Value>) {
        (self.sql, self.binder.values)
    }

    /// The literal rendering: every bind symbol substituted, in
    /// first-occurrence order, with the textual form of its value.
    ///
    /// Memoized on first success; later calls return the cached string
    /// without re-substituting. Fails with [`SqlError::Unconvertible`] when
    /// a bound value has no literal form (the prepared rendering is
    /// unaffected by such values).
    pub fn to_text(&mut self) -> SqlResult<String> {
        if let Some(cached) = &self.text {
            return Ok(cached.clone());
        }

        let mut out = String::with_capacity(self.sql.len());
        // Walk left to right so an already-substituted literal is never
        // re-matched and `$1` cannot clobber the prefix of `$10`.
        let mut rest = self.sql.as_str();
        for (i, value) in self.binder.values.iter().enumerate() {
            let symbol = self.binder.symbol(i);
            let literal = value
                .literal()
                .ok_or_else(|| SqlError::Unconvertible {
                    value: value.clone(),
                })?;
            let pos = rest.find(&symbol).ok_or_else(|| {
                SqlError::internal("to_text", format!("bind symbol {symbol} not in skeleton"))
            })?;
            out.push_str(&rest[..pos]);
            out.push_str(&literal);
            rest = &rest[pos + symbol.len()..];
        }
        out.push_str(rest);

        self.text = Some(out.clone());
        Ok(out)
    }
}
