//! Dialect-bound query factory.

use crate::compiler::Dialect;
use crate::query::Query;

/// Mints [`Query`] values bound to one dialect.
///
/// The dialect is chosen here once and fixed for every query the builder
/// creates; it decides identifier quoting and the bind symbol shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builder {
    dialect: Dialect,
}

impl Builder {
    /// Create a builder for the given dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// The dialect this builder is bound to.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Create a query pre-seeded with a FROM target. The table string may
    /// carry an `AS alias`.
    pub fn query(&self, table: impl AsRef<str>) -> Query {
        Query::new(self.dialect).from([table])
    }
}
