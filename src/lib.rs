//! # sqlbind — fluent, dialect-aware SQL construction
//!
//! Assemble a relational query as an ordered sequence of typed clauses,
//! then render it for a target dialect: either fully literal-substituted
//! text, or a parameterized skeleton plus an ordered value list.
//!
//! ## Quick example
//!
//! ```
//! use sqlbind::{Builder, Dialect};
//!
//! let builder = Builder::new(Dialect::Postgres);
//! let (sql, values) = builder
//!     .query("user")
//!     .select(["id", "name"])
//!     .filter("age", ">=", 18)
//!     .filter_in("role", ["admin", "editor"])
//!     .to_prepared()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT \"id\",\"name\" FROM \"user\" WHERE \"age\" >= $1 AND \"role\" IN ($2,$3)"
//! );
//! assert_eq!(values.len(), 3);
//! ```
//!
//! The library only emits SQL. Issuing the compiled statement against a
//! live connection is the job of whatever driver the caller pairs it with.

pub mod ast;
pub mod builder;
pub mod compiler;
pub mod error;
pub mod query;

pub use builder::Builder;
pub use compiler::{BindStyle, CompiledSql, Compiler, Dialect, DialectStyle};
pub use error::{SqlError, SqlResult};
pub use query::Query;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::builder::Builder;
    pub use crate::compiler::{BindStyle, CompiledSql, Compiler, Dialect, DialectStyle};
    pub use crate::error::{SqlError, SqlResult};
    pub use crate::query::Query;
}
