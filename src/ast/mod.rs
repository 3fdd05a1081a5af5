pub mod clause;
pub mod operators;
pub mod values;

pub use self::clause::{Clause, ClauseKind, Predicate};
pub use self::operators::{Combinator, JoinKind, Section, Statement};
pub use self::values::Value;
