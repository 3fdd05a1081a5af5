//! Dialect quoting and bind-style tests.

use crate::ast::Value;
use crate::compiler::{BindStyle, Compiler, Dialect, DialectStyle};
use crate::query::Query;

#[test]
fn test_every_dialect_quotes_the_table() {
    let cases = [
        (Dialect::Generic, "SELECT * FROM \"user\""),
        (Dialect::Sqlite, "SELECT * FROM \"user\""),
        (Dialect::Mysql, "SELECT * FROM `user`"),
        (Dialect::Postgres, "SELECT * FROM \"user\""),
    ];
    for (dialect, expected) in cases {
        let mut compiled = Query::new(dialect).from(["user"]).compile().unwrap();
        let (_, values) = compiled.as_prepared();
        assert!(values.is_empty());
        assert_eq!(compiled.to_text().unwrap(), expected, "{dialect:?}");
    }
}

#[test]
fn test_mysql_anonymous_placeholders() {
    let (sql, values) = Query::new(Dialect::Mysql)
        .from(["user"])
        .filter("a", "=", 1)
        .filter("b", "=", 2)
        .to_prepared()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM `user` WHERE `a` = ? AND `b` = ?");
    assert_eq!(values, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_postgres_numbered_placeholders() {
    let (sql, values) = Query::new(Dialect::Postgres)
        .from(["user"])
        .filter("a", "=", 1)
        .filter_in("id", [7, 8])
        .to_prepared()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM \"user\" WHERE \"a\" = $1 AND \"id\" IN ($2,$3)"
    );
    assert_eq!(values, vec![Value::Int(1), Value::Int(7), Value::Int(8)]);
}

#[test]
fn test_named_style_via_explicit_descriptor() {
    let style = DialectStyle {
        quotes: ('"', '"'),
        bind: BindStyle::Named,
        prefix: '@',
    };
    let query = Query::new(Dialect::Generic)
        .from(["user"])
        .filter("a", "=", 1)
        .filter("b", "=", 2);
    let mut compiled = Compiler::with_style(style).compile(&query).unwrap();
    let (sql, _) = compiled.as_prepared();
    assert_eq!(
        sql,
        "SELECT * FROM \"user\" WHERE \"a\" = @param0 AND \"b\" = @param1"
    );
    assert_eq!(
        compiled.to_text().unwrap(),
        "SELECT * FROM \"user\" WHERE \"a\" = 1 AND \"b\" = 2"
    );
}

#[test]
fn test_subquery_numbering_continues_the_pass() {
    let sub = Query::new(Dialect::Postgres)
        .from(["banned"])
        .select(["user_id"])
        .filter("reason", "=", "spam");
    let query = Query::new(Dialect::Postgres)
        .from(["user"])
        .filter("age", ">", 18)
        .filter_in_query("id", sub);

    // Sub-query operands bind through the enclosing pass, so numbering
    // runs straight through and the value list covers both levels.
    let expected = "SELECT * FROM \"user\" WHERE \"age\" > $1 AND \"id\" IN \
                    (SELECT \"user_id\" FROM \"banned\" WHERE \"reason\" = $2)";

    // Two independent compile passes yield identical results.
    for _ in 0..2 {
        let (sql, values) = query.to_prepared().unwrap();
        assert_eq!(sql, expected);
        assert_eq!(
            values,
            vec![Value::Int(18), Value::Text("spam".to_string())]
        );
    }
}
