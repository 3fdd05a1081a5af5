//! Integration tests over the public builder surface.

use pretty_assertions::assert_eq;
use sqlbind::prelude::*;

#[test]
fn select_star_compiles_for_every_dialect() {
    for (dialect, quoted) in [
        (Dialect::Generic, "\"event\""),
        (Dialect::Sqlite, "\"event\""),
        (Dialect::Mysql, "`event`"),
        (Dialect::Postgres, "\"event\""),
    ] {
        let builder = Builder::new(dialect);
        let (sql, values) = builder.query("event").to_prepared().unwrap();
        assert!(sql.contains(quoted), "{dialect:?}: {sql}");
        assert_eq!(values.len(), 0);
    }
}

#[test]
fn prepared_values_keep_call_order() {
    let builder = Builder::new(Dialect::Generic);
    let (sql, values) = builder
        .query("t")
        .filter("a", "=", 1)
        .filter("b", "=", 2)
        .to_prepared()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM \"t\" WHERE \"a\" = ? AND \"b\" = ?");
    assert_eq!(values, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn literal_substitution_follows_first_occurrence_order() {
    // With anonymous placeholders both symbols look identical; substitution
    // must still fill them in bind order, never swapped.
    let builder = Builder::new(Dialect::Generic);
    let sql = builder
        .query("t")
        .filter("a", "=", 1)
        .filter("b", "=", 2)
        .to_text()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM \"t\" WHERE \"a\" = 1 AND \"b\" = 2");
}

#[test]
fn to_text_is_idempotent_on_one_result() {
    let builder = Builder::new(Dialect::Postgres);
    let mut compiled = builder
        .query("t")
        .filter("name", "=", "zhang")
        .compile()
        .unwrap();
    let first = compiled.to_text().unwrap();
    let second = compiled.to_text().unwrap();
    assert_eq!(first, second);
    assert_eq!(second, "SELECT * FROM \"t\" WHERE \"name\" = 'zhang'");
}

#[test]
fn first_condition_suppresses_its_combinator() {
    let builder = Builder::new(Dialect::Generic);
    let sql = builder
        .query("t")
        .or()
        .filter("a", "=", 1)
        .or_filter("b", "=", 2)
        .filter("c", "=", 3)
        .to_text()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM \"t\" WHERE \"a\" = 1 OR \"b\" = 2 AND \"c\" = 3"
    );
}

#[test]
fn limit_and_offset_range_rules() {
    let builder = Builder::new(Dialect::Generic);

    assert!(builder.query("t").limit(0).to_text().is_err());
    assert!(builder.query("t").limit(-5).to_text().is_err());
    assert!(builder.query("t").offset(0).to_text().is_err());

    let sql = builder.query("t").limit(10).to_text().unwrap();
    assert_eq!(sql, "SELECT * FROM \"t\" LIMIT 10");
    let sql = builder.query("t").offset(5).to_text().unwrap();
    assert_eq!(sql, "SELECT * FROM \"t\" OFFSET 5");
}

#[test]
fn where_in_binds_every_member() {
    let builder = Builder::new(Dialect::Generic);
    let (sql, values) = builder
        .query("t")
        .filter_in("id", [1, 2, 3])
        .to_prepared()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM \"t\" WHERE \"id\" IN (?,?,?)");
    assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

    let sql = builder
        .query("t")
        .filter_not_in("id", [1, 2, 3])
        .to_text()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM \"t\" WHERE \"id\" NOT IN (1,2,3)");
}

#[test]
fn independent_compiles_share_no_state() {
    let builder = Builder::new(Dialect::Postgres);
    let sub = builder.query("audit").filter("level", "=", "error");
    let query = builder
        .query("user")
        .filter("active", "=", true)
        .filter_exists(sub);

    let first = query.to_prepared().unwrap();
    let second = query.to_prepared().unwrap();
    assert_eq!(first, second);
    // The sub-query binds through the same pass, so numbering runs
    // straight through and its operand sits in the shared value list.
    assert_eq!(
        first.1,
        vec![Value::Bool(true), Value::Text("error".to_string())]
    );
    assert!(first.0.contains("\"level\" = $2"));
}

#[test]
fn mutating_a_fork_leaves_the_original_alone() {
    let builder = Builder::new(Dialect::Generic);
    let original = builder.query("t").filter("a", "=", 1);
    let before = original.to_text().unwrap();

    let _mutated = original.fork().filter("b", "=", 2).delete();

    assert_eq!(original.to_text().unwrap(), before);
}

#[test]
fn queries_round_trip_through_serde() {
    let builder = Builder::new(Dialect::Mysql);
    let query = builder
        .query("user")
        .select(["id", "name as n"])
        .filter("age", ">", 21)
        .order_by_desc("id")
        .limit(3);

    let json = serde_json::to_string(&query).unwrap();
    let restored: Query = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, query);
    assert_eq!(restored.to_text().unwrap(), query.to_text().unwrap());
}
