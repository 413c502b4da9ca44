//! End-to-end INSERT, UPDATE, and DELETE coverage, including the
//! record-driven placeholder paths and position validation.

mod common;
use common::*;

use ingot_sql_core::expr::compose::AssignExpr;
use ingot_sql_core::{
    bind, col, column, lit, raw, BuildError, Delete, Expr, Insert, JoinKind, Parameters, Position,
    SqlValue, StatementKind, Update,
};

#[test]
fn insert_entity_row() {
    let mut insert = Insert::for_entity::<Person>().unwrap();
    insert.columns_of::<Person>(&["id"]).unwrap();
    insert.values([lit("Ada"), lit(36_i64)]).unwrap();
    assert_eq!(
        sql(&insert),
        "INSERT INTO Person (name, age) VALUES ('Ada', 36)"
    );
}

#[test]
fn insert_multiple_rows() {
    let mut insert = Insert::new("Person").unwrap();
    insert.columns(&["name"]).unwrap();
    insert.values([lit("Ada")]).unwrap();
    insert.values([lit("Grace")]).unwrap();
    assert_eq!(
        sql(&insert),
        "INSERT INTO Person (name) VALUES ('Ada'), ('Grace')"
    );
}

#[test]
fn insert_values_using_binds_parameters() {
    let person = Person {
        id: 9,
        name: String::from("Ada"),
        age: 36,
    };
    let mut params = Parameters::new();

    let mut insert = Insert::for_entity::<Person>().unwrap();
    insert.columns_of::<Person>(&["id"]).unwrap();
    insert.values_using(&person, &mut params, &["id"]).unwrap();

    assert_eq!(
        sql(&insert),
        "INSERT INTO Person (name, age) VALUES (:name, :age)"
    );
    assert_eq!(
        params.get("name"),
        Some(&SqlValue::Text(String::from("Ada")))
    );
    assert_eq!(params.get("age"), Some(&SqlValue::Int(36)));
    assert_eq!(params.len(), 2);
}

#[test]
fn insert_placeholder_rows_with_suffixes() {
    let mut insert = Insert::for_entity::<Person>().unwrap();
    insert.columns_of::<Person>(&["id"]).unwrap();
    insert.parameters_from::<Person>("_1", &["id"]).unwrap();
    insert.parameters_from::<Person>("_2", &["id"]).unwrap();
    assert_eq!(
        sql(&insert),
        "INSERT INTO Person (name, age) VALUES (:name_1, :age_1), (:name_2, :age_2)"
    );
}

#[test]
fn insert_rejects_empty_row() {
    let mut insert = Insert::new("Person").unwrap();
    let err = insert.values(Vec::<i64>::new()).unwrap_err();
    assert!(matches!(err, BuildError::InvalidArgument(_)));
}

#[test]
fn insert_rejects_where_clause() {
    let mut insert = Insert::new("Person").unwrap();
    let err = insert
        .where_clause(|w| {
            w.and(col("id").eq(1_i64));
        })
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::UnsupportedPosition {
            kind: StatementKind::Insert,
            position: Position::Where,
        }
    ));
}

#[test]
fn insert_rejects_joins() {
    let mut insert = Insert::new("Person").unwrap();
    let err = insert.join(JoinKind::Inner).unwrap_err();
    assert!(matches!(
        err,
        BuildError::UnsupportedPosition {
            kind: StatementKind::Insert,
            position: Position::Join,
        }
    ));
}

#[test]
fn update_with_raw_assignment() {
    let mut update = Update::for_entity::<Person>().unwrap();
    update
        .set_expr(Expr::new(AssignExpr::new(
            col("age").into_ref(),
            raw("age + 1").into_ref(),
        )))
        .unwrap();
    assert_eq!(sql(&update), "UPDATE Person AS P SET age = age + 1");
}

#[test]
fn update_set_from_joined_table() {
    let mut update = Update::for_entity::<Person>().unwrap();
    update
        .join(JoinKind::Inner)
        .unwrap()
        .table("PersonStaging")
        .unwrap()
        .on(|on| {
            on.and(column("P", "id").eq(column("P1", "id")));
        })
        .unwrap();
    update.set_from::<Person>("P1", &["id"]).unwrap();
    assert_eq!(
        sql(&update),
        "UPDATE Person AS P INNER JOIN PersonStaging AS P1 ON P.id = P1.id \
         SET name = P1.name, age = P1.age"
    );
}

#[test]
fn update_set_using_binds_parameters() {
    let person = Person {
        id: 9,
        name: String::from("Ada"),
        age: 37,
    };
    let mut params = Parameters::new();

    let mut update = Update::for_entity::<Person>().unwrap();
    update.set_using(&person, &mut params, &["id"]).unwrap();
    update
        .where_clause(|w| {
            w.and(col("id").eq(bind("id")));
        })
        .unwrap();
    params.set("id", person.id);

    assert_eq!(
        sql(&update),
        "UPDATE Person AS P SET name = :name, age = :age WHERE id = :id"
    );
    let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["name", "age", "id"]);
}

#[test]
fn delete_with_join_renders_subject_alias() {
    let mut delete = Delete::for_entity::<Person>().unwrap();
    delete
        .join(JoinKind::Inner)
        .unwrap()
        .entity::<Post>()
        .unwrap()
        .on(|on| {
            on.and(column("P", "id").eq(column("P1", "author_id")));
        })
        .unwrap();
    delete
        .where_clause(|w| {
            w.and(column("P1", "flagged").eq(true));
        })
        .unwrap();
    assert_eq!(
        sql(&delete),
        "DELETE FROM Person AS P INNER JOIN Post AS P1 ON P.id = P1.author_id \
         WHERE P1.flagged = TRUE"
    );
}

#[test]
fn delete_rejects_foreign_positions() {
    let mut delete = Delete::new("Person").unwrap();
    let err = delete
        .expression(col("age"), Position::GroupBy, 0)
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::UnsupportedPosition {
            kind: StatementKind::Delete,
            position: Position::GroupBy,
        }
    ));
}

#[test]
fn incomplete_join_is_rejected() {
    let mut query = Update::new("Person").unwrap();
    let err = query
        .join(JoinKind::Left)
        .unwrap()
        .table("Post")
        .unwrap()
        .finish()
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::MissingOnCondition {
            kind: JoinKind::Left
        }
    ));
}

#[test]
fn join_without_target_is_rejected() {
    let mut query = Delete::new("Person").unwrap();
    let err = query.join(JoinKind::Inner).unwrap().finish().unwrap_err();
    assert!(matches!(err, BuildError::InvalidArgument(_)));
}
