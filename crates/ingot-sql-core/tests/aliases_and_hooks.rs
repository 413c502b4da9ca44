//! Alias registry behavior through the builder surface, hook firing
//! rules, and clone semantics.

mod common;
use common::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ingot_sql_core::{
    col, BuildError, CompileOptions, Position, Select, StandardCompiler, StatementKind, Update,
};

#[test]
fn aliases_are_idempotent() {
    let mut query = Select::new();
    let first = query.alias("Person").unwrap();
    let second = query.alias("Person").unwrap();
    assert_eq!(first, "P");
    assert_eq!(first, second);
}

#[test]
fn collisions_get_numeric_suffixes() {
    let mut query = Select::new();
    assert_eq!(query.alias("Person").unwrap(), "P");
    assert_eq!(query.alias("Post").unwrap(), "P1");
    assert_eq!(query.alias_of::<Policy>().unwrap(), "P2");
}

#[test]
fn alias_uniqueness_ignores_case() {
    let mut query = Select::new();
    query.alias_as("Person", "p").unwrap();
    assert_eq!(query.alias("Post").unwrap(), "P1");
}

#[test]
fn forced_alias_conflicts_are_rejected() {
    let mut query = Select::new();
    query.alias_as("Person", "author").unwrap();
    // Repeating the same pair is a no-op.
    query.alias_as("Person", "author").unwrap();

    let realias = query.alias_as("Person", "writer").unwrap_err();
    assert!(matches!(realias, BuildError::InvalidArgument(_)));

    let taken = query.alias_as("Post", "author").unwrap_err();
    assert!(matches!(taken, BuildError::InvalidArgument(_)));
}

#[test]
fn alias_into_resolves_mid_chain() {
    let mut alias = String::new();
    let mut query = Select::new();
    query
        .from("Person")
        .unwrap()
        .alias_into("Person", &mut alias)
        .unwrap();
    assert_eq!(alias, "P");
}

#[test]
fn subject_is_the_first_registration() {
    let update = Update::new("Person").unwrap();
    assert_eq!(update.aliases().subject(), Some("Person"));
    assert_eq!(update.aliases().subject_alias(), Some("P"));
}

#[test]
fn added_hooks_observe_every_filing() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    let mut query = Select::new();
    query.on_expression_added(move |event| {
        log.lock().unwrap().push(event.position);
        Ok(())
    });
    query.from("Person").unwrap();
    query.column("P", "name").unwrap();
    query
        .where_clause(|w| {
            w.and(col("id").eq(1_i64));
        })
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        [Position::From, Position::Columns, Position::Where]
    );
}

#[test]
fn scoped_hooks_fire_before_global_ones() {
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut query = Select::new();
    let log = Arc::clone(&order);
    query.on_expression_added(move |_| {
        log.lock().unwrap().push("global");
        Ok(())
    });
    let log = Arc::clone(&order);
    query.on_expression_added_at(Position::Columns, move |_| {
        log.lock().unwrap().push("columns");
        Ok(())
    });

    query.from("Person").unwrap();
    query.column("P", "name").unwrap();

    assert_eq!(*order.lock().unwrap(), ["global", "columns", "global"]);
}

#[test]
fn hook_errors_abort_the_filing_call() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);

    let mut query = Select::new();
    query.on_expression_added_at(Position::Where, |_| {
        Err(BuildError::InvalidArgument(String::from(
            "filters are closed",
        )))
    });
    query.on_expression_added(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    query.from("Person").unwrap();
    let err = query
        .where_clause(|w| {
            w.and(col("id").eq(1_i64));
        })
        .unwrap_err();

    assert!(matches!(err, BuildError::InvalidArgument(_)));
    // The scoped failure skips the global hook for that event.
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn compiling_hooks_see_the_pass() {
    let seen = Arc::new(Mutex::new(None));
    let log = Arc::clone(&seen);

    let mut query = Select::new();
    query.from("Person").unwrap();
    query.on_compiling(move |event| {
        *log.lock().unwrap() = Some((event.kind, event.options.terminate, event.positions.len()));
        Ok(())
    });

    let rendered = query
        .build(&StandardCompiler::new(), CompileOptions::new().terminated(true))
        .unwrap();
    assert_eq!(rendered, "SELECT * FROM Person AS P;");
    assert_eq!(
        *seen.lock().unwrap(),
        Some((StatementKind::Select, true, 1))
    );
}

#[test]
fn compiling_hook_errors_abort_the_build() {
    let mut query = Select::new();
    query.from("Person").unwrap();
    query.on_compiling(|_| Err(BuildError::InvalidArgument(String::from("frozen"))));

    let err = query
        .build(&StandardCompiler::new(), CompileOptions::new())
        .unwrap_err();
    assert!(matches!(err, BuildError::InvalidArgument(_)));
}

#[test]
fn clones_share_hooks_and_filed_nodes() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);

    let mut original = Select::new();
    original.on_expression_added(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    original.from("Person").unwrap();

    let mut fork = original.clone();
    fork.column("P", "name").unwrap();
    original.column("P", "age").unwrap();

    // Both copies fire the same registered callback.
    assert_eq!(count.load(Ordering::SeqCst), 3);

    // Nodes filed before the clone are shared, not duplicated.
    let original_from = &original.positions().get(Position::From)[0].expr;
    let fork_from = &fork.positions().get(Position::From)[0].expr;
    assert!(Arc::ptr_eq(original_from, fork_from));

    // Filings after the clone stay private to each copy.
    assert_eq!(sql(&original), "SELECT P.age FROM Person AS P");
    assert_eq!(sql(&fork), "SELECT P.name FROM Person AS P");
}
