//! Windowed projections end to end: OVER clauses with partition, order,
//! and frame parts in every supported combination.

mod common;
use common::*;

use ingot_sql_core::{column, raw, BorderExpr, FrameBuilder, FrameUnit, Select};

#[test]
fn over_with_partition_only() {
    let mut query = Select::new();
    query.from("Employee").unwrap();
    query.column("E", "name").unwrap();
    query
        .over(raw("AVG(salary)"), |w| {
            w.partition_by(column("E", "dept"));
        })
        .unwrap();

    assert_eq!(
        sql(&query),
        "SELECT E.name, AVG(salary) OVER (PARTITION BY E.dept) FROM Employee AS E"
    );
}

#[test]
fn over_with_partition_order_and_frame() {
    let mut frame = FrameBuilder::new(FrameUnit::Rows);
    frame.expression(BorderExpr::unbounded_preceding()).unwrap();
    frame.expression(BorderExpr::current_row()).unwrap();
    let frame = frame.build().unwrap();

    let mut query = Select::new();
    query.from("Employee").unwrap();
    query
        .over(raw("SUM(salary)"), move |w| {
            w.partition_by(column("E", "dept"))
                .order_by(column("E", "hired_on"))
                .frame(frame);
        })
        .unwrap();

    assert_eq!(
        sql(&query),
        "SELECT SUM(salary) OVER (PARTITION BY E.dept ORDER BY E.hired_on \
         ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) FROM Employee AS E"
    );
}

#[test]
fn frame_can_be_a_bare_border() {
    let mut query = Select::new();
    query.from("Employee").unwrap();
    query
        .over(raw("SUM(salary)"), |w| {
            w.order_by(column("E", "salary"))
                .frame(BorderExpr::current_row());
        })
        .unwrap();

    assert_eq!(
        sql(&query),
        "SELECT SUM(salary) OVER (ORDER BY E.salary CURRENT ROW) FROM Employee AS E"
    );
}

#[test]
fn over_with_descending_order_key() {
    let mut query = Select::new();
    query.from("Employee").unwrap();
    query
        .over(raw("RANK()"), |w| {
            w.partition_by(column("E", "dept"))
                .order_by_desc(column("E", "salary"));
        })
        .unwrap();

    assert_eq!(
        sql(&query),
        "SELECT RANK() OVER (PARTITION BY E.dept ORDER BY E.salary DESC) FROM Employee AS E"
    );
}

#[test]
fn over_with_empty_window() {
    let mut query = Select::new();
    query.from("Employee").unwrap();
    query.over(raw("ROW_NUMBER()"), |_| {}).unwrap();

    assert_eq!(
        sql(&query),
        "SELECT ROW_NUMBER() OVER () FROM Employee AS E"
    );
}

#[test]
fn frame_with_groups_unit() {
    let mut frame = FrameBuilder::new(FrameUnit::Groups);
    frame.expression(BorderExpr::preceding(3)).unwrap();
    let frame = frame.build().unwrap();

    let mut query = Select::new();
    query.from("Employee").unwrap();
    query
        .over(raw("SUM(salary)"), move |w| {
            w.order_by(column("E", "grade")).frame(frame);
        })
        .unwrap();

    assert_eq!(
        sql(&query),
        "SELECT SUM(salary) OVER (ORDER BY E.grade GROUPS 3 PRECEDING) FROM Employee AS E"
    );
}
