#![allow(dead_code)]

use ingot_sql_core::{CompileOptions, StandardCompiler, StatementBuilder};
use ingot_sql_derive::Entity;

/// Compiles a statement with the standard compiler, panicking with
/// context on failure.
pub fn sql(builder: &StatementBuilder) -> String {
    builder
        .build(&StandardCompiler::new(), CompileOptions::new())
        .unwrap_or_else(|e| panic!("Failed to compile {} statement: {e}", builder.kind()))
}

#[derive(Debug, Clone, Entity)]
#[entity(table = "Person")]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub age: i64,
}

#[derive(Debug, Clone, Entity)]
#[entity(table = "Post")]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Entity)]
#[entity(table = "Policy")]
pub struct Policy {
    pub id: i64,
    pub holder_id: i64,
    pub premium: f64,
}
