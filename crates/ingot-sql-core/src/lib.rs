//! # ingot-sql-core
//!
//! A dialect-agnostic SQL statement builder.
//!
//! Statements are assembled as trees of immutable expression nodes filed
//! under clause positions; rendering to SQL text is delegated to a
//! pluggable [`Compiler`]. This crate provides:
//!
//! - The expression node model and combinator surface
//! - Fluent SELECT/INSERT/UPDATE/DELETE builders
//! - An alias registry with deterministic collision handling
//! - Build-time instrumentation hooks
//! - The [`StandardCompiler`] reference backend
//!
//! Dialect backends (e.g. `ingot-sql-mysql`) implement [`Compiler`] and
//! can intercept individual expression node types while reusing the
//! shared rendering recursion.
//!
//! ## Building a query
//!
//! ```rust
//! use ingot_sql_core::{column, CompileOptions, JoinKind, Select, StandardCompiler};
//!
//! let mut query = Select::new();
//! query.from("Person")?;
//! query.column("P", "name")?;
//! query.join(JoinKind::Inner)?.table("Post")?.on(|on| {
//!     on.and(column("P", "id").eq(column("P1", "author_id")));
//! })?;
//!
//! let sql = query.build(&StandardCompiler::new(), CompileOptions::new())?;
//! assert_eq!(
//!     sql,
//!     "SELECT P.name FROM Person AS P \
//!      INNER JOIN Post AS P1 ON P.id = P1.author_id"
//! );
//! # Ok::<(), ingot_sql_core::BuildError>(())
//! ```
//!
//! ## Named parameters
//!
//! Caller-supplied data travels as `:name` placeholders plus a
//! [`Parameters`] bag handed to the driver:
//!
//! ```rust
//! use ingot_sql_core::{bind, col, CompileOptions, Select, StandardCompiler};
//!
//! let mut query = Select::new();
//! query.from("Person")?;
//! query.where_clause(|w| {
//!     w.and(col("age").ge(bind("age_min")));
//! })?;
//!
//! let sql = query.build(&StandardCompiler::new(), CompileOptions::new())?;
//! assert_eq!(sql, "SELECT * FROM Person AS P WHERE age >= :age_min");
//! # Ok::<(), ingot_sql_core::BuildError>(())
//! ```

pub mod alias;
pub mod builder;
pub mod compile;
pub mod error;
pub mod expr;
pub mod hooks;
pub mod params;
pub mod position;
pub mod schema;
pub mod value;

pub use alias::AliasRegistry;
pub use builder::{Delete, Insert, JoinBuilder, Select, StatementBuilder, Update};
pub use compile::{CompileOptions, Compiler, DefaultRenderer, ExprRenderer, StandardCompiler};
pub use error::{BuildError, Result};
pub use expr::condition::{BoolJoin, ConditionBuilder};
pub use expr::join::JoinKind;
pub use expr::window::{BorderExpr, FrameBuilder, FrameUnit, OverBuilder};
pub use expr::{
    bind, col, column, concat, exists, lit, not_exists, raw, table, Expr, ExprRef, Expression,
    IntoExpr,
};
pub use hooks::{Compiling, ExpressionAdded};
pub use params::Parameters;
pub use position::{OrderedExpr, Position, PositionMap, StatementKind};
pub use schema::{Entity, Record};
pub use value::{SqlValue, ToSqlValue};
