//! # ingot-sql-mysql
//!
//! MySQL compilation backend for `ingot-sql-core`.
//!
//! # How MySQL differs from the standard compiler
//!
//! - **Identifier quoting**: identifiers are wrapped in backticks
//!   (`` ` ``), with embedded backticks doubled. See [MySQL identifiers].
//! - **Multi-table DELETE**: a DELETE with joins names the target alias
//!   between `DELETE` and `FROM` (`DELETE P FROM Person AS P INNER
//!   JOIN ...`). See [DELETE statement].
//! - **UPDATE with joins**: joined tables appear between the target
//!   table and `SET`, not in a separate FROM clause. See
//!   [UPDATE statement].
//!
//! Structurally the backend reuses the core node model: the
//! [`MySqlRenderer`] intercepts column, table, and subquery nodes and
//! lets every other node render itself, so dialect treatment applies at
//! any nesting depth.
//!
//! [MySQL identifiers]: https://dev.mysql.com/doc/refman/8.0/en/identifiers.html
//! [DELETE statement]: https://dev.mysql.com/doc/refman/8.0/en/delete.html
//! [UPDATE statement]: https://dev.mysql.com/doc/refman/8.0/en/update.html
//!
//! ## Example
//!
//! ```rust
//! use ingot_sql_core::{CompileOptions, Select};
//! use ingot_sql_mysql::MySqlCompiler;
//!
//! let mut query = Select::new();
//! query.from("Person")?;
//! query.column("P", "name")?;
//!
//! let sql = query.build(&MySqlCompiler::new(), CompileOptions::new())?;
//! assert_eq!(sql, "SELECT `P`.`name` FROM `Person` AS `P`");
//! # Ok::<(), ingot_sql_core::BuildError>(())
//! ```

mod compiler;

pub use compiler::{MySqlCompiler, MySqlRenderer};
